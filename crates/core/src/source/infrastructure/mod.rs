pub mod image_sequence_source;
pub mod in_memory_source;
pub mod padded_source;
