pub mod capacity;
pub mod color;
pub mod index_table;
pub mod modcrop;
pub mod resample;
pub mod sample;
pub mod sample_generator;
pub mod slice;
