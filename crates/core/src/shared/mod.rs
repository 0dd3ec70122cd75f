pub mod color_format;
pub mod constants;
pub mod error;
pub mod frame;
pub mod source_metadata;
