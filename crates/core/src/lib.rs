pub mod config;
pub mod parser;
pub mod sampling;
pub mod shared;
pub mod source;
