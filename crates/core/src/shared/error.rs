use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("sample index {index} is out of range (dataset has {len} samples)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("slice step cannot be zero")]
    ZeroSliceStep,
    #[error("frame {frame} is out of range for source {source_name} ({total} frames)")]
    FrameOutOfRange {
        source_name: String,
        frame: usize,
        total: usize,
    },
    #[error("cannot crop {width}x{height} to a multiple of scale {scale:?}")]
    Crop {
        width: u32,
        height: u32,
        scale: (f64, f64),
    },
    #[error("cannot resample {width}x{height} by 1/{scale:?}")]
    Resample {
        width: u32,
        height: u32,
        scale: (f64, f64),
    },
    #[error("scale factors must be finite and positive, got {0:?}")]
    InvalidScale((f64, f64)),
    #[error("no image frames found at {path}")]
    EmptySource { path: PathBuf },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("frame stack shape mismatch: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error("frame buffer does not match {width}x{height} with {channels} channels")]
    InvalidFrame {
        width: u32,
        height: u32,
        channels: usize,
    },
}
