use std::path::PathBuf;

/// Static description of a frame source, available without decoding pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceMetadata {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub total_frames: usize,
    pub source_path: Option<PathBuf>,
}

impl SourceMetadata {
    pub fn pixels_per_frame(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}
