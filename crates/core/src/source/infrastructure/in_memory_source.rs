use crate::shared::error::DatasetError;
use crate::shared::frame::Frame;
use crate::shared::source_metadata::SourceMetadata;
use crate::source::domain::frame_source::FrameSource;

/// Frame source over frames that are already decoded.
///
/// Useful for synthetic data and for callers that decode media themselves.
pub struct InMemorySource {
    metadata: SourceMetadata,
    frames: Vec<Frame>,
}

impl InMemorySource {
    /// Wraps `frames`, re-indexing them by position.
    ///
    /// Returns `None` if `frames` is empty or the frames differ in size.
    pub fn new(name: impl Into<String>, frames: Vec<Frame>) -> Option<Self> {
        let first = frames.first()?;
        let (width, height) = (first.width(), first.height());
        if frames
            .iter()
            .any(|f| f.width() != width || f.height() != height)
        {
            return None;
        }
        let frames: Vec<Frame> = frames
            .into_iter()
            .enumerate()
            .map(|(i, f)| f.with_index(i))
            .collect();
        Some(Self {
            metadata: SourceMetadata {
                name: name.into(),
                width,
                height,
                total_frames: frames.len(),
                source_path: None,
            },
            frames,
        })
    }
}

impl FrameSource for InMemorySource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn read_frame(&self, index: usize) -> Result<Frame, DatasetError> {
        self.frames
            .get(index)
            .cloned()
            .ok_or_else(|| DatasetError::FrameOutOfRange {
                source_name: self.metadata.name.clone(),
                frame: index,
                total: self.frames.len(),
            })
    }
}
