use crate::shared::error::DatasetError;
use crate::shared::frame::Frame;
use crate::shared::source_metadata::SourceMetadata;
use crate::source::domain::frame_source::FrameSource;

/// Extends a source with synthetic frames at both ends.
///
/// The first `head` positions repeat the inner source's first frame and
/// the last `tail` positions repeat its last frame, so every real frame
/// can sit at the center of a full inference window.
pub struct PaddedSource {
    inner: Box<dyn FrameSource>,
    head: usize,
    metadata: SourceMetadata,
}

impl PaddedSource {
    pub fn new(inner: Box<dyn FrameSource>, head: usize, tail: usize) -> Self {
        let mut metadata = inner.metadata().clone();
        metadata.total_frames += head + tail;
        Self {
            inner,
            head,
            metadata,
        }
    }
}

impl FrameSource for PaddedSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn read_frame(&self, index: usize) -> Result<Frame, DatasetError> {
        let inner_total = self.inner.frame_count();
        if index >= self.metadata.total_frames || inner_total == 0 {
            return Err(DatasetError::FrameOutOfRange {
                source_name: self.metadata.name.clone(),
                frame: index,
                total: self.metadata.total_frames,
            });
        }
        let inner_index = index.saturating_sub(self.head).min(inner_total - 1);
        Ok(self.inner.read_frame(inner_index)?.with_index(index))
    }
}
