use crate::shared::error::DatasetError;
use crate::shared::frame::Frame;
use crate::shared::source_metadata::SourceMetadata;

/// Immutable descriptor of one media item (still image or frame sequence).
///
/// Implementations only describe the item and decode frames by position.
/// Sequential reading happens through a [`SourceCursor`], which every
/// caller opens for itself, so descriptors can be shared across threads
/// without any seek state leaking between readers.
pub trait FrameSource: Send + Sync {
    fn metadata(&self) -> &SourceMetadata;

    /// Decodes the frame at `index` (`0 <= index < frame_count()`).
    fn read_frame(&self, index: usize) -> Result<Frame, DatasetError>;

    fn name(&self) -> &str {
        &self.metadata().name
    }

    fn frame_count(&self) -> usize {
        self.metadata().total_frames
    }

    /// `(width, height)` shared by every frame of the source.
    fn frame_shape(&self) -> (u32, u32) {
        let meta = self.metadata();
        (meta.width, meta.height)
    }
}

impl<'s> dyn FrameSource + 's {
    /// Opens an independent read session positioned at frame 0.
    pub fn open_cursor(&self) -> SourceCursor<'_> {
        SourceCursor::new(self)
    }
}

/// Read session over a [`FrameSource`] with its own position.
pub struct SourceCursor<'a> {
    source: &'a (dyn FrameSource + 'a),
    position: usize,
}

impl<'a> SourceCursor<'a> {
    pub fn new(source: &'a (dyn FrameSource + 'a)) -> Self {
        Self {
            source,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves the cursor to `offset`. Seeking to the end of the source is allowed.
    pub fn seek(&mut self, offset: usize) -> Result<(), DatasetError> {
        let total = self.source.frame_count();
        if offset > total {
            return Err(DatasetError::FrameOutOfRange {
                source_name: self.source.name().to_string(),
                frame: offset,
                total,
            });
        }
        self.position = offset;
        Ok(())
    }

    /// Reads `n` consecutive frames starting at the cursor and advances past them.
    pub fn read_frames(&mut self, n: usize) -> Result<Vec<Frame>, DatasetError> {
        let total = self.source.frame_count();
        let end = self.position + n;
        if end > total {
            return Err(DatasetError::FrameOutOfRange {
                source_name: self.source.name().to_string(),
                frame: end - 1,
                total,
            });
        }
        let frames = (self.position..end)
            .map(|i| self.source.read_frame(i))
            .collect::<Result<Vec<_>, _>>()?;
        self.position = end;
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::color_format::ColorFormat;

    struct CountingSource {
        metadata: SourceMetadata,
    }

    impl CountingSource {
        fn new(frames: usize) -> Self {
            Self {
                metadata: SourceMetadata {
                    name: "counting".to_string(),
                    width: 2,
                    height: 1,
                    total_frames: frames,
                    source_path: None,
                },
            }
        }
    }

    impl FrameSource for CountingSource {
        fn metadata(&self) -> &SourceMetadata {
            &self.metadata
        }

        fn read_frame(&self, index: usize) -> Result<Frame, DatasetError> {
            Ok(Frame::new(vec![index as u8; 2], 2, 1, ColorFormat::Gray, index))
        }
    }

    #[test]
    fn test_default_accessors_use_metadata() {
        let source = CountingSource::new(4);
        assert_eq!(source.name(), "counting");
        assert_eq!(source.frame_count(), 4);
        assert_eq!(source.frame_shape(), (2, 1));
    }

    #[test]
    fn test_read_frames_from_seek_position() {
        let source: Box<dyn FrameSource> = Box::new(CountingSource::new(5));
        let mut cursor = source.open_cursor();
        cursor.seek(2).unwrap();
        let frames = cursor.read_frames(3).unwrap();
        let indices: Vec<usize> = frames.iter().map(Frame::index).collect();
        assert_eq!(indices, vec![2, 3, 4]);
        assert_eq!(cursor.position(), 5);
    }

    #[test]
    fn test_cursors_are_independent() {
        let source: Box<dyn FrameSource> = Box::new(CountingSource::new(5));
        let mut first = source.open_cursor();
        first.seek(3).unwrap();
        let mut second = source.open_cursor();
        assert_eq!(second.position(), 0);
        assert_eq!(second.read_frames(1).unwrap()[0].index(), 0);
        assert_eq!(first.read_frames(1).unwrap()[0].index(), 3);
    }

    #[test]
    fn test_seek_past_end_fails() {
        let source: Box<dyn FrameSource> = Box::new(CountingSource::new(3));
        let mut cursor = source.open_cursor();
        assert!(cursor.seek(3).is_ok());
        assert!(matches!(
            cursor.seek(4),
            Err(DatasetError::FrameOutOfRange { frame: 4, total: 3, .. })
        ));
    }

    #[test]
    fn test_read_past_end_fails_without_advancing() {
        let source: Box<dyn FrameSource> = Box::new(CountingSource::new(3));
        let mut cursor = source.open_cursor();
        cursor.seek(2).unwrap();
        assert!(cursor.read_frames(2).is_err());
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_read_zero_frames_is_empty() {
        let source: Box<dyn FrameSource> = Box::new(CountingSource::new(3));
        let mut cursor = source.open_cursor();
        assert!(cursor.read_frames(0).unwrap().is_empty());
    }
}
