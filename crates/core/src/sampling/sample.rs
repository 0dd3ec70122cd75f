use ndarray::{Array4, Axis};

use crate::shared::error::DatasetError;
use crate::shared::frame::Frame;

/// Temporally ordered frames of one window.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStack {
    frames: Vec<Frame>,
}

impl FrameStack {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// `(width, height)` of the first frame, if any.
    pub fn frame_shape(&self) -> Option<(u32, u32)> {
        self.frames.first().map(|f| (f.width(), f.height()))
    }

    /// Stacks the frames into a `(depth, height, width, channels)` array.
    ///
    /// Fails if frames differ in shape or the stack is empty.
    pub fn to_array(&self) -> Result<Array4<u8>, DatasetError> {
        let views: Vec<_> = self.frames.iter().map(Frame::as_ndarray).collect();
        Ok(ndarray::stack(Axis(0), &views)?)
    }
}

/// Provenance of a sample.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleMetadata {
    pub source_name: String,
    /// Requested window start inside the source.
    pub offset: usize,
    /// Frame count of the source as indexed (including inference padding),
    /// so consumers can tell edge windows apart.
    pub source_frames: usize,
}

/// High-resolution ground truth paired with its synthesized low-resolution input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sample {
    pub hr: FrameStack,
    pub lr: FrameStack,
    pub metadata: SampleMetadata,
}
