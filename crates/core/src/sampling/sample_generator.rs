use crate::config::{ParserConfig, Scale, WindowDepth};
use crate::sampling::color::convert_all;
use crate::sampling::modcrop::modcrop;
use crate::sampling::resample::{downsample, ResampleFilter};
use crate::sampling::sample::{FrameStack, Sample, SampleMetadata};
use crate::shared::color_format::ColorFormat;
use crate::shared::error::DatasetError;
use crate::shared::frame::Frame;
use crate::source::domain::frame_source::FrameSource;

/// Materializes HR/LR window pairs: read → modcrop → downsample → convert.
///
/// Holds only configuration. Each call opens its own cursor on the source,
/// so concurrent or repeated calls never observe each other's read position.
/// Nothing is cached; asking for the same window twice decodes it twice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleGenerator {
    window: WindowDepth,
    scale: Scale,
    modcrop: bool,
    resample: ResampleFilter,
    color: ColorFormat,
}

impl SampleGenerator {
    pub fn new(
        window: WindowDepth,
        scale: Scale,
        modcrop: bool,
        resample: ResampleFilter,
        color: ColorFormat,
    ) -> Self {
        Self {
            window,
            scale,
            modcrop,
            resample,
            color,
        }
    }

    pub fn from_config(config: &ParserConfig) -> Self {
        Self::new(
            config.window(),
            config.scale,
            config.modcrop,
            config.resample,
            config.color_format,
        )
    }

    /// Builds the sample whose window starts at `offset` in `source`.
    ///
    /// Returns a one-element list so scalar and slice access share a shape.
    pub fn generate(&self, source: &dyn FrameSource, offset: usize) -> Result<Vec<Sample>, DatasetError> {
        log::debug!("Prefetching {} @{}", source.name(), offset);

        let total = source.frame_count();
        let depth = self.window.effective(total);
        let mut cursor = source.open_cursor();
        cursor.seek(offset)?;
        let raw = cursor.read_frames(depth)?;

        let hr = if self.modcrop {
            raw.iter()
                .map(|f| modcrop(f, self.scale))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            raw
        };
        let lr = hr
            .iter()
            .map(|f| downsample(f, self.scale, self.resample))
            .collect::<Result<Vec<Frame>, _>>()?;

        Ok(vec![Sample {
            hr: FrameStack::new(convert_all(&hr, self.color)),
            lr: FrameStack::new(convert_all(&lr, self.color)),
            metadata: SampleMetadata {
                source_name: source.name().to_string(),
                offset,
                source_frames: total,
            },
        }])
    }
}
