use std::fmt;
use std::str::FromStr;

use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};

use crate::config::Scale;
use crate::shared::error::DatasetError;
use crate::shared::frame::Frame;

/// Tolerance for float scale factors that are meant to divide exactly.
const SCALE_EPSILON: f64 = 1e-6;

/// Resampling kernel used to synthesize low-resolution frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleFilter {
    Nearest,
    Bilinear,
    #[default]
    Bicubic,
    Lanczos,
}

impl ResampleFilter {
    pub const ALL: &[ResampleFilter] = &[
        ResampleFilter::Nearest,
        ResampleFilter::Bilinear,
        ResampleFilter::Bicubic,
        ResampleFilter::Lanczos,
    ];

    fn filter_type(self) -> FilterType {
        match self {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Bilinear => FilterType::Triangle,
            ResampleFilter::Bicubic => FilterType::CatmullRom,
            ResampleFilter::Lanczos => FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for ResampleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResampleFilter::Nearest => write!(f, "nearest"),
            ResampleFilter::Bilinear => write!(f, "bilinear"),
            ResampleFilter::Bicubic => write!(f, "bicubic"),
            ResampleFilter::Lanczos => write!(f, "lanczos"),
        }
    }
}

impl FromStr for ResampleFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResampleFilter::ALL
            .iter()
            .copied()
            .find(|r| r.to_string() == s.to_lowercase())
            .ok_or_else(|| {
                format!("unknown resample filter '{s}', expected one of: nearest, bilinear, bicubic, lanczos")
            })
    }
}

/// `floor(size / factor)`, tolerant of float error in exact divisions.
pub(crate) fn reduced_len(size: u32, factor: f64) -> u32 {
    (f64::from(size) / factor + SCALE_EPSILON).floor() as u32
}

/// Largest length `<= size` that is a whole multiple of `factor`.
pub(crate) fn multiple_len(size: u32, factor: f64) -> u32 {
    (f64::from(reduced_len(size, factor)) * factor + SCALE_EPSILON).floor() as u32
}

/// Shrinks `frame` by the reciprocal of `scale` on each axis.
///
/// The output size is `floor(size / scale)`; a zero-sized result is an error.
pub fn downsample(frame: &Frame, scale: Scale, filter: ResampleFilter) -> Result<Frame, DatasetError> {
    let width = reduced_len(frame.width(), scale.x());
    let height = reduced_len(frame.height(), scale.y());
    if width == 0 || height == 0 {
        return Err(DatasetError::Resample {
            width: frame.width(),
            height: frame.height(),
            scale: scale.as_pair(),
        });
    }
    resize(frame, width, height, filter)
}

/// Resizes `frame` to exactly `width x height`, keeping its color tag and index.
pub fn resize(
    frame: &Frame,
    width: u32,
    height: u32,
    filter: ResampleFilter,
) -> Result<Frame, DatasetError> {
    if (frame.width(), frame.height()) == (width, height) {
        return Ok(frame.clone());
    }
    let invalid = || DatasetError::InvalidFrame {
        width: frame.width(),
        height: frame.height(),
        channels: frame.channels(),
    };
    let data = match frame.channels() {
        1 => {
            let img = GrayImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
                .ok_or_else(invalid)?;
            imageops::resize(&img, width, height, filter.filter_type()).into_raw()
        }
        3 => {
            let img = RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
                .ok_or_else(invalid)?;
            imageops::resize(&img, width, height, filter.filter_type()).into_raw()
        }
        _ => return Err(invalid()),
    };
    Ok(Frame::new(data, width, height, frame.color(), frame.index()))
}
