use std::fmt;

use serde::{Deserialize, Serialize};

/// Output color representation of generated samples.
///
/// Parsing from a user string never fails: names are matched
/// case-insensitively and anything unrecognized resolves to
/// [`ColorFormat::Gray`] with a logged warning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColorFormat {
    Gray,
    YCbCr,
    #[default]
    Rgb,
}

impl ColorFormat {
    pub const ALL: &[ColorFormat] = &[ColorFormat::Gray, ColorFormat::YCbCr, ColorFormat::Rgb];

    /// Resolves a user-supplied format name (`gray`/`l`, `yuv`/`ycbcr`, `rgb`).
    pub fn resolve(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "gray" | "l" => ColorFormat::Gray,
            "yuv" | "ycbcr" => ColorFormat::YCbCr,
            "rgb" => ColorFormat::Rgb,
            other => {
                log::warn!("Use grayscale by default. Unknown format {other}");
                ColorFormat::Gray
            }
        }
    }

    pub fn channels(self) -> usize {
        match self {
            ColorFormat::Gray => 1,
            ColorFormat::YCbCr | ColorFormat::Rgb => 3,
        }
    }
}

impl From<String> for ColorFormat {
    fn from(name: String) -> Self {
        Self::resolve(&name)
    }
}

impl From<ColorFormat> for String {
    fn from(color: ColorFormat) -> Self {
        color.to_string()
    }
}

impl fmt::Display for ColorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorFormat::Gray => write!(f, "L"),
            ColorFormat::YCbCr => write!(f, "YCbCr"),
            ColorFormat::Rgb => write!(f, "RGB"),
        }
    }
}
