use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::sampling::resample::ResampleFilter;
use crate::shared::color_format::ColorFormat;
use crate::shared::constants::{DEFAULT_SCALE, UNBOUNDED_DEPTH};
use crate::shared::error::DatasetError;

/// Dataset split the parser serves; test and infer pad sources at both ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[default]
    Train,
    Val,
    Test,
    Infer,
}

impl Method {
    pub const ALL: &[Method] = &[Method::Train, Method::Val, Method::Test, Method::Infer];

    pub fn pads_edges(self) -> bool {
        matches!(self, Method::Test | Method::Infer)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Train => write!(f, "train"),
            Method::Val => write!(f, "val"),
            Method::Test => write!(f, "test"),
            Method::Infer => write!(f, "infer"),
        }
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .iter()
            .copied()
            .find(|m| m.to_string() == s.to_lowercase())
            .ok_or_else(|| format!("unknown method '{s}', expected one of: train, val, test, infer"))
    }
}

/// Down-sampling factor per axis. Both factors are finite and positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScaleRepr", into = "ScaleRepr")]
pub struct Scale {
    x: f64,
    y: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum ScaleRepr {
    Uniform(f64),
    PerAxis(f64, f64),
}

impl Scale {
    pub fn new(x: f64, y: f64) -> Result<Self, DatasetError> {
        let valid = |s: f64| s.is_finite() && s > 0.0;
        if valid(x) && valid(y) {
            Ok(Self { x, y })
        } else {
            Err(DatasetError::InvalidScale((x, y)))
        }
    }

    pub fn uniform(s: f64) -> Result<Self, DatasetError> {
        Self::new(s, s)
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn as_pair(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn is_uniform(&self) -> bool {
        self.x == self.y
    }

    /// Single factor for sizing estimates: the factor itself when uniform,
    /// the geometric mean of both axes otherwise.
    pub fn mean(&self) -> f64 {
        if self.is_uniform() {
            self.x
        } else {
            (self.x * self.y).sqrt()
        }
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self {
            x: DEFAULT_SCALE,
            y: DEFAULT_SCALE,
        }
    }
}

impl TryFrom<ScaleRepr> for Scale {
    type Error = DatasetError;

    fn try_from(repr: ScaleRepr) -> Result<Self, Self::Error> {
        match repr {
            ScaleRepr::Uniform(s) => Scale::uniform(s),
            ScaleRepr::PerAxis(x, y) => Scale::new(x, y),
        }
    }
}

impl From<Scale> for ScaleRepr {
    fn from(scale: Scale) -> Self {
        if scale.is_uniform() {
            ScaleRepr::Uniform(scale.x)
        } else {
            ScaleRepr::PerAxis(scale.x, scale.y)
        }
    }
}

/// Temporal window size, normalized from the signed configuration value.
///
/// Negative values mean "the whole source as one window"; zero behaves
/// like an unset depth, i.e. single-frame samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowDepth {
    Frames(usize),
    WholeSource,
}

impl WindowDepth {
    pub fn from_config(depth: i32) -> Self {
        if depth < 0 {
            WindowDepth::WholeSource
        } else {
            WindowDepth::Frames(depth.max(1) as usize)
        }
    }

    /// Upper bound on the window length before per-source clamping.
    pub fn bound(self) -> usize {
        match self {
            WindowDepth::Frames(n) => n,
            WindowDepth::WholeSource => UNBOUNDED_DEPTH,
        }
    }

    /// Number of frames actually read from a source with `frame_count` frames.
    pub fn effective(self, frame_count: usize) -> usize {
        self.bound().min(frame_count)
    }

    /// Synthetic frames added at each end of a source in test/infer mode.
    pub fn edge_padding(self) -> usize {
        match self {
            WindowDepth::Frames(n) if n > 1 => n / 2,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub method: Method,
    pub scale: Scale,
    pub depth: i32,
    pub modcrop: bool,
    pub resample: ResampleFilter,
    #[serde(rename = "convert_to")]
    pub color_format: ColorFormat,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            method: Method::Train,
            scale: Scale::default(),
            depth: 1,
            modcrop: true,
            resample: ResampleFilter::Bicubic,
            color_format: ColorFormat::Rgb,
        }
    }
}

impl ParserConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, DatasetError> {
        read_json(path)
    }

    pub fn window(&self) -> WindowDepth {
        WindowDepth::from_config(self.depth)
    }
}

/// Source lists keyed by the split they belong to.
///
/// Serialized as a JSON object such as `{"train": ["a/", "b.png"], "test": ["c/"]}`.
/// Keys other than the known splits are kept but never selected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetManifest {
    splits: BTreeMap<String, Vec<PathBuf>>,
}

impl DatasetManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_split(mut self, method: Method, paths: Vec<PathBuf>) -> Self {
        self.splits.insert(method.to_string(), paths);
        self
    }

    pub fn from_json_file(path: &Path) -> Result<Self, DatasetError> {
        read_json(path)
    }

    /// Sources for `method`; a split missing from the manifest is empty.
    pub fn sources(&self, method: Method) -> &[PathBuf] {
        self.splits
            .get(&method.to_string())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
    let json = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| DatasetError::Config {
        path: path.to_path_buf(),
        source,
    })
}
