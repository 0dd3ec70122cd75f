pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

/// Window bound used for whole-source samples; clamped to each source's length.
pub const UNBOUNDED_DEPTH: usize = i32::MAX as usize;

pub const DEFAULT_SCALE: f64 = 4.0;
