use crate::config::Scale;
use crate::shared::source_metadata::SourceMetadata;

/// Estimated bytes per source pixel: three channels of the HR frame plus
/// its LR counterpart, times the window depth.
///
/// Non-positive depths count as one frame per sample. For whole-source
/// windows this undercounts; the estimate is advisory only.
pub fn bytes_per_pixel(scale: Scale, depth: i32) -> f64 {
    let depth = f64::from(depth.max(1));
    3.0 * (1.0 + scale.mean().recip()) * depth
}

/// Upper-bound byte size of the fully materialized dataset.
///
/// Pure function of source metadata; nothing is decoded. Accumulates in
/// `u64` and saturates instead of wrapping.
pub fn estimate_capacity<'a>(
    sources: impl IntoIterator<Item = &'a SourceMetadata>,
    scale: Scale,
    depth: i32,
) -> u64 {
    let bpp = bytes_per_pixel(scale, depth);
    sources.into_iter().fold(0u64, |total, meta| {
        let pixels = u128::from(meta.pixels_per_frame()) * meta.total_frames as u128;
        // float-to-int `as` saturates at u64::MAX
        let bytes = (pixels as f64 * bpp) as u64;
        total.saturating_add(bytes)
    })
}
