use crate::config::Scale;
use crate::sampling::resample::multiple_len;
use crate::shared::error::DatasetError;
use crate::shared::frame::Frame;

/// Crops `frame` from the top-left so each side is a whole multiple of `scale`.
///
/// Down-sampling the result by `scale` then divides evenly. Fails when a
/// side is shorter than its scale factor.
pub fn modcrop(frame: &Frame, scale: Scale) -> Result<Frame, DatasetError> {
    let width = multiple_len(frame.width(), scale.x());
    let height = multiple_len(frame.height(), scale.y());
    let err = || DatasetError::Crop {
        width: frame.width(),
        height: frame.height(),
        scale: scale.as_pair(),
    };
    if width == 0 || height == 0 {
        return Err(err());
    }
    if (width, height) == (frame.width(), frame.height()) {
        return Ok(frame.clone());
    }
    frame.crop(0, 0, width, height).ok_or_else(err)
}
