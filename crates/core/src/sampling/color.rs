use crate::shared::color_format::ColorFormat;
use crate::shared::frame::Frame;

/// Converts `frame` to `target`. Converting to the frame's own format is a no-op.
///
/// Luma uses the ITU-R BT.601 weights and YCbCr is the full-range JPEG
/// variant, so `Gray` equals the `Y` plane of `YCbCr`.
pub fn convert(frame: &Frame, target: ColorFormat) -> Frame {
    let source = frame.color();
    if source == target {
        return frame.clone();
    }
    let data: Vec<u8> = match (source, target) {
        (ColorFormat::Rgb, ColorFormat::Gray) => frame
            .data()
            .chunks_exact(3)
            .map(|p| luma(p[0], p[1], p[2]))
            .collect(),
        (ColorFormat::Rgb, ColorFormat::YCbCr) => frame
            .data()
            .chunks_exact(3)
            .flat_map(|p| rgb_to_ycbcr(p[0], p[1], p[2]))
            .collect(),
        (ColorFormat::YCbCr, ColorFormat::Rgb) => frame
            .data()
            .chunks_exact(3)
            .flat_map(|p| ycbcr_to_rgb(p[0], p[1], p[2]))
            .collect(),
        (ColorFormat::YCbCr, ColorFormat::Gray) => {
            frame.data().chunks_exact(3).map(|p| p[0]).collect()
        }
        (ColorFormat::Gray, ColorFormat::Rgb) => {
            frame.data().iter().flat_map(|&v| [v, v, v]).collect()
        }
        (ColorFormat::Gray, ColorFormat::YCbCr) => {
            frame.data().iter().flat_map(|&v| [v, 128, 128]).collect()
        }
        _ => unreachable!("identical formats return early"),
    };
    Frame::new(data, frame.width(), frame.height(), target, frame.index())
}

/// Converts every frame of a stack.
pub fn convert_all(frames: &[Frame], target: ColorFormat) -> Vec<Frame> {
    frames.iter().map(|f| convert(f, target)).collect()
}

/// Fixed-point BT.601 luma with rounding.
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471 + 0x8000) >> 16) as u8
}

fn rgb_to_ycbcr(r: u8, g: u8, b: u8) -> [u8; 3] {
    let (r, g, b) = (f32::from(r), f32::from(g), f32::from(b));
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cb = 128.0 - 0.168_736 * r - 0.331_264 * g + 0.5 * b;
    let cr = 128.0 + 0.5 * r - 0.418_688 * g - 0.081_312 * b;
    [to_u8(y), to_u8(cb), to_u8(cr)]
}

fn ycbcr_to_rgb(y: u8, cb: u8, cr: u8) -> [u8; 3] {
    let (y, cb, cr) = (f32::from(y), f32::from(cb) - 128.0, f32::from(cr) - 128.0);
    let r = y + 1.402 * cr;
    let g = y - 0.344_136 * cb - 0.714_136 * cr;
    let b = y + 1.772 * cb;
    [to_u8(r), to_u8(g), to_u8(b)]
}

fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
