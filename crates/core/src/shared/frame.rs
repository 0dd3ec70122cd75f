use ndarray::ArrayView3;

use crate::shared::color_format::ColorFormat;

/// A single frame: contiguous pixel bytes in row-major order.
///
/// The buffer layout is described by `color`: one byte per pixel for
/// grayscale, three interleaved bytes per pixel for RGB and YCbCr.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    color: ColorFormat,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, color: ColorFormat, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * color.channels(),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            color,
            index,
        }
    }

    /// Builds a frame filled with a single pixel value.
    pub fn filled(width: u32, height: u32, color: ColorFormat, pixel: &[u8], index: usize) -> Self {
        debug_assert_eq!(pixel.len(), color.channels());
        let data = pixel.repeat((width as usize) * (height as usize));
        Self::new(data, width, height, color, index)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color(&self) -> ColorFormat {
        self.color
    }

    pub fn channels(&self) -> usize {
        self.color.channels()
    }

    /// Position of this frame within its source.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Copies out the `width x height` rectangle whose top-left corner is `(x, y)`.
    ///
    /// Returns `None` when the rectangle does not fit inside the frame.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Option<Frame> {
        if x.checked_add(width)? > self.width || y.checked_add(height)? > self.height {
            return None;
        }
        let channels = self.channels();
        let fw = self.width as usize;
        let row_len = width as usize * channels;
        let mut data = Vec::with_capacity(row_len * height as usize);
        for row in y as usize..(y + height) as usize {
            let start = (row * fw + x as usize) * channels;
            data.extend_from_slice(&self.data[start..start + row_len]);
        }
        Some(Frame::new(data, width, height, self.color, self.index))
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, self.channels())
    }
}
