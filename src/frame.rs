use crate::error::{NeonError, NeonResult};

/// An 8-bit RGB triple.
pub type Rgb = [u8; 3];

/// Straight (non-premultiplied) RGBA8 raster with optional display duration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub duration_ms: Option<u32>,
}

impl RasterFrame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> NeonResult<Self> {
        if width == 0 || height == 0 {
            return Err(NeonError::unsupported_input(format!(
                "frame must have non-zero size, got {width}x{height}"
            )));
        }
        let expected = rgba_len(width, height)?;
        if data.len() != expected {
            return Err(NeonError::unsupported_input(format!(
                "frame buffer length {} does not match {width}x{height}x4",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
            duration_ms: None,
        })
    }

    /// Fully transparent frame of the given size.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; (width as usize) * (height as usize) * 4],
            duration_ms: None,
        }
    }

    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            width,
            height,
            data: rgba.repeat((width as usize) * (height as usize)),
            duration_ms: None,
        }
    }

    pub fn with_duration(mut self, duration_ms: Option<u32>) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = self.index(x, y);
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let idx = self.index(x, y);
        self.data[idx..idx + 4].copy_from_slice(&px);
    }

    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
            duration_ms: None,
        }
    }

    pub fn to_rgba_image(&self) -> NeonResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone()).ok_or_else(|| {
            NeonError::unsupported_input("frame buffer does not match its dimensions")
        })
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }
}

/// Single-channel compositing mask. Never an output on its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlphaMask {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl AlphaMask {
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; (width as usize) * (height as usize)],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[(y as usize) * (self.width as usize) + (x as usize)]
    }

    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&v| v == 0)
    }
}

fn rgba_len(width: u32, height: u32) -> NeonResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| NeonError::unsupported_input("frame buffer size overflow"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_mismatched_buffer() {
        let err = RasterFrame::new(2, 2, vec![0u8; 15]).unwrap_err();
        assert!(err.is_unsupported_input());
    }

    #[test]
    fn new_rejects_zero_size() {
        assert!(RasterFrame::new(0, 3, Vec::new()).is_err());
    }

    #[test]
    fn pixel_accessors_address_row_major() {
        let mut f = RasterFrame::transparent(3, 2);
        f.put_pixel(2, 1, [1, 2, 3, 4]);
        assert_eq!(f.pixel(2, 1), [1, 2, 3, 4]);
        assert_eq!(&f.data[20..24], &[1, 2, 3, 4]);
    }

    #[test]
    fn rgba_image_conversion_keeps_pixels() {
        let f = RasterFrame::filled(2, 3, [9, 8, 7, 6]);
        let back = RasterFrame::from_rgba_image(f.to_rgba_image().unwrap());
        assert_eq!(back, f);
    }
}
