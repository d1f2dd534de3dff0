//! Pure buffer transforms used by the neon pipeline.
//!
//! RGBA inputs are straight-alpha [`RasterFrame`]s; single-channel buffers are plain
//! row-major `Vec<u8>` of `width * height` bytes. None of these functions touch alpha
//! unless stated otherwise.

use image::imageops::FilterType;

use crate::{
    config::Sharpen,
    error::{NeonError, NeonResult},
    frame::RasterFrame,
};

/// 3x3 convolution kernel: `out = sum(w * px) / scale + offset`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Kernel3 {
    pub weights: [i32; 9],
    pub scale: i32,
    pub offset: i32,
}

impl Kernel3 {
    pub const SHARPEN: Self = Self {
        weights: [-2, -2, -2, -2, 32, -2, -2, -2, -2],
        scale: 16,
        offset: 0,
    };
    pub const EDGE_ENHANCE: Self = Self {
        weights: [-1, -1, -1, -1, 10, -1, -1, -1, -1],
        scale: 2,
        offset: 0,
    };
    pub const EDGE_ENHANCE_MORE: Self = Self {
        weights: [-1, -1, -1, -1, 9, -1, -1, -1, -1],
        scale: 1,
        offset: 0,
    };
    /// Flat regions map to white, edges to dark.
    pub const CONTOUR: Self = Self {
        weights: [-1, -1, -1, -1, 8, -1, -1, -1, -1],
        scale: 1,
        offset: 255,
    };

    pub fn for_sharpen(kind: Sharpen) -> Self {
        match kind {
            Sharpen::Sharpen => Self::SHARPEN,
            Sharpen::EdgeEnhance => Self::EDGE_ENHANCE,
            Sharpen::EdgeEnhanceMore => Self::EDGE_ENHANCE_MORE,
        }
    }
}

/// Convolve the RGB channels with `k`. Border pixels and alpha are copied unchanged.
pub fn convolve3x3(src: &RasterFrame, k: &Kernel3) -> RasterFrame {
    let mut out = src.clone();
    let (w, h) = (src.width as usize, src.height as usize);
    if w < 3 || h < 3 {
        return out;
    }
    let scale = k.scale.max(1) as f32;
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let out_idx = (y * w + x) * 4;
            for c in 0..3 {
                let mut acc = 0i32;
                for ky in 0..3 {
                    for kx in 0..3 {
                        let idx = ((y + ky - 1) * w + (x + kx - 1)) * 4 + c;
                        acc += k.weights[ky * 3 + kx] * i32::from(src.data[idx]);
                    }
                }
                let v = (acc as f32 / scale + k.offset as f32).round();
                out.data[out_idx + c] = v.clamp(0.0, 255.0) as u8;
            }
        }
    }
    out
}

/// ITU-R 601-2 luma of each pixel.
pub fn luma(src: &RasterFrame) -> Vec<u8> {
    src.data
        .chunks_exact(4)
        .map(|px| luma_of(px[0], px[1], px[2]))
        .collect()
}

fn luma_of(r: u8, g: u8, b: u8) -> u8 {
    let v = u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471 + 0x8000;
    (v >> 16).min(255) as u8
}

pub fn invert_in_place(buf: &mut [u8]) {
    for v in buf {
        *v = 255 - *v;
    }
}

/// Zero the outermost one-pixel ring of a single-channel buffer.
pub fn clear_border(buf: &mut [u8], width: u32, height: u32) {
    let (w, h) = (width as usize, height as usize);
    if w == 0 || h == 0 {
        return;
    }
    buf[..w].fill(0);
    buf[(h - 1) * w..h * w].fill(0);
    for y in 0..h {
        buf[y * w] = 0;
        buf[y * w + w - 1] = 0;
    }
}

/// Multiply a single-channel buffer by `factor` (truncating, saturating).
pub fn scale_channel(buf: &[u8], factor: f32) -> Vec<u8> {
    buf.iter().map(|&v| enhance(0.0, v, factor)).collect()
}

/// Scale RGB toward black by `factor`; 1.0 is identity.
pub fn brightness(src: &RasterFrame, factor: f32) -> RasterFrame {
    let mut out = src.clone();
    for px in out.data.chunks_exact_mut(4) {
        for c in &mut px[..3] {
            *c = enhance(0.0, *c, factor);
        }
    }
    out
}

/// Scale color saturation by `factor`; 0.0 is grayscale, 1.0 is identity.
pub fn saturation(src: &RasterFrame, factor: f32) -> RasterFrame {
    let mut out = src.clone();
    for px in out.data.chunks_exact_mut(4) {
        let gray = f32::from(luma_of(px[0], px[1], px[2]));
        for c in &mut px[..3] {
            *c = enhance(gray, *c, factor);
        }
    }
    out
}

fn enhance(degenerate: f32, v: u8, factor: f32) -> u8 {
    let t = degenerate + factor * (f32::from(v) - degenerate);
    t.clamp(0.0, 255.0) as u8
}

/// Downscale so the longer side is at most `max_size`, preserving aspect ratio.
pub fn fit_within(src: &RasterFrame, max_size: u32) -> NeonResult<RasterFrame> {
    if max_size == 0 {
        return Err(NeonError::config("max_size must be >= 1"));
    }
    let longer = src.width.max(src.height);
    if longer <= max_size {
        return Ok(src.clone());
    }
    let ratio = f64::from(longer) / f64::from(max_size);
    let w = ((f64::from(src.width) / ratio) as u32).max(1);
    let h = ((f64::from(src.height) / ratio) as u32).max(1);
    let img = src.to_rgba_image()?;
    let resized = image::imageops::resize(&img, w, h, FilterType::CatmullRom);
    Ok(RasterFrame::from_rgba_image(resized).with_duration(src.duration_ms))
}
