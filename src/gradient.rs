//! Multi-color gradient strips and the windows cut from them.
//!
//! A strip varies along one axis only. Horizontal strips run left to right; vertical strips
//! are authored bottom to top, so in row order the first palette pair sits at the bottom.

use image::{Rgb as RgbPixel, RgbImage, imageops::FilterType};

use crate::{
    color::Palette,
    config::Direction,
    error::{NeonError, NeonResult},
    frame::Rgb,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GradientStrip {
    pub pixels: RgbImage,
    pub horizontal: bool,
}

impl GradientStrip {
    /// Build a strip for a `width` x `height` reference frame.
    ///
    /// In `single` mode the palette spans the frame once. Otherwise the palette is closed
    /// into a loop, each pair spans `1 / (colors_per_frame - 1)` of the frame, and the
    /// whole loop is laid down twice so a frame-sized window can slide across it.
    pub fn build(
        width: u32,
        height: u32,
        palette: &Palette,
        single: bool,
        direction: Direction,
        colors_per_frame: u32,
    ) -> NeonResult<Self> {
        if palette.len() < 2 {
            return Err(NeonError::config("a gradient needs at least two colors"));
        }
        if width == 0 || height == 0 {
            return Err(NeonError::unsupported_input("gradient reference frame is empty"));
        }
        let sequence = if single {
            palette.colors().to_vec()
        } else {
            palette.cycled()
        };
        let ratio = if single {
            palette.len() as u32 - 1
        } else {
            if colors_per_frame < 2 {
                return Err(NeonError::config("colors_per_frame must be >= 2"));
            }
            colors_per_frame - 1
        };
        let horizontal = direction.is_horizontal();
        let dim = if horizontal { width } else { height };
        let segment_len = (dim / ratio).max(1);

        let mut segments: Vec<Vec<Rgb>> = sequence
            .windows(2)
            .map(|pair| {
                let mut seg = linear_segment(pair[0], pair[1], segment_len);
                if !horizontal {
                    // Row order is top-down; the segment is authored bottom-up.
                    seg.reverse();
                }
                seg
            })
            .collect();
        if !horizontal {
            segments.reverse();
        }

        let mut axis: Vec<Rgb> = segments.concat();
        if !single {
            axis.extend_from_within(..);
        }

        let cross = if horizontal { height } else { width };
        let mut strip = Self {
            pixels: materialize(&axis, cross, horizontal),
            horizontal,
        };
        if single && direction.is_reversed() {
            strip.rotate_180();
        }

        tracing::debug!(
            strip_width = strip.pixels.width(),
            strip_height = strip.pixels.height(),
            horizontal,
            single,
            "built gradient strip"
        );
        Ok(strip)
    }

    /// Extent along the gradient axis.
    pub fn extent(&self) -> u32 {
        if self.horizontal {
            self.pixels.width()
        } else {
            self.pixels.height()
        }
    }

    pub fn rotate_180(&mut self) {
        image::imageops::rotate180_in_place(&mut self.pixels);
    }

    /// Stretch to exactly `width` x `height`, absorbing integer-division shortfall.
    pub fn fit_to(&self, width: u32, height: u32) -> Self {
        if self.pixels.dimensions() == (width, height) {
            return self.clone();
        }
        Self {
            pixels: image::imageops::resize(&self.pixels, width, height, FilterType::Nearest),
            horizontal: self.horizontal,
        }
    }

    /// Packed RGB8 window of `width` x `height` starting `offset` pixels along the axis.
    ///
    /// The axis is addressed cyclically, so windows past either end continue the strip.
    pub fn window(&self, offset: i64, width: u32, height: u32) -> Vec<u8> {
        let extent = i64::from(self.extent());
        let (sw, sh) = self.pixels.dimensions();
        let mut out = Vec::with_capacity((width as usize) * (height as usize) * 3);
        for y in 0..height {
            for x in 0..width {
                let (sx, sy) = if self.horizontal {
                    let sx = (offset + i64::from(x)).rem_euclid(extent) as u32;
                    (sx, y.min(sh - 1))
                } else {
                    let sy = (offset + i64::from(y)).rem_euclid(extent) as u32;
                    (x.min(sw - 1), sy)
                };
                out.extend_from_slice(&self.pixels.get_pixel(sx, sy).0);
            }
        }
        out
    }
}

/// `len` colors from `start` to `end` inclusive.
fn linear_segment(start: Rgb, end: Rgb, len: u32) -> Vec<Rgb> {
    if len == 1 {
        return vec![start];
    }
    let last = f64::from(len - 1);
    (0..len)
        .map(|i| {
            let t = f64::from(i) / last;
            std::array::from_fn(|c| {
                let a = f64::from(start[c]);
                let b = f64::from(end[c]);
                (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
            })
        })
        .collect()
}

fn materialize(axis: &[Rgb], cross: u32, horizontal: bool) -> RgbImage {
    let len = axis.len() as u32;
    if horizontal {
        RgbImage::from_fn(len, cross, |x, _| RgbPixel(axis[x as usize]))
    } else {
        RgbImage::from_fn(cross, len, |_, y| RgbPixel(axis[y as usize]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rb() -> Palette {
        Palette::new(vec![[255, 0, 0], [0, 0, 255]]).unwrap()
    }

    #[test]
    fn linear_segment_hits_both_ends() {
        let seg = linear_segment([0, 0, 0], [255, 255, 255], 6);
        assert_eq!(seg.first(), Some(&[0, 0, 0]));
        assert_eq!(seg.last(), Some(&[255, 255, 255]));
        assert_eq!(seg[1], [51, 51, 51]);
    }

    #[test]
    fn single_horizontal_left_runs_first_to_last() {
        let s = GradientStrip::build(10, 4, &rb(), true, Direction::Left, 3).unwrap();
        assert_eq!(s.pixels.dimensions(), (10, 4));
        assert_eq!(s.pixels.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(s.pixels.get_pixel(9, 3).0, [0, 0, 255]);
    }

    #[test]
    fn single_right_is_rotated() {
        let s = GradientStrip::build(10, 4, &rb(), true, Direction::Right, 3).unwrap();
        assert_eq!(s.pixels.get_pixel(0, 0).0, [0, 0, 255]);
        assert_eq!(s.pixels.get_pixel(9, 0).0, [255, 0, 0]);
    }

    #[test]
    fn single_vertical_up_starts_at_the_bottom() {
        let p = Palette::new(vec![[255, 0, 0], [0, 255, 0], [0, 0, 255]]).unwrap();
        let s = GradientStrip::build(3, 8, &p, true, Direction::Up, 3).unwrap();
        assert_eq!(s.pixels.dimensions(), (3, 8));
        assert_eq!(s.pixels.get_pixel(0, 7).0, [255, 0, 0]);
        assert_eq!(s.pixels.get_pixel(0, 0).0, [0, 0, 255]);

        let s = GradientStrip::build(3, 8, &p, true, Direction::Down, 3).unwrap();
        assert_eq!(s.pixels.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(s.pixels.get_pixel(0, 7).0, [0, 0, 255]);
    }

    #[test]
    fn animated_strip_repeats_the_closed_cycle() {
        // Two pairs (red->blue, blue->red), each 20 / (3 - 1) = 10 long, laid down twice.
        let s = GradientStrip::build(20, 5, &rb(), false, Direction::Left, 3).unwrap();
        assert_eq!(s.extent(), 40);
        assert_eq!(s.pixels.height(), 5);
        for x in 0..20 {
            assert_eq!(s.pixels.get_pixel(x, 0), s.pixels.get_pixel(x + 20, 0));
        }
        assert_eq!(s.pixels.get_pixel(9, 0).0, [0, 0, 255]);
    }

    #[test]
    fn fitted_single_strip_windows_match_source_size() {
        let p = Palette::new(vec![[255, 0, 0], [0, 255, 0], [0, 0, 255]]).unwrap();
        // 11 / 2 = 5 per pair leaves the strip one pixel short.
        let s = GradientStrip::build(11, 7, &p, true, Direction::Left, 3).unwrap();
        assert_eq!(s.extent(), 10);
        let fitted = s.fit_to(11, 7);
        assert_eq!(fitted.pixels.dimensions(), (11, 7));
        assert_eq!(fitted.window(0, 11, 7).len(), 11 * 7 * 3);

        // Nearest sampling only repeats colors already on the strip.
        let originals: Vec<_> = (0..10).map(|x| s.pixels.get_pixel(x, 0).0).collect();
        for x in 0..11 {
            assert!(originals.contains(&fitted.pixels.get_pixel(x, 3).0));
        }
        assert_eq!(fitted.pixels.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(fitted.pixels.get_pixel(10, 0).0, [0, 0, 255]);
    }

    #[test]
    fn window_wraps_cyclically() {
        let s = GradientStrip::build(8, 2, &rb(), false, Direction::Up, 3).unwrap();
        let extent = i64::from(s.extent());
        assert_eq!(s.window(-3, 2, 8), s.window(extent - 3, 2, 8));
        assert_eq!(s.window(0, 2, 8), s.window(extent, 2, 8));
    }

    #[test]
    fn rejects_single_color_palette() {
        let p = Palette::single([1, 2, 3]);
        assert!(GradientStrip::build(4, 4, &p, true, Direction::Up, 3).is_err());
    }
}
