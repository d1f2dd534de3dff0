use crate::{
    blur::gaussian_blur_channel,
    composite::stack_layer,
    config::EffectConfig,
    error::{NeonError, NeonResult},
    filter::{self, Kernel3},
    frame::{AlphaMask, RasterFrame},
};

/// Edge map of `frame`: bright where the image has contours, zero on the outer ring.
pub fn contour(frame: &RasterFrame) -> Vec<u8> {
    let edges = filter::convolve3x3(frame, &Kernel3::CONTOUR);
    let mut gray = filter::luma(&edges);
    filter::invert_in_place(&mut gray);
    // The contour kernel leaves the raw border behind; without this the whole frame glows.
    filter::clear_border(&mut gray, frame.width, frame.height);
    gray
}

/// Thin high-contrast layer.
pub fn sharp_outline(contour: &[u8], brightness: f32) -> Vec<u8> {
    filter::scale_channel(contour, brightness)
}

/// Wide blurred glow layer, built from the unscaled contour.
pub fn soft_outline(
    contour: &[u8],
    width: u32,
    height: u32,
    softness: f32,
    brightness: f32,
) -> NeonResult<Vec<u8>> {
    let blurred = gaussian_blur_channel(contour, width, height, softness)?;
    Ok(filter::scale_channel(&blurred, brightness))
}

/// Build the glow mask for a preprocessed frame.
///
/// The soft layer goes down first; the sharp layer is stacked on top so it wins on overlap.
/// `multi` marks frames of an animated source.
pub fn extract_mask(
    frame: &RasterFrame,
    single: bool,
    multi: bool,
    cfg: &EffectConfig,
) -> NeonResult<AlphaMask> {
    if !cfg.sharp && !cfg.soft {
        return Err(NeonError::config("sharp and soft cannot both be disabled"));
    }

    let edges = contour(frame);
    let mut mask = AlphaMask::empty(frame.width, frame.height);

    if cfg.soft {
        let soft = soft_outline(
            &edges,
            frame.width,
            frame.height,
            cfg.resolved_soft_softness(),
            cfg.resolved_soft_brightness(single, multi),
        )?;
        stack_layer(&mut mask, &soft)?;
    }

    if cfg.sharp {
        let sharp = sharp_outline(&edges, cfg.resolved_sharp_brightness(single, multi));
        stack_layer(&mut mask, &sharp)?;
    }

    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Dark square on a light background.
    fn square_frame(size: u32) -> RasterFrame {
        let mut f = RasterFrame::filled(size, size, [230, 230, 230, 255]);
        let (lo, hi) = (size / 4, size - size / 4);
        for y in lo..hi {
            for x in lo..hi {
                f.put_pixel(x, y, [20, 20, 20, 255]);
            }
        }
        f
    }

    #[test]
    fn contour_of_flat_frame_is_empty() {
        let f = RasterFrame::filled(8, 8, [40, 90, 200, 255]);
        assert!(contour(&f).iter().all(|&v| v == 0));
    }

    #[test]
    fn contour_marks_square_edges_and_clears_border() {
        let f = square_frame(16);
        let c = contour(&f);
        assert!(c.iter().any(|&v| v > 200));
        for x in 0..16 {
            assert_eq!(c[x], 0);
            assert_eq!(c[15 * 16 + x], 0);
        }
        // Interior of the square is flat.
        assert_eq!(c[8 * 16 + 8], 0);
    }

    #[test]
    fn sharp_only_mask_equals_scaled_contour() {
        let f = square_frame(16);
        let cfg = EffectConfig {
            soft: false,
            sharp_brightness: Some(1.0),
            ..EffectConfig::default()
        };
        let mask = extract_mask(&f, true, false, &cfg).unwrap();
        assert_eq!(mask.data, contour(&f));
    }

    #[test]
    fn soft_layer_spreads_beyond_the_edges() {
        let f = square_frame(32);
        let cfg = EffectConfig {
            sharp: false,
            soft_softness: Some(2.0),
            ..EffectConfig::default()
        };
        let mask = extract_mask(&f, true, false, &cfg).unwrap();
        let c = contour(&f);
        let glow_only = mask
            .data
            .iter()
            .zip(&c)
            .filter(|(m, c)| **m > 0 && **c == 0)
            .count();
        assert!(glow_only > 0);
    }

    #[test]
    fn both_layers_disabled_is_rejected() {
        let cfg = EffectConfig {
            sharp: false,
            soft: false,
            ..EffectConfig::default()
        };
        let f = RasterFrame::filled(4, 4, [0, 0, 0, 255]);
        assert!(extract_mask(&f, true, false, &cfg).unwrap_err().is_config());
    }
}
