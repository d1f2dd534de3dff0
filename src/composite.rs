use crate::{
    error::{NeonError, NeonResult},
    frame::{AlphaMask, RasterFrame, Rgb},
};

pub type StraightRgba8 = [u8; 4];

/// Source-over of an opaque-colored source with coverage `alpha` onto a straight-alpha pixel.
pub fn over(dst: StraightRgba8, src: Rgb, alpha: u8) -> StraightRgba8 {
    if alpha == 0 {
        return dst;
    }
    if alpha == 255 {
        return [src[0], src[1], src[2], 255];
    }

    let sa = u32::from(alpha);
    let inv = 255 - sa;
    let dst_weight = u32::from(dst[3]) * inv;
    let out_a255 = sa * 255 + dst_weight;

    let mut out = [0u8; 4];
    out[3] = ((out_a255 + 127) / 255) as u8;
    for i in 0..3 {
        let num = u32::from(src[i]) * sa * 255 + u32::from(dst[i]) * dst_weight;
        out[i] = ((num + out_a255 / 2) / out_a255).min(255) as u8;
    }
    out
}

/// Stack `layer` onto `mask`, using the layer as its own stencil.
pub fn stack_layer(mask: &mut AlphaMask, layer: &[u8]) -> NeonResult<()> {
    if mask.data.len() != layer.len() {
        return Err(NeonError::unsupported_input(
            "stack_layer expects a layer matching the mask size",
        ));
    }
    for (m, &l) in mask.data.iter_mut().zip(layer) {
        *m = add_sat_u8(l, mul_div255(u16::from(*m), 255 - u16::from(l)));
    }
    Ok(())
}

/// Paint a single color through `mask` onto `canvas`.
pub fn paint_solid(canvas: &mut RasterFrame, mask: &AlphaMask, color: Rgb) -> NeonResult<()> {
    check_mask(canvas, mask)?;
    for (d, &m) in canvas.data.chunks_exact_mut(4).zip(&mask.data) {
        let out = over([d[0], d[1], d[2], d[3]], color, m);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Paint a packed RGB8 source of the canvas' size through `mask` onto `canvas`.
pub fn paint_rgb(canvas: &mut RasterFrame, mask: &AlphaMask, src: &[u8]) -> NeonResult<()> {
    check_mask(canvas, mask)?;
    if src.len() != mask.data.len() * 3 {
        return Err(NeonError::unsupported_input(
            "paint_rgb expects an rgb8 source matching the canvas size",
        ));
    }
    for ((d, s), &m) in canvas
        .data
        .chunks_exact_mut(4)
        .zip(src.chunks_exact(3))
        .zip(&mask.data)
    {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2]], m);
        d.copy_from_slice(&out);
    }
    Ok(())
}

fn check_mask(canvas: &RasterFrame, mask: &AlphaMask) -> NeonResult<()> {
    if canvas.width != mask.width || canvas.height != mask.height {
        return Err(NeonError::unsupported_input(format!(
            "mask {}x{} does not match canvas {}x{}",
            mask.width, mask.height, canvas.width, canvas.height
        )));
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_alpha_0_is_noop() {
        let dst = [1, 2, 3, 4];
        assert_eq!(over(dst, [200, 200, 200], 0), dst);
    }

    #[test]
    fn over_transparent_dst_keeps_exact_color() {
        for a in [1u8, 17, 128, 254] {
            assert_eq!(over([0, 0, 0, 0], [250, 10, 99], a), [250, 10, 99, a]);
        }
    }

    #[test]
    fn over_opaque_dst_blends() {
        let out = over([0, 0, 0, 255], [255, 255, 255], 128);
        assert_eq!(out[3], 255);
        assert_eq!(out[0], 128);
    }

    #[test]
    fn stack_layer_is_alpha_over() {
        let mut mask = AlphaMask {
            width: 3,
            height: 1,
            data: vec![0, 100, 255],
        };
        stack_layer(&mut mask, &[50, 0, 10]).unwrap();
        assert_eq!(mask.data, vec![50, 100, 255]);

        let mut mask = AlphaMask {
            width: 1,
            height: 1,
            data: vec![100],
        };
        stack_layer(&mut mask, &[128]).unwrap();
        // 128 + 100 * 127 / 255
        assert_eq!(mask.data, vec![178]);
    }

    #[test]
    fn paint_solid_rejects_mismatched_mask() {
        let mut canvas = RasterFrame::transparent(2, 2);
        let mask = AlphaMask::empty(3, 2);
        assert!(paint_solid(&mut canvas, &mask, [1, 2, 3]).is_err());
    }
}
