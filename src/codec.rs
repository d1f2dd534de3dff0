//! Decoding inputs into [`RasterFrame`]s and encoding results to PNG / looping GIF.
//!
//! This sits outside the effect itself; the pipeline only ever sees decoded frames.

use std::io::Cursor;

use anyhow::Context;
use image::{
    AnimationDecoder, Delay, Frame, ImageFormat,
    codecs::gif::{GifDecoder, GifEncoder, Repeat},
};

use crate::{
    error::{NeonError, NeonResult},
    frame::RasterFrame,
};

/// Per-frame delay used for animations rendered from a still source.
pub const DEFAULT_STATIC_DELAY_MS: u32 = 50;

/// Decode every frame of `bytes`. Animated GIFs yield one frame per GIF frame with its delay;
/// everything else yields a single frame.
pub fn decode_frames(bytes: &[u8]) -> NeonResult<Vec<RasterFrame>> {
    let format = image::guess_format(bytes).context("detect image format")?;
    if format == ImageFormat::Gif {
        return decode_gif(bytes);
    }
    let dyn_img = image::load_from_memory_with_format(bytes, format)
        .context("decode image from memory")?;
    Ok(vec![RasterFrame::from_rgba_image(dyn_img.to_rgba8())])
}

fn decode_gif(bytes: &[u8]) -> NeonResult<Vec<RasterFrame>> {
    let decoder = GifDecoder::new(Cursor::new(bytes)).context("open gif decoder")?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .context("decode gif frames")?;
    if frames.is_empty() {
        return Err(NeonError::codec("gif contains no frames"));
    }
    Ok(frames
        .into_iter()
        .map(|f| {
            let (numer, denom) = f.delay().numer_denom_ms();
            let ms = if denom == 0 { 0 } else { numer / denom };
            let duration = (ms > 0).then_some(ms);
            RasterFrame::from_rgba_image(f.into_buffer()).with_duration(duration)
        })
        .collect())
}

pub fn encode_png(frame: &RasterFrame) -> NeonResult<Vec<u8>> {
    let img = frame.to_rgba_image()?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

/// Encode an infinitely looping GIF. Frames without a duration use `fallback_delay_ms`.
pub fn encode_gif(frames: &[RasterFrame], fallback_delay_ms: u32) -> NeonResult<Vec<u8>> {
    if frames.is_empty() {
        return Err(NeonError::codec("cannot encode a gif with no frames"));
    }
    let mut buf = Vec::new();
    {
        let mut encoder = GifEncoder::new_with_speed(&mut buf, 10);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| NeonError::codec(format!("set gif repeat: {e}")))?;
        for frame in frames {
            let delay_ms = frame.duration_ms.unwrap_or(fallback_delay_ms);
            let delay = Delay::from_numer_denom_ms(delay_ms, 1);
            encoder
                .encode_frame(Frame::from_parts(frame.to_rgba_image()?, 0, 0, delay))
                .map_err(|e| NeonError::codec(format!("encode gif frame: {e}")))?;
        }
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_roundtrip_keeps_pixels() {
        let mut f = RasterFrame::filled(3, 2, [10, 20, 30, 255]);
        f.put_pixel(1, 1, [200, 0, 100, 128]);
        let bytes = encode_png(&f).unwrap();
        let decoded = decode_frames(&bytes).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].data, f.data);
    }

    #[test]
    fn gif_keeps_frame_count_and_delays() {
        let frames = vec![
            RasterFrame::filled(4, 4, [255, 0, 0, 255]).with_duration(Some(40)),
            RasterFrame::filled(4, 4, [0, 0, 255, 255]),
        ];
        let bytes = encode_gif(&frames, 70).unwrap();
        let decoded = decode_frames(&bytes).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].duration_ms, Some(40));
        assert_eq!(decoded[1].duration_ms, Some(70));
        assert_eq!(decoded[0].size(), (4, 4));
    }

    #[test]
    fn encode_gif_rejects_empty_input() {
        assert!(encode_gif(&[], 10).is_err());
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(decode_frames(b"not an image").is_err());
    }
}
