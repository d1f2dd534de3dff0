use crate::{
    color::Palette,
    config::EffectConfig,
    error::{NeonError, NeonResult},
    frame::RasterFrame,
    sequencer::{Animation, AnimationSequencer, NeonOutput},
};

/// Render the neon effect for a still source.
///
/// Returns [`NeonOutput::Still`] for a flat color or a static gradient, and
/// [`NeonOutput::Frames`] for breathing or an animated gradient.
///
/// Pipeline:
/// 1. [`preprocess`](crate::preprocess)
/// 2. [`extract_mask`](crate::extract_mask)
/// 3. [`GradientStrip::build`](crate::GradientStrip::build) when a gradient is requested
/// 4. [`compose`](crate::compose) once per output frame
///
/// All validation happens before any pixel work.
#[tracing::instrument(skip_all, fields(width = frame.width, height = frame.height, colors = palette.len()))]
pub fn render_static(
    frame: &RasterFrame,
    palette: &Palette,
    cfg: &EffectConfig,
) -> NeonResult<NeonOutput> {
    check_frame(frame, 0)?;
    let sequencer = AnimationSequencer::new(palette, cfg)?;
    sequencer.sequence_still(frame)
}

/// Render the neon effect for a multi-frame source.
///
/// Requires at least two frames; the output has exactly one frame and one duration per
/// source frame. Missing source durations default to 10 ms.
#[tracing::instrument(skip_all, fields(frames = frames.len(), colors = palette.len()))]
pub fn render_animated(
    frames: &[RasterFrame],
    palette: &Palette,
    cfg: &EffectConfig,
) -> NeonResult<Animation> {
    if frames.len() < 2 {
        return Err(NeonError::unsupported_input(format!(
            "animated source needs at least 2 frames, got {}",
            frames.len()
        )));
    }
    for (i, f) in frames.iter().enumerate() {
        check_frame(f, i)?;
    }
    let sequencer = AnimationSequencer::new(palette, cfg)?;
    sequencer.sequence_frames(frames)
}

/// [`render_static`] as a future, so callers can interleave independent jobs.
///
/// The work runs to completion on first poll; there are no internal suspension points.
pub async fn render_static_async(
    frame: RasterFrame,
    palette: Palette,
    cfg: EffectConfig,
) -> NeonResult<NeonOutput> {
    render_static(&frame, &palette, &cfg)
}

/// [`render_animated`] as a future; see [`render_static_async`].
pub async fn render_animated_async(
    frames: Vec<RasterFrame>,
    palette: Palette,
    cfg: EffectConfig,
) -> NeonResult<Animation> {
    render_animated(&frames, &palette, &cfg)
}

fn check_frame(frame: &RasterFrame, index: usize) -> NeonResult<()> {
    let expected = (frame.width as usize) * (frame.height as usize) * 4;
    if frame.width == 0 || frame.height == 0 || frame.data.len() != expected {
        return Err(NeonError::unsupported_input(format!(
            "frame {index} buffer ({} bytes) does not match {}x{} rgba",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }
    Ok(())
}
