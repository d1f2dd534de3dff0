use crate::{
    config::EffectConfig,
    error::NeonResult,
    filter::{self, Kernel3},
    frame::RasterFrame,
};

/// Normalize one source frame before outline extraction.
///
/// `single` is true when the whole output is one still image; it selects the default size
/// cap. Steps run in order: size cap, optional sharpening, overlay dimming, saturation.
pub fn preprocess(
    frame: &RasterFrame,
    single: bool,
    cfg: &EffectConfig,
) -> NeonResult<RasterFrame> {
    let max_size = cfg.resolved_max_size(single);
    let mut im = filter::fit_within(frame, max_size)?;

    if let Some(kind) = cfg.sharpen {
        im = filter::convolve3x3(&im, &Kernel3::for_sharpen(kind));
    }

    if cfg.overlay {
        im = filter::brightness(&im, cfg.overlay_brightness());
    }

    let saturation = cfg.saturation_factor();
    if saturation != 1.0 {
        im = filter::saturation(&im, saturation);
    }

    tracing::trace!(
        width = im.width,
        height = im.height,
        max_size,
        "preprocessed frame"
    );
    Ok(im)
}
