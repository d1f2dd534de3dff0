//! Per-output-frame state for the neon effect.
//!
//! [`AnimationSequencer`] picks a [`Mode`] from the palette and gradient setting, owns the
//! scroll position or color cursor for one invocation, and drives [`compose`] once per
//! output frame.

use crate::{
    color::{Palette, breathing_cycle, color_range},
    composite,
    config::{Direction, EffectConfig, GradientMode},
    error::{NeonError, NeonResult},
    frame::{AlphaMask, RasterFrame, Rgb},
    gradient::GradientStrip,
    outline::extract_mask,
    preprocess::preprocess,
};

/// Duration assumed for source frames that carry none.
pub const DEFAULT_FRAME_DURATION_MS: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// One color, one frame.
    Flat,
    /// Cyclic walk through the palette, one color per frame.
    Breathing,
    /// One frame painted with the whole palette as a gradient.
    StaticGradient,
    /// A frame-sized window sliding along a looping gradient.
    AnimatedGradient,
}

impl Mode {
    pub fn select(palette: &Palette, gradient: GradientMode) -> Self {
        if palette.is_flat() {
            return Self::Flat;
        }
        match gradient {
            GradientMode::None => Self::Breathing,
            GradientMode::Static => Self::StaticGradient,
            GradientMode::Animated => Self::AnimatedGradient,
        }
    }

    /// Whether a still source renders to exactly one frame.
    pub fn is_single(self) -> bool {
        matches!(self, Self::Flat | Self::StaticGradient)
    }
}

/// What gets painted through the mask.
#[derive(Clone, Copy, Debug)]
pub enum Paint<'a> {
    /// A flat color; breathing frames use this with the cursor's current color.
    Solid(Rgb),
    /// The frame-sized slice of `strip` starting `offset` pixels along its axis.
    Window {
        strip: &'a GradientStrip,
        offset: i64,
    },
}

/// Paint `paint` through `mask` onto a fresh canvas: a copy of `frame` when `overlay`,
/// otherwise a transparent buffer of the same size.
pub fn compose(
    frame: &RasterFrame,
    mask: &AlphaMask,
    overlay: bool,
    paint: Paint<'_>,
) -> NeonResult<RasterFrame> {
    let mut canvas = if overlay {
        frame.clone().with_duration(None)
    } else {
        RasterFrame::transparent(frame.width, frame.height)
    };
    match paint {
        Paint::Solid(color) => composite::paint_solid(&mut canvas, mask, color)?,
        Paint::Window { strip, offset } => {
            let window = strip.window(offset, frame.width, frame.height);
            composite::paint_rgb(&mut canvas, mask, &window)?;
        }
    }
    Ok(canvas)
}

/// Split `total` into `parts` integers differing by at most one, larger ones first.
pub fn even_steps(total: u64, parts: usize) -> Vec<u64> {
    if parts == 0 {
        return Vec::new();
    }
    let (step, rem) = (total / parts as u64, (total % parts as u64) as usize);
    let mut out = vec![step + 1; rem];
    out.resize(parts, step);
    out
}

/// Signed scroll position along the gradient axis plus its step schedule.
///
/// Positions are negated to get the window offset into the strip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrollState {
    pub position: i64,
    steps: Vec<i64>,
    cursor: usize,
    fallback: i64,
}

impl ScrollState {
    pub fn new(position: i64, steps: Vec<i64>, fallback: i64) -> Self {
        Self {
            position,
            steps,
            cursor: 0,
            fallback,
        }
    }

    pub fn advance(&mut self) {
        let delta = self.steps.get(self.cursor).copied().unwrap_or(self.fallback);
        self.cursor += 1;
        self.position += delta;
    }
}

/// Scroll positions for a still source with an animated gradient.
///
/// `dim * per_color / 100` pixels are spread over 100 ticks; the scroll decrements from zero
/// until it passes minus half the strip. Every step moves at least one pixel.
pub fn still_scroll_positions(dim: u32, per_color: u32, strip_extent: u32) -> Vec<i64> {
    let total = u64::from(dim) * u64::from(per_color);
    let (step, rem) = ((total / 100) as i64, (total % 100) as usize);
    let steps = vec![-(step + 1); rem];
    let mut state = ScrollState::new(0, steps, -step.max(1));
    let min_pos = -i64::from(strip_extent / 2);

    let mut out = Vec::new();
    while state.position > min_pos {
        out.push(state.position);
        state.advance();
    }
    out
}

/// Scroll positions for an animated source: half the strip spread over `frames` frames.
pub fn animated_source_scroll_positions(
    strip_extent: u32,
    dim: u32,
    frames: usize,
    direction: Direction,
) -> Vec<i64> {
    let reversed = direction.is_reversed();
    let steps: Vec<i64> = even_steps(u64::from(strip_extent / 2), frames)
        .into_iter()
        .map(|s| if reversed { s as i64 } else { -(s as i64) })
        .collect();
    let start = if reversed {
        -(i64::from(strip_extent) - i64::from(dim))
    } else {
        0
    };
    let mut state = ScrollState::new(start, steps, 0);
    (0..frames)
        .map(|_| {
            let p = state.position;
            state.advance();
            p
        })
        .collect()
}

/// Colors for a breathing animated source: one per frame, `frames` in total.
///
/// Frames are split evenly across palette pairs (remainder to the first pairs) and each
/// pair contributes its interpolated sub-range.
pub fn distribute_colors(palette: &Palette, frames: usize) -> Vec<Rgb> {
    let counts = even_steps(frames as u64, palette.len());
    palette
        .cycled()
        .windows(2)
        .zip(counts)
        .flat_map(|(pair, n)| color_range(pair[0], pair[1], n as u32))
        .collect()
}

/// Output of a still source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NeonOutput {
    Still(RasterFrame),
    Frames(Vec<RasterFrame>),
}

impl NeonOutput {
    pub fn frame_count(&self) -> usize {
        match self {
            Self::Still(_) => 1,
            Self::Frames(f) => f.len(),
        }
    }

    pub fn into_frames(self) -> Vec<RasterFrame> {
        match self {
            Self::Still(f) => vec![f],
            Self::Frames(f) => f,
        }
    }
}

/// Output of an animated source; `durations[i]` belongs to `frames[i]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Animation {
    pub frames: Vec<RasterFrame>,
    pub durations: Vec<u32>,
}

pub struct AnimationSequencer<'a> {
    palette: &'a Palette,
    cfg: &'a EffectConfig,
    mode: Mode,
}

impl<'a> AnimationSequencer<'a> {
    pub fn new(palette: &'a Palette, cfg: &'a EffectConfig) -> NeonResult<Self> {
        cfg.validate()?;
        if palette.is_empty() {
            return Err(NeonError::config("palette must contain at least one color"));
        }
        let mode = Mode::select(palette, cfg.gradient);
        tracing::debug!(?mode, colors = palette.len(), "selected neon mode");
        Ok(Self { palette, cfg, mode })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn sequence_still(&self, source: &RasterFrame) -> NeonResult<NeonOutput> {
        let single = self.mode.is_single();
        let im = preprocess(source, single, self.cfg)?;
        let mask = extract_mask(&im, single, false, self.cfg)?;
        let overlay = self.cfg.overlay;

        let out = match self.mode {
            Mode::Flat => NeonOutput::Still(compose(
                &im,
                &mask,
                overlay,
                Paint::Solid(self.palette.first()),
            )?),
            Mode::StaticGradient => {
                let strip = self.static_strip(&im)?;
                NeonOutput::Still(compose(
                    &im,
                    &mask,
                    overlay,
                    Paint::Window {
                        strip: &strip,
                        offset: 0,
                    },
                )?)
            }
            Mode::Breathing => {
                let colors = breathing_cycle(self.palette, self.cfg.resolved_per_color());
                let frames = colors
                    .into_iter()
                    .map(|c| compose(&im, &mask, overlay, Paint::Solid(c)))
                    .collect::<NeonResult<Vec<_>>>()?;
                NeonOutput::Frames(frames)
            }
            Mode::AnimatedGradient => {
                let direction = self.cfg.direction;
                let strip = GradientStrip::build(
                    im.width,
                    im.height,
                    self.palette,
                    false,
                    direction,
                    self.cfg.resolved_colors_per_frame(false),
                )?;
                let dim = axis_dim(&im, strip.horizontal);
                let positions =
                    still_scroll_positions(dim, self.cfg.resolved_per_color(), strip.extent());
                tracing::debug!(
                    frames = positions.len(),
                    extent = strip.extent(),
                    "scrolling gradient over still source"
                );
                let mut frames = positions
                    .into_iter()
                    .map(|p| {
                        compose(
                            &im,
                            &mask,
                            overlay,
                            Paint::Window {
                                strip: &strip,
                                offset: -p,
                            },
                        )
                    })
                    .collect::<NeonResult<Vec<_>>>()?;
                if direction.is_reversed() {
                    frames.reverse();
                }
                NeonOutput::Frames(frames)
            }
        };
        tracing::debug!(frames = out.frame_count(), "sequenced still source");
        Ok(out)
    }

    pub fn sequence_frames(&self, sources: &[RasterFrame]) -> NeonResult<Animation> {
        let n = sources.len();
        if n < 2 {
            return Err(NeonError::unsupported_input(format!(
                "animated source needs at least 2 frames, got {n}"
            )));
        }
        let size = sources[0].size();
        if let Some(bad) = sources.iter().position(|f| f.size() != size) {
            return Err(NeonError::unsupported_input(format!(
                "frame {bad} is {}x{}, expected {}x{}",
                sources[bad].width, sources[bad].height, size.0, size.1
            )));
        }
        if self.mode == Mode::Breathing && self.palette.len() >= n {
            return Err(NeonError::config(format!(
                "too many colors ({}) for {n} source frames",
                self.palette.len()
            )));
        }

        let overlay = self.cfg.overlay;
        let mut cursor = ColorCursor::new(match self.mode {
            Mode::Breathing => distribute_colors(self.palette, n),
            _ => vec![self.palette.first()],
        });

        let mut strip: Option<GradientStrip> = None;
        let mut scroll: Option<Vec<i64>> = None;
        let mut frames = Vec::with_capacity(n);
        let mut durations = Vec::with_capacity(n);

        for (i, source) in sources.iter().enumerate() {
            let duration = source.duration_ms.unwrap_or(DEFAULT_FRAME_DURATION_MS);
            let im = preprocess(source, false, self.cfg)?;
            let mask = extract_mask(&im, self.mode.is_single(), true, self.cfg)?;

            let frame = match self.mode {
                Mode::Flat | Mode::Breathing => {
                    let color = cursor.next_color();
                    compose(&im, &mask, overlay, Paint::Solid(color))?
                }
                Mode::StaticGradient => {
                    if strip.is_none() {
                        strip = Some(self.static_strip(&im)?);
                    }
                    let strip = strip.as_ref().ok_or_else(|| {
                        NeonError::config("internal error: static strip missing")
                    })?;
                    compose(&im, &mask, overlay, Paint::Window { strip, offset: 0 })?
                }
                Mode::AnimatedGradient => {
                    if strip.is_none() {
                        let built = self.animated_source_strip(&im)?;
                        scroll = Some(animated_source_scroll_positions(
                            built.extent(),
                            axis_dim(&im, built.horizontal),
                            n,
                            self.cfg.direction,
                        ));
                        strip = Some(built);
                    }
                    let (Some(strip), Some(scroll)) = (strip.as_ref(), scroll.as_ref()) else {
                        return Err(NeonError::config("internal error: scroll state missing"));
                    };
                    compose(
                        &im,
                        &mask,
                        overlay,
                        Paint::Window {
                            strip,
                            offset: -scroll[i],
                        },
                    )?
                }
            };
            frames.push(frame.with_duration(Some(duration)));
            durations.push(duration);
        }

        tracing::debug!(frames = frames.len(), mode = ?self.mode, "sequenced animated source");
        Ok(Animation { frames, durations })
    }

    fn static_strip(&self, im: &RasterFrame) -> NeonResult<GradientStrip> {
        let strip = GradientStrip::build(
            im.width,
            im.height,
            self.palette,
            true,
            self.cfg.direction,
            self.cfg.resolved_colors_per_frame(false),
        )?;
        Ok(strip.fit_to(im.width, im.height))
    }

    fn animated_source_strip(&self, im: &RasterFrame) -> NeonResult<GradientStrip> {
        let direction = self.cfg.direction;
        let mut strip = GradientStrip::build(
            im.width,
            im.height,
            self.palette,
            false,
            direction,
            self.cfg.resolved_colors_per_frame(true),
        )?;
        if matches!(direction, Direction::Up | Direction::Right) {
            strip.rotate_180();
        }
        Ok(strip)
    }
}

/// Cyclic cursor over a fixed color list.
#[derive(Clone, Debug)]
struct ColorCursor {
    colors: Vec<Rgb>,
    index: usize,
}

impl ColorCursor {
    fn new(colors: Vec<Rgb>) -> Self {
        Self { colors, index: 0 }
    }

    fn next_color(&mut self) -> Rgb {
        let c = self.colors[self.index % self.colors.len()];
        self.index += 1;
        c
    }
}

fn axis_dim(im: &RasterFrame, horizontal: bool) -> u32 {
    if horizontal { im.width } else { im.height }
}
