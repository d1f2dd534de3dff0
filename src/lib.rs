#![forbid(unsafe_code)]

pub mod blur;
pub mod codec;
pub mod color;
pub mod composite;
pub mod config;
pub mod error;
pub mod filter;
pub mod frame;
pub mod gradient;
pub mod outline;
pub mod pipeline;
pub mod preprocess;
pub mod sequencer;

pub use color::{Palette, breathing_cycle, color_range, parse_color};
pub use config::{Direction, EffectConfig, GradientMode, Sharpen};
pub use error::{NeonError, NeonResult};
pub use frame::{AlphaMask, RasterFrame, Rgb};
pub use gradient::GradientStrip;
pub use outline::extract_mask;
pub use pipeline::{render_animated, render_animated_async, render_static, render_static_async};
pub use preprocess::preprocess;
pub use sequencer::{
    Animation, AnimationSequencer, DEFAULT_FRAME_DURATION_MS, Mode, NeonOutput, Paint, compose,
};
