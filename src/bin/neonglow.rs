use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, ValueEnum};

use neonglow::{Direction, EffectConfig, GradientMode, Palette, RasterFrame, Sharpen, codec};

#[derive(Parser, Debug)]
#[command(name = "neonglow", version, about = "Neon glow outlines for images and GIFs")]
struct Cli {
    /// Input image (PNG, JPEG, GIF, ...).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output path; `.gif` forces GIF, otherwise single frames are written as PNG.
    #[arg(long)]
    out: PathBuf,

    /// Glow color as `#rrggbb` or `r,g,b`; repeat for a palette.
    #[arg(long = "color", required = true)]
    colors: Vec<String>,

    /// Effect config JSON; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    gradient: Option<GradientArg>,

    /// up, down, left or right.
    #[arg(long)]
    direction: Option<String>,

    /// Render over the dimmed source instead of a transparent canvas.
    #[arg(long)]
    overlay: bool,

    #[arg(long)]
    no_sharp: bool,

    #[arg(long)]
    no_soft: bool,

    /// Frames per color (breathing) or percent of size moved per tick (gradient).
    #[arg(long)]
    per_color: Option<u32>,

    #[arg(long)]
    colors_per_frame: Option<u32>,

    #[arg(long)]
    saturation: Option<f32>,

    #[arg(long, value_enum)]
    sharpen: Option<SharpenArg>,

    #[arg(long)]
    max_size: Option<u32>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GradientArg {
    None,
    Static,
    Animated,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SharpenArg {
    Sharpen,
    EdgeEnhance,
    EdgeEnhanceMore,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = build_config(&cli)?;
    let palette = Palette::new(
        cli.colors
            .iter()
            .map(|c| neonglow::parse_color(c))
            .collect::<Result<Vec<_>, _>>()?,
    )?;

    let bytes = std::fs::read(&cli.in_path)
        .with_context(|| format!("read input '{}'", cli.in_path.display()))?;
    let frames = codec::decode_frames(&bytes)?;

    let outputs: Vec<RasterFrame> = if frames.len() >= 2 {
        neonglow::render_animated(&frames, &palette, &cfg)?.frames
    } else {
        neonglow::render_static(&frames[0], &palette, &cfg)?.into_frames()
    };

    write_output(&cli.out, &outputs)?;
    eprintln!("wrote {} ({} frame(s))", cli.out.display(), outputs.len());
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn build_config(cli: &Cli) -> anyhow::Result<EffectConfig> {
    let mut cfg = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read config '{}'", path.display()))?;
            EffectConfig::from_json_str(&text)?
        }
        None => EffectConfig::default(),
    };

    if let Some(g) = cli.gradient {
        cfg.gradient = match g {
            GradientArg::None => GradientMode::None,
            GradientArg::Static => GradientMode::Static,
            GradientArg::Animated => GradientMode::Animated,
        };
    }
    if let Some(d) = &cli.direction {
        cfg.direction = Direction::parse(d);
    }
    if let Some(s) = cli.sharpen {
        cfg.sharpen = Some(match s {
            SharpenArg::Sharpen => Sharpen::Sharpen,
            SharpenArg::EdgeEnhance => Sharpen::EdgeEnhance,
            SharpenArg::EdgeEnhanceMore => Sharpen::EdgeEnhanceMore,
        });
    }
    cfg.overlay |= cli.overlay;
    if cli.no_sharp {
        cfg.sharp = false;
    }
    if cli.no_soft {
        cfg.soft = false;
    }
    cfg.per_color = cli.per_color.or(cfg.per_color);
    cfg.colors_per_frame = cli.colors_per_frame.or(cfg.colors_per_frame);
    cfg.saturation = cli.saturation.or(cfg.saturation);
    cfg.max_size = cli.max_size.or(cfg.max_size);

    cfg.validate()?;
    Ok(cfg)
}

fn write_output(out: &Path, frames: &[RasterFrame]) -> anyhow::Result<()> {
    let as_gif = frames.len() > 1
        || out
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("gif"));
    let bytes = if as_gif {
        codec::encode_gif(frames, codec::DEFAULT_STATIC_DELAY_MS)?
    } else {
        codec::encode_png(&frames[0])?
    };

    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(out, bytes).with_context(|| format!("write output '{}'", out.display()))?;
    Ok(())
}
