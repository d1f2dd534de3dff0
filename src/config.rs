use serde::{Deserialize, Serialize};

use crate::error::{NeonError, NeonResult};

pub const DEFAULT_OVERLAY_BRIGHTNESS: f32 = 0.85;
pub const DEFAULT_SATURATION: f32 = 0.7;
pub const DEFAULT_COLORS_PER_FRAME: u32 = 3;
pub const DEFAULT_ANIMATED_SOURCE_COLORS_PER_FRAME: u32 = 2;
pub const DEFAULT_STILL_MAX_SIZE: u32 = 512;
pub const DEFAULT_ANIMATED_MAX_SIZE: u32 = 256;

/// How the glow color varies across space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientMode {
    #[default]
    None,
    Static,
    Animated,
}

impl GradientMode {
    pub fn from_code(code: i64) -> NeonResult<Self> {
        match code {
            0 => Ok(Self::None),
            1 => Ok(Self::Static),
            2 => Ok(Self::Animated),
            _ => Err(NeonError::config(format!(
                "gradient must be 0 (none), 1 (static) or 2 (animated), got {code}"
            ))),
        }
    }

    pub fn from_name(name: &str) -> NeonResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(Self::None),
            "static" => Ok(Self::Static),
            "animated" => Ok(Self::Animated),
            other => Err(NeonError::config(format!("unknown gradient mode '{other}'"))),
        }
    }

    pub fn is_gradient(self) -> bool {
        self != Self::None
    }
}

impl<'de> Deserialize<'de> for GradientMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match CodeOrName::deserialize(deserializer)? {
            CodeOrName::Code(c) => Self::from_code(c),
            CodeOrName::Name(n) => Self::from_name(&n),
        }
        .map_err(serde::de::Error::custom)
    }
}

/// Gradient orientation and scroll direction.
///
/// Codes follow the wire convention: up 0, right 1, down 2, left 3.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "snake_case")]
pub enum Direction {
    Up,
    #[default]
    Right,
    Down,
    Left,
}

impl Direction {
    /// Parse a direction token; anything unrecognized falls back to `Right`.
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "u" | "up" => Self::Up,
            "d" | "down" => Self::Down,
            "l" | "left" => Self::Left,
            _ => Self::Right,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Up => 0,
            Self::Right => 1,
            Self::Down => 2,
            Self::Left => 3,
        }
    }

    pub fn is_horizontal(self) -> bool {
        self.code() % 2 == 1
    }

    /// Right and down render as the mirror of left and up.
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::Right | Self::Down)
    }
}

impl From<String> for Direction {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

/// Pre-contour sharpening kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sharpen {
    Sharpen,
    EdgeEnhance,
    EdgeEnhanceMore,
}

impl Sharpen {
    /// Unknown selectors are ignored rather than rejected.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Sharpen),
            1 => Some(Self::EdgeEnhance),
            2 => Some(Self::EdgeEnhanceMore),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "sharpen" => Some(Self::Sharpen),
            "edge_enhance" => Some(Self::EdgeEnhance),
            "edge_enhance_more" => Some(Self::EdgeEnhanceMore),
            _ => None,
        }
    }
}

fn deserialize_sharpen<'de, D>(deserializer: D) -> Result<Option<Sharpen>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<CodeOrName>::deserialize(deserializer)? {
        None => None,
        Some(CodeOrName::Code(c)) => Sharpen::from_code(c),
        Some(CodeOrName::Name(n)) => Sharpen::from_name(&n),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CodeOrName {
    Code(i64),
    Name(String),
}

/// Every tunable of the neon effect.
///
/// `None` on a numeric option means "use the mode-dependent default"; an explicit value,
/// including zero, is used as given.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectConfig {
    pub sharp: bool,
    pub soft: bool,
    pub overlay: bool,
    pub brightness: Option<f32>,
    pub gradient: GradientMode,
    pub direction: Direction,
    pub colors_per_frame: Option<u32>,
    pub per_color: Option<u32>,
    pub saturation: Option<f32>,
    #[serde(deserialize_with = "deserialize_sharpen")]
    pub sharpen: Option<Sharpen>,
    pub sharp_brightness: Option<f32>,
    pub soft_brightness: Option<f32>,
    pub soft_softness: Option<f32>,
    pub max_size: Option<u32>,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            sharp: true,
            soft: true,
            overlay: false,
            brightness: None,
            gradient: GradientMode::None,
            direction: Direction::Right,
            colors_per_frame: None,
            per_color: None,
            saturation: None,
            sharpen: None,
            sharp_brightness: None,
            soft_brightness: None,
            soft_softness: None,
            max_size: None,
        }
    }
}

impl EffectConfig {
    pub fn from_json(value: &serde_json::Value) -> NeonResult<Self> {
        let cfg: Self = serde_json::from_value(value.clone())
            .map_err(|e| NeonError::config(format!("invalid effect config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(s: &str) -> NeonResult<Self> {
        let value: serde_json::Value = serde_json::from_str(s)
            .map_err(|e| NeonError::config(format!("effect config is not JSON: {e}")))?;
        Self::from_json(&value)
    }

    pub fn validate(&self) -> NeonResult<()> {
        if !self.sharp && !self.soft {
            return Err(NeonError::config("sharp and soft cannot both be disabled"));
        }
        if self.per_color == Some(0) {
            return Err(NeonError::config("per_color must be >= 1"));
        }
        if let Some(n) = self.colors_per_frame
            && n < 2
        {
            return Err(NeonError::config("colors_per_frame must be >= 2"));
        }
        if self.max_size == Some(0) {
            return Err(NeonError::config("max_size must be >= 1"));
        }
        for (name, v) in [
            ("brightness", self.brightness),
            ("saturation", self.saturation),
            ("sharp_brightness", self.sharp_brightness),
            ("soft_brightness", self.soft_brightness),
            ("soft_softness", self.soft_softness),
        ] {
            if let Some(v) = v
                && (!v.is_finite() || v < 0.0)
            {
                return Err(NeonError::config(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }

    pub fn overlay_brightness(&self) -> f32 {
        self.brightness.unwrap_or(DEFAULT_OVERLAY_BRIGHTNESS)
    }

    pub fn saturation_factor(&self) -> f32 {
        self.saturation.unwrap_or(DEFAULT_SATURATION)
    }

    pub fn resolved_per_color(&self) -> u32 {
        self.per_color
            .unwrap_or(if self.gradient.is_gradient() { 10 } else { 8 })
    }

    pub fn resolved_colors_per_frame(&self, animated_source: bool) -> u32 {
        self.colors_per_frame.unwrap_or(if animated_source {
            DEFAULT_ANIMATED_SOURCE_COLORS_PER_FRAME
        } else {
            DEFAULT_COLORS_PER_FRAME
        })
    }

    pub fn resolved_max_size(&self, single: bool) -> u32 {
        self.max_size.unwrap_or(if single {
            DEFAULT_STILL_MAX_SIZE
        } else {
            DEFAULT_ANIMATED_MAX_SIZE
        })
    }

    pub fn resolved_sharp_brightness(&self, single: bool, multi: bool) -> f32 {
        self.sharp_brightness
            .unwrap_or(if single && !multi { 3.0 } else { 2.0 })
    }

    pub fn resolved_soft_brightness(&self, single: bool, multi: bool) -> f32 {
        self.soft_brightness
            .unwrap_or(if single && !multi { 1.9 } else { 1.5 })
    }

    pub fn resolved_soft_softness(&self) -> f32 {
        self.soft_softness
            .unwrap_or(if self.overlay { 7.0 } else { 14.0 })
    }
}
