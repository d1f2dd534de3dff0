use serde::{Deserialize, Serialize};

use crate::{
    error::{NeonError, NeonResult},
    frame::Rgb,
};

/// Ordered, non-empty list of glow colors.
///
/// A single entry renders a flat glow; two or more enable breathing and gradients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Palette(Vec<Rgb>);

impl Palette {
    pub fn new(colors: Vec<Rgb>) -> NeonResult<Self> {
        if colors.is_empty() {
            return Err(NeonError::config("palette must contain at least one color"));
        }
        Ok(Self(colors))
    }

    pub fn single(color: Rgb) -> Self {
        Self(vec![color])
    }

    /// Build from loosely typed rows, rejecting anything that is not an RGB triple in 0..=255.
    pub fn from_rows(rows: &[Vec<i64>]) -> NeonResult<Self> {
        let colors = rows
            .iter()
            .enumerate()
            .map(|(i, row)| triple_from_components(row).map_err(|e| index_err(i, e)))
            .collect::<NeonResult<Vec<_>>>()?;
        Self::new(colors)
    }

    pub fn from_json(value: &serde_json::Value) -> NeonResult<Self> {
        serde_json::from_value(value.clone())
            .map_err(|e| NeonError::config(format!("invalid palette: {e}")))
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_flat(&self) -> bool {
        self.0.len() == 1
    }

    pub fn first(&self) -> Rgb {
        self.0[0]
    }

    /// Colors with the first one appended again, closing the cycle.
    pub fn cycled(&self) -> Vec<Rgb> {
        let mut out = self.0.clone();
        out.push(self.0[0]);
        out
    }
}

impl<'de> Deserialize<'de> for Palette {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum ColorRepr {
            Hex(String),
            Arr(Vec<i64>),
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Triple(Vec<i64>),
            List(Vec<ColorRepr>),
        }

        let colors = match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => vec![parse_hex(&s).map_err(serde::de::Error::custom)?],
            Repr::Triple(v) => {
                vec![triple_from_components(&v).map_err(serde::de::Error::custom)?]
            }
            Repr::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, c)| {
                    match c {
                        ColorRepr::Hex(s) => parse_hex(&s),
                        ColorRepr::Arr(v) => triple_from_components(&v),
                    }
                    .map_err(|e| serde::de::Error::custom(format!("color {i}: {e}")))
                })
                .collect::<Result<Vec<_>, _>>()?,
        };
        Palette::new(colors).map_err(serde::de::Error::custom)
    }
}

/// Parse `#rrggbb`, `rrggbb` or `r,g,b`.
pub fn parse_color(s: &str) -> NeonResult<Rgb> {
    let s = s.trim();
    if s.contains(',') {
        let comps = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<i64>()
                    .map_err(|_| format!("invalid channel \"{}\"", p.trim()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(NeonError::config)?;
        return triple_from_components(&comps).map_err(NeonError::config);
    }
    parse_hex(s).map_err(NeonError::config)
}

fn parse_hex(s: &str) -> Result<Rgb, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if s.len() != 6 || !s.is_ascii() {
        return Err("hex color must be #RRGGBB (case-insensitive)".to_owned());
    }
    Ok([hex_byte(&s[0..2])?, hex_byte(&s[2..4])?, hex_byte(&s[4..6])?])
}

fn triple_from_components(v: &[i64]) -> Result<Rgb, String> {
    if v.len() != 3 {
        return Err(format!("rgb color must have 3 channels, got {}", v.len()));
    }
    let mut out = [0u8; 3];
    for (slot, &c) in out.iter_mut().zip(v) {
        *slot = u8::try_from(c).map_err(|_| format!("channel {c} is outside 0..=255"))?;
    }
    Ok(out)
}

fn index_err(i: usize, e: String) -> NeonError {
    NeonError::config(format!("palette color {i}: {e}"))
}

/// `steps` colors walking from `start` toward (but not including) `end`.
///
/// Channel `c` of step `i` is `start[c] - trunc(i * (start[c] - end[c]) / steps)`.
pub fn color_range(start: Rgb, end: Rgb, steps: u32) -> Vec<Rgb> {
    if steps == 0 {
        return Vec::new();
    }
    let delta: [f64; 3] =
        std::array::from_fn(|c| (f64::from(start[c]) - f64::from(end[c])) / f64::from(steps));
    (0..steps)
        .map(|i| {
            std::array::from_fn(|c| {
                let shift = (delta[c] * f64::from(i)) as i32;
                (i32::from(start[c]) - shift).clamp(0, 255) as u8
            })
        })
        .collect()
}

/// Walk the palette as a closed loop, `steps` colors per adjacent pair.
pub fn breathing_cycle(palette: &Palette, steps: u32) -> Vec<Rgb> {
    palette
        .cycled()
        .windows(2)
        .flat_map(|pair| color_range(pair[0], pair[1], steps))
        .collect()
}
