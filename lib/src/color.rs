//! Conversions between hex strings, RGB triples and CMYK quadruples.

use crate::cmyk::Cmyk;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A displayable color in the additive model.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    pub fn to_hex(self) -> String {
        rgb_to_hex(self.r, self.g, self.b)
    }

    pub fn to_cmyk(self) -> Cmyk {
        rgb_to_cmyk(self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Parses either a hex color or a decimal `r,g,b` triple.
impl FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        if !s.contains(',') {
            return hex_to_rgb(s).ok_or_else(|| Error::InvalidHex(s.to_string()));
        }

        let channels = s
            .split(',')
            .map(|part| part.trim().parse::<u8>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| Error::InvalidRgb(s.to_string()))?;

        match channels[..] {
            [r, g, b] => Ok(Rgb::new(r, g, b)),
            _ => Err(Error::InvalidRgb(s.to_string())),
        }
    }
}

pub fn rgb_to_cmyk(r: u8, g: u8, b: u8) -> Cmyk {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let k = (1.0 - r).min(1.0 - g).min(1.0 - b);

    // Pure black, the channel formula would divide by zero.
    if k == 1.0 {
        return Cmyk::new(0.0, 0.0, 0.0, 1.0);
    }

    let white = 1.0 - k;

    Cmyk::new(
        (1.0 - r - k) / white,
        (1.0 - g - k) / white,
        (1.0 - b - k) / white,
        k,
    )
}

fn to_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Out-of-range inks are clamped into a displayable color.
pub fn cmyk_to_rgb(cmyk: Cmyk) -> Rgb {
    let Cmyk { c, m, y, k } = cmyk;

    Rgb::new(
        to_channel(255.0 * (1.0 - c) * (1.0 - k)),
        to_channel(255.0 * (1.0 - m) * (1.0 - k)),
        to_channel(255.0 * (1.0 - y) * (1.0 - k)),
    )
}

pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

pub fn cmyk_to_hex(cmyk: Cmyk) -> String {
    cmyk_to_rgb(cmyk).to_hex()
}

/// Parses `#rrggbb` or `rrggbb` in any case. Returns `None` for anything else.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);

    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();

    Some(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

pub fn hex_to_cmyk(hex: &str) -> Result<Cmyk> {
    hex_to_rgb(hex)
        .map(Rgb::to_cmyk)
        .ok_or_else(|| Error::InvalidHex(hex.to_string()))
}
