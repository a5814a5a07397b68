//! Data for composition charts: channel shares of a color and ink shares of
//! a mix, both in whole percent.

use crate::cmyk::Cmyk;
use crate::color;
use serde::{Deserialize, Serialize};

pub const CHANNEL_NAMES: [&str; 4] = ["Cyan", "Magenta", "Yellow", "Key (Black)"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartEntry {
    pub name: String,
    pub value: i64,
}

impl ChartEntry {
    fn new(name: impl Into<String>, value: f64) -> Self {
        ChartEntry {
            name: name.into(),
            value: value.round() as i64,
        }
    }
}

/// Share of each channel in the total ink of `cmyk`. A color without ink
/// yields zero for every channel.
pub fn composition(cmyk: Cmyk) -> Vec<ChartEntry> {
    let shares = cmyk.normalize(100.0).unwrap_or(Cmyk::WHITE);

    CHANNEL_NAMES
        .iter()
        .zip(shares.channels())
        .map(|(name, share)| ChartEntry::new(*name, share))
        .collect()
}

/// One entry per ink, named by its 1-based slot.
pub fn ratio_chart(ratios: &[f64]) -> Vec<ChartEntry> {
    ratios
        .iter()
        .enumerate()
        .map(|(index, ratio)| ChartEntry::new((index + 1).to_string(), ratio * 100.0))
        .collect()
}

/// Hex colors of the four process inks, used when slices have no color of
/// their own.
pub fn default_chart_colors() -> [String; 4] {
    [Cmyk::CYAN, Cmyk::MAGENTA, Cmyk::YELLOW, Cmyk::KEY].map(color::cmyk_to_hex)
}

pub fn error_percent(error: f64) -> i64 {
    (error * 100.0).round() as i64
}
