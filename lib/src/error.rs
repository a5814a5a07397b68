use crate::cmyk::Cmyk;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid hex color '{0}', expected #rrggbb")]
    InvalidHex(String),

    #[error("invalid rgb color '{0}', expected r,g,b with channels in 0..=255")]
    InvalidRgb(String),

    #[error("no colors provided")]
    EmptyPalette,

    /// A channel of an ink or the target lies outside [0, 1].
    #[error("all CMYK values must be between 0 and 1, {what} is {color}")]
    OutOfRange { what: String, color: Cmyk },

    #[error("cannot normalize a color without any ink")]
    ZeroInk,

    #[error("invalid solver configuration: {0}")]
    InvalidConfig(String),

    #[error("ink index {index} out of range for palette of {len} inks")]
    InkIndex { index: usize, len: usize },

    #[error("pixel ({x}, {y}) out of bounds for image of size ({width}, {height})")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}
