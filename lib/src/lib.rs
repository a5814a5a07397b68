//! Convert between hex, RGB and CMYK colors and find how to mix a palette of
//! inks into a target color.

pub mod chart;
pub mod cmyk;
pub mod color;
pub mod error;
pub mod mixer;
pub mod palette;
pub mod picker;
#[cfg(feature = "svg")]
pub mod svg;

pub use cmyk::Cmyk;
pub use color::{
    cmyk_to_hex, cmyk_to_rgb, hex_to_cmyk, hex_to_rgb, rgb_to_cmyk, rgb_to_hex, Rgb,
};
pub use error::{Error, Result};
pub use mixer::{calculate_ratios, MixResult, SolverConfig, Termination};
pub use palette::{Palette, Session};
