use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul};

/// Ink coverage in the subtractive model. Channels are nominally in [0, 1] but
/// arithmetic does not clamp unless noted.
#[derive(Copy, Clone, Default, Serialize, Deserialize)]
pub struct Cmyk {
    pub c: f64,
    pub m: f64,
    pub y: f64,
    pub k: f64,
}

impl Cmyk {
    pub const CYAN: Cmyk = Cmyk::new(1.0, 0.0, 0.0, 0.0);
    pub const MAGENTA: Cmyk = Cmyk::new(0.0, 1.0, 0.0, 0.0);
    pub const YELLOW: Cmyk = Cmyk::new(0.0, 0.0, 1.0, 0.0);
    pub const KEY: Cmyk = Cmyk::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Cmyk = Cmyk::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(c: f64, m: f64, y: f64, k: f64) -> Self {
        Cmyk { c, m, y, k }
    }

    /// Channels in fixed c, m, y, k order.
    pub fn channels(&self) -> [f64; 4] {
        [self.c, self.m, self.y, self.k]
    }

    pub fn from_channels([c, m, y, k]: [f64; 4]) -> Self {
        Cmyk::new(c, m, y, k)
    }

    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Cmyk::new(f(self.c), f(self.m), f(self.y), f(self.k))
    }

    fn zip(self, other: Self, f: impl Fn(f64, f64) -> f64) -> Self {
        Cmyk::new(
            f(self.c, other.c),
            f(self.m, other.m),
            f(self.y, other.y),
            f(self.k, other.k),
        )
    }

    pub fn total_ink(&self) -> f64 {
        self.channels().iter().sum()
    }

    /// True if every channel lies within [0, 1]. NaN channels are invalid.
    pub fn is_valid(&self) -> bool {
        self.channels()
            .iter()
            .all(|value| (0.0..=1.0).contains(value))
    }

    /// Scale the channels so that they add up to `base`.
    pub fn normalize(self, base: f64) -> Result<Self> {
        let total = self.total_ink();

        if total == 0.0 || !total.is_finite() {
            return Err(Error::ZeroInk);
        }

        Ok(self.map(|value| value * base / total))
    }

    /// Element-wise absolute difference.
    pub fn diff(self, other: Self) -> Self {
        self.zip(other, |a, b| (a - b).abs())
    }

    /// Element-wise addition saturating at full coverage.
    pub fn sum(self, other: Self) -> Self {
        self.zip(other, |a, b| (a + b).min(1.0))
    }

    pub fn multiply(self, scalar: f64) -> Self {
        self.map(|value| value * scalar)
    }

    /// L1 distance between two colors.
    pub fn diff_error(self, other: Self) -> f64 {
        self.diff(other).total_ink()
    }
}

impl fmt::Debug for Cmyk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cmyk")
            .field("c", &self.c)
            .field("m", &self.m)
            .field("y", &self.y)
            .field("k", &self.k)
            .finish()
    }
}

impl fmt::Display for Cmyk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cmyk({}, {}, {}, {})",
            self.c, self.m, self.y, self.k
        )
    }
}

/// Unclamped addition, used to accumulate weighted mixes.
impl Add for Cmyk {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.zip(other, |a, b| a + b)
    }
}

impl AddAssign for Cmyk {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Mul<f64> for Cmyk {
    type Output = Self;

    fn mul(self, scale: f64) -> Self {
        self.multiply(scale)
    }
}

impl PartialEq for Cmyk {
    fn eq(&self, other: &Self) -> bool {
        self.diff_error(*other) < 0.00001
    }
}
