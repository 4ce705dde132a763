use std::{fmt::Display, ops::Deref};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percentage(f64);

impl Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl Percentage {
    pub const ZERO: Percentage = Percentage(0.);
    pub const FULL: Percentage = Percentage(100.);

    /// Clamps the value into 0..=100. NaN turns into 0.
    pub fn clamped(value: f64) -> Percentage {
        if value.is_nan() {
            return Self::ZERO;
        }
        Percentage(value.clamp(0., 100.))
    }

    /// Whole number representation used when printing progress bars.
    pub fn whole(&self) -> u8 {
        self.0.floor() as u8
    }
}

impl Deref for Percentage {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Part of `value` relative to `whole`, clamped to 100%. An empty `whole` counts as fully done.
pub fn ratio_percentage(value: u64, whole: u64) -> Percentage {
    if whole == 0 {
        return Percentage::FULL;
    }
    Percentage::clamped(value as f64 / whole as f64 * 100.)
}
