//! Maps reading time onto the colour levels of the grid and the progress shown by `status`.

use std::fmt::Display;

use ansi_term::Colour;

use crate::{
    config::Thresholds,
    utils::percentage::{ratio_percentage, Percentage},
};

/// Colours of the grid from no reading to the most reading.
pub const PALETTE: [(u8, u8, u8); 5] = [
    (0xeb, 0xed, 0xf0),
    (0x9b, 0xe9, 0xa8),
    (0x40, 0xc4, 0x63),
    (0x30, 0xa1, 0x4e),
    (0x21, 0x6e, 0x39),
];

/// Characters used instead of colours when output isn't a terminal.
const PLAIN_CELLS: [char; 5] = ['.', '-', '+', '*', '#'];

pub const MAX_LEVEL: u8 = (PALETTE.len() - 1) as u8;

/// Colour index of a day, `0..=MAX_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Level(u8);

impl Level {
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn colour(&self) -> Colour {
        let (r, g, b) = PALETTE[self.index()];
        Colour::RGB(r, g, b)
    }

    pub fn plain_cell(&self) -> char {
        PLAIN_CELLS[self.index()]
    }

    pub fn all() -> impl Iterator<Item = Level> {
        (0..=MAX_LEVEL).map(Level)
    }
}

/// Days below `min` are not coloured. From `min` to `max` the remaining levels are spread
/// evenly, anything at or above `max` gets the darkest colour.
pub fn level_for(seconds: u64, thresholds: Thresholds) -> Level {
    let min = thresholds.min_seconds();
    let max = thresholds.max_seconds();
    if seconds == 0 || seconds < min {
        return Level(0);
    }
    if max <= min {
        return Level(MAX_LEVEL);
    }

    let coloured_levels = u64::from(MAX_LEVEL - 1);
    let capped = seconds.min(max);
    let step = coloured_levels * (capped - min) / (max - min);
    Level((1 + step).min(u64::from(MAX_LEVEL)) as u8)
}

/// Threshold a day has reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Milestone {
    Nothing,
    Min,
    Goal,
    Max,
}

impl Display for Milestone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Milestone::Nothing => write!(f, "no level"),
            Milestone::Min => write!(f, "first level"),
            Milestone::Goal => write!(f, "daily goal"),
            Milestone::Max => write!(f, "maximum level"),
        }
    }
}

impl Milestone {
    pub fn reached(seconds: u64, thresholds: Thresholds) -> Milestone {
        if seconds >= thresholds.max_seconds() {
            Milestone::Max
        } else if seconds >= thresholds.goal_seconds() {
            Milestone::Goal
        } else if seconds >= thresholds.min_seconds() && seconds > 0 {
            Milestone::Min
        } else {
            Milestone::Nothing
        }
    }

    /// Next threshold to work towards and the seconds still missing.
    pub fn next(seconds: u64, thresholds: Thresholds) -> Option<(Milestone, u64)> {
        let target = match Milestone::reached(seconds, thresholds) {
            Milestone::Nothing => (Milestone::Min, thresholds.min_seconds()),
            Milestone::Min => (Milestone::Goal, thresholds.goal_seconds()),
            Milestone::Goal => (Milestone::Max, thresholds.max_seconds()),
            Milestone::Max => return None,
        };
        Some((target.0, target.1.saturating_sub(seconds).max(1)))
    }
}

/// Progress through the day split into bands: 0-30% up to `min`, 30-60% up to the goal and
/// 60-100% up to `max`.
pub fn progress(seconds: u64, thresholds: Thresholds) -> Percentage {
    let min = thresholds.min_seconds();
    let goal = thresholds.goal_seconds();
    let max = thresholds.max_seconds();

    let (band_start, band_width, from, to) = if seconds >= max {
        return Percentage::FULL;
    } else if seconds >= goal {
        (60., 40., goal, max)
    } else if seconds >= min {
        (30., 30., min, goal)
    } else {
        (0., 30., 0, min)
    };

    let within = *ratio_percentage(seconds - from, to - from) / 100.;
    Percentage::clamped(band_start + (within * band_width).floor())
}
