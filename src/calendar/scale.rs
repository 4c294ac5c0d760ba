//! Colour scaling for the heatmap.
//!
//! Amounts are scaled against the 80th percentile of the non-zero daily
//! amounts rather than the maximum. Everything at or above that percentile is
//! drawn at full intensity, so a handful of very large days cannot wash out
//! the rest of the calendar.

use std::fmt;

use crate::calendar::grid::CalendarGrid;

const CLIP_PERCENTILE: f64 = 0.8;

/// The values the colour scale is derived from, computed once per grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleContext {
    /// The largest transaction count of any cell.
    pub max_count: usize,
    /// The amount that maps to full intensity. Always at least 1.
    pub max_amount_p80: f64,
    /// The smallest strictly positive cell amount, if any.
    pub min_positive_amount: Option<f64>,
}

/// The colour intensity of a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intensity {
    /// The cell has no amount and is drawn with the empty colour.
    Empty,
    /// A value in `(0, 1]`.
    Scaled(f64),
}

impl ScaleContext {
    /// Map `amount` onto the colour scale.
    ///
    /// Zero and negative amounts are [Intensity::Empty]. Positive amounts
    /// scale linearly up to [ScaleContext::max_amount_p80] and are clipped at 1.
    /// A positive amount never rounds down to zero.
    pub fn intensity(&self, amount: f64) -> Intensity {
        debug_assert!(
            self.max_amount_p80.is_finite() && self.max_amount_p80 >= 1.0,
            "invalid scale maximum {}",
            self.max_amount_p80
        );

        if amount <= 0.0 || amount.is_nan() {
            return Intensity::Empty;
        }

        Intensity::Scaled((amount / self.max_amount_p80).clamp(f64::MIN_POSITIVE, 1.0))
    }
}

/// Derive the scale for `grid`.
pub fn compute_scale(grid: &CalendarGrid) -> ScaleContext {
    let max_count = grid
        .cells()
        .iter()
        .map(|cell| cell.count)
        .max()
        .unwrap_or(0);

    let mut amounts: Vec<f64> = grid
        .cells()
        .iter()
        .map(|cell| cell.amount)
        .filter(|&amount| amount > 0.0 && amount.is_finite())
        .collect();
    amounts.sort_by(f64::total_cmp);

    let max_amount_p80 = percentile_clip(&amounts);

    ScaleContext {
        max_count,
        max_amount_p80,
        min_positive_amount: amounts.first().copied(),
    }
}

/// Select the value at `floor(n * 0.8)` from ascending `sorted_amounts`,
/// clamped to the last element and never less than 1.
fn percentile_clip(sorted_amounts: &[f64]) -> f64 {
    let index = (sorted_amounts.len() as f64 * CLIP_PERCENTILE).floor() as usize;

    let value = sorted_amounts
        .get(index)
        .or_else(|| sorted_amounts.last())
        .copied()
        .unwrap_or(1.0);

    value.max(1.0)
}

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// The colours used to draw a heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Colour for cells without an amount.
    pub empty: Rgb,
    /// Colour at the lowest non-zero intensity.
    pub light: Rgb,
    /// Colour at full intensity.
    pub full: Rgb,
}

impl Palette {
    /// Used for income.
    pub const GREEN: Palette = Palette {
        empty: Rgb(0xeb, 0xed, 0xf0),
        light: Rgb(0xdc, 0xfc, 0xe7),
        full: Rgb(0x16, 0xa3, 0x4a),
    };

    /// Used for expenses.
    pub const RED: Palette = Palette {
        empty: Rgb(0xeb, 0xed, 0xf0),
        light: Rgb(0xfe, 0xe2, 0xe2),
        full: Rgb(0xdc, 0x26, 0x26),
    };

    /// The fill colour for `intensity`, interpolated between `light` and `full`.
    pub fn fill(&self, intensity: Intensity) -> Rgb {
        match intensity {
            Intensity::Empty => self.empty,
            Intensity::Scaled(t) => {
                let t = t.clamp(0.0, 1.0);
                let mix = |from: u8, to: u8| -> u8 {
                    (f64::from(from) + (f64::from(to) - f64::from(from)) * t).round() as u8
                };

                Rgb(
                    mix(self.light.0, self.full.0),
                    mix(self.light.1, self.full.1),
                    mix(self.light.2, self.full.2),
                )
            }
        }
    }
}
