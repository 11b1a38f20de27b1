//! One-step threshold rule.
//!
//! Compares the current price only to the sample taken on the previous
//! cycle. A drop larger than `drop_fraction` with no position opens a
//! long; a rise larger than `rise_fraction` with a position closes it.
//! There is no reference price and no trailing stop: an oscillating
//! series can open and close repeatedly.

use serde::{Deserialize, Serialize};

/// Default 1% move in either direction.
pub const DEFAULT_THRESHOLD: f64 = 0.01;

/// What the strategy should do this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Open,
    Close,
    Hold,
}

impl Action {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
            Self::Hold => "hold",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-fraction momentum/reversal rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdRule {
    /// Fractional drop that triggers an open (0.01 = 1%).
    drop_fraction: f64,
    /// Fractional rise that triggers a close.
    rise_fraction: f64,
}

impl Default for ThresholdRule {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD, DEFAULT_THRESHOLD)
    }
}

impl ThresholdRule {
    /// Create a rule with explicit drop/rise fractions.
    pub const fn new(drop_fraction: f64, rise_fraction: f64) -> Self {
        Self {
            drop_fraction,
            rise_fraction,
        }
    }

    /// Price below which a long is opened.
    pub fn open_below(&self, last_price: f64) -> f64 {
        last_price * (1.0 - self.drop_fraction)
    }

    /// Price above which an open position is closed.
    pub fn close_above(&self, last_price: f64) -> f64 {
        last_price * (1.0 + self.rise_fraction)
    }

    /// Decide the action for `price` given the previous sample and
    /// whether a position is held. No previous sample always holds.
    pub fn decide(&self, price: f64, last_price: Option<f64>, has_position: bool) -> Action {
        let Some(last) = last_price else {
            return Action::Hold;
        };

        if !has_position && price < self.open_below(last) {
            Action::Open
        } else if has_position && price > self.close_above(last) {
            Action::Close
        } else {
            Action::Hold
        }
    }
}
