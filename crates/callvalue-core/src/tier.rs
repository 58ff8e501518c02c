//! Lead-quality tiers and their value multipliers.
//!
//! [`TIER_TABLE`] is the single place where score thresholds and monetary
//! multipliers are defined.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    VeryPoor,
    Poor,
    Fair,
    Good,
    VeryGood,
}

/// `(tier, inclusive lower bound on score percent, multiplier)`, highest band first.
pub const TIER_TABLE: [(Tier, f64, Decimal); 5] = [
    (Tier::VeryGood, 80.0, Decimal::from_parts(100, 0, 0, false, 2)),
    (Tier::Good, 60.0, Decimal::from_parts(75, 0, 0, false, 2)),
    (Tier::Fair, 40.0, Decimal::from_parts(50, 0, 0, false, 2)),
    (Tier::Poor, 20.0, Decimal::from_parts(25, 0, 0, false, 2)),
    (Tier::VeryPoor, f64::NEG_INFINITY, Decimal::ZERO),
];

impl Tier {
    /// Multiplier applied to the product price for this tier.
    #[must_use]
    pub fn multiplier(self) -> Decimal {
        TIER_TABLE
            .iter()
            .find(|(tier, _, _)| *tier == self)
            .map_or(Decimal::ZERO, |(_, _, multiplier)| *multiplier)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::VeryPoor => "very_poor",
            Tier::Poor => "poor",
            Tier::Fair => "fair",
            Tier::Good => "good",
            Tier::VeryGood => "very_good",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a lead-score percentage to its tier. Lower bounds are inclusive.
///
/// `NaN` has no band and classifies as [`Tier::VeryPoor`].
#[must_use]
pub fn classify(percent: f64) -> Tier {
    TIER_TABLE
        .iter()
        .find(|(_, lower, _)| percent >= *lower)
        .map_or(Tier::VeryPoor, |(tier, _, _)| *tier)
}
