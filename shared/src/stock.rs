//! Stock availability calculation for daily menu items
//!
//! Pure derivation of remaining quantity and a stocking tier from a
//! daily item's quantity budget. No I/O and no failure modes.

use serde::{Deserialize, Serialize};

/// Stocking tier for display-level classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockTier {
    /// No units remain
    OutOfStock,
    /// Below the low-stock threshold
    Low,
    /// At or below the medium threshold
    Medium,
    /// Comfortably stocked
    InStock,
}

impl StockTier {
    /// Display label matching what the admin tables render
    pub fn label(&self) -> &'static str {
        match self {
            Self::OutOfStock => "SOLD OUT",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::InStock => "IN STOCK",
        }
    }
}

/// Tier thresholds. Policy, not law: configurable per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockPolicy {
    /// Available quantities strictly below this are Low
    pub low_below: i32,
    /// Available quantities at or below this (and not Low) are Medium
    pub medium_max: i32,
}

impl Default for StockPolicy {
    fn default() -> Self {
        Self {
            low_below: 5,
            medium_max: 10,
        }
    }
}

impl StockPolicy {
    /// Classify an already-computed available quantity
    pub fn tier(&self, available_qty: i32) -> StockTier {
        if available_qty <= 0 {
            StockTier::OutOfStock
        } else if available_qty < self.low_below {
            StockTier::Low
        } else if available_qty <= self.medium_max {
            StockTier::Medium
        } else {
            StockTier::InStock
        }
    }
}

/// Remaining quantity, clamped at zero. Sold counts can legitimately
/// overshoot the budget when the backing store races; the derived
/// availability never goes negative.
pub fn available_qty(initial_qty: i32, sold_qty: i32) -> i32 {
    (initial_qty - sold_qty).max(0)
}

/// Derive the remaining quantity and its stocking tier
pub fn availability(initial_qty: i32, sold_qty: i32, policy: &StockPolicy) -> (i32, StockTier) {
    let available = available_qty(initial_qty, sold_qty);
    (available, policy.tier(available))
}
