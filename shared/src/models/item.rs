//! Catalog item models
//!
//! `MasterItem` is catalog truth with stable identity. `DailyItem` is
//! the per-cycle provisioned snapshot entry; its master reference is
//! optional on the wire because the backing store does not enforce
//! foreign-key population (the reconciliation engine resolves it).

use crate::stock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Master catalog entry, created and edited by administrators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterItem {
    pub id: String,
    pub name: String,
    /// Price in cents
    pub price: i64,
    pub category: String,
}

/// Daily menu snapshot entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyItem {
    /// Surrogate key assigned by the catalog service on creation
    pub daily_id: String,
    /// Foreign key to [`MasterItem`]; may be absent upstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_item_id: Option<String>,
    /// Denormalized name snapshot, used for fallback identity matching
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    /// Denormalized price snapshot in cents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_price: Option<i64>,
    /// Denormalized category snapshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_category: Option<String>,
    #[serde(default)]
    pub initial_qty: i32,
    #[serde(default)]
    pub sold_qty: i32,
}

impl DailyItem {
    /// Remaining units, never negative
    pub fn available_qty(&self) -> i32 {
        stock::available_qty(self.initial_qty, self.sold_qty)
    }
}

/// Create payload for a daily item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyItemCreate {
    pub master_item_id: String,
    pub initial_qty: i32,
}

/// Candidate daily entry not yet persisted
///
/// Client-side only; identified by a temporary draft id and discarded
/// when the selection is abandoned. Never sent to the server as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningDraft {
    pub draft_id: Uuid,
    pub master_item_id: String,
    pub item_name: String,
    /// Unit price in cents, snapshotted from the master item
    pub unit_price: i64,
    pub initial_qty: i32,
    pub sold_qty: i32,
}

impl ProvisioningDraft {
    /// Draft a master item with a seed quantity and nothing sold
    pub fn from_master(master: &MasterItem, seed_qty: i32) -> Self {
        Self {
            draft_id: Uuid::new_v4(),
            master_item_id: master.id.clone(),
            item_name: master.name.clone(),
            unit_price: master.price,
            initial_qty: seed_qty,
            sold_qty: 0,
        }
    }

    /// Create payload for persisting this draft
    pub fn to_create(&self) -> DailyItemCreate {
        DailyItemCreate {
            master_item_id: self.master_item_id.clone(),
            initial_qty: self.initial_qty,
        }
    }
}
