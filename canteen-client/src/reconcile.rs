//! Catalog reconciliation engine
//!
//! Merges the master catalog with the persisted daily snapshot:
//! resolves which daily entries correspond to which master items and
//! drafts provisioning candidates for selected masters that are not
//! already on today's menu. Pure functions over owned data; all I/O
//! belongs to the provisioning coordinator.
//!
//! Identity resolution is heuristic by necessity: the backing store
//! does not enforce foreign-key population on daily rows. The chain is
//! (1) explicit master reference, (2) case-insensitive name match,
//! (3) the daily row's own surrogate id as a last resort. Non-explicit
//! resolutions are surfaced, never silently patched.

use shared::models::{DailyItem, MasterItem, ProvisioningDraft};
use shared::stock::{self, StockPolicy, StockTier};
use std::collections::HashSet;
use tracing::warn;
use uuid::Uuid;

/// How a daily entry was tied back to a master item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    /// Explicit `master_item_id` resolved against the catalog
    ForeignKey,
    /// Case-insensitive name match
    NameMatch,
    /// The daily row's surrogate id, when nothing else resolved
    Surrogate,
}

/// A daily entry with its resolved master reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDaily {
    pub daily: DailyItem,
    /// Canonical master reference used for duplicate detection
    pub master_ref: String,
    pub source: MatchSource,
}

/// Display row for the daily menu, classified by stock tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuRow {
    pub daily_id: String,
    pub master_ref: String,
    pub item_name: String,
    /// Unit price in cents
    pub unit_price: i64,
    pub available_qty: i32,
    pub tier: StockTier,
}

/// Outcome of reconciling a selection against the snapshot
#[derive(Debug, Default)]
pub struct Reconciliation {
    /// Candidates to provision, one per newly selected master item
    pub drafts: Vec<ProvisioningDraft>,
    /// Selected masters already present in the snapshot; a user-visible
    /// notice, not a silent no-op
    pub already_provisioned: Vec<MasterItem>,
    /// Selected ids with no master catalog entry
    pub unknown_ids: Vec<String>,
    /// Daily entries whose master reference required the fallback chain
    pub fallback_matches: Vec<ResolvedDaily>,
}

/// Resolve a daily entry's master reference through the fallback chain
pub fn resolve_master_ref(daily: &DailyItem, catalog: &[MasterItem]) -> (String, MatchSource) {
    if let Some(id) = &daily.master_item_id {
        if catalog.iter().any(|m| &m.id == id) {
            return (id.clone(), MatchSource::ForeignKey);
        }
    }
    if let Some(name) = &daily.item_name {
        let needle = name.trim().to_lowercase();
        if let Some(master) = catalog
            .iter()
            .find(|m| m.name.trim().to_lowercase() == needle)
        {
            return (master.id.clone(), MatchSource::NameMatch);
        }
    }
    (daily.daily_id.clone(), MatchSource::Surrogate)
}

/// Resolve the whole snapshot, keeping track of fallback matches
pub fn resolve_snapshot(snapshot: &[DailyItem], catalog: &[MasterItem]) -> Vec<ResolvedDaily> {
    snapshot
        .iter()
        .map(|daily| {
            let (master_ref, source) = resolve_master_ref(daily, catalog);
            if source != MatchSource::ForeignKey {
                warn!(
                    daily_id = %daily.daily_id,
                    master_ref = %master_ref,
                    source = ?source,
                    "daily item resolved without an explicit master reference"
                );
            }
            ResolvedDaily {
                daily: daily.clone(),
                master_ref,
                source,
            }
        })
        .collect()
}

/// Draft provisioning candidates for the selected master items
///
/// Iterates the catalog (not the selection) so draft order is
/// deterministic. Running this twice against the same snapshot yields
/// no drafts the second time: everything provisioned lands in
/// `already_provisioned` instead.
pub fn reconcile(
    selected_master_ids: &HashSet<String>,
    catalog: &[MasterItem],
    snapshot: &[DailyItem],
    seed_qty: i32,
) -> Reconciliation {
    let resolved = resolve_snapshot(snapshot, catalog);
    let provisioned: HashSet<&str> = resolved.iter().map(|r| r.master_ref.as_str()).collect();

    let mut result = Reconciliation {
        fallback_matches: resolved
            .iter()
            .filter(|r| r.source != MatchSource::ForeignKey)
            .cloned()
            .collect(),
        ..Default::default()
    };

    for master in catalog {
        if !selected_master_ids.contains(&master.id) {
            continue;
        }
        if provisioned.contains(master.id.as_str()) {
            result.already_provisioned.push(master.clone());
        } else {
            result
                .drafts
                .push(ProvisioningDraft::from_master(master, seed_qty));
        }
    }

    let known: HashSet<&str> = catalog.iter().map(|m| m.id.as_str()).collect();
    result.unknown_ids = selected_master_ids
        .iter()
        .filter(|id| !known.contains(id.as_str()))
        .cloned()
        .collect();
    result.unknown_ids.sort();

    result
}

/// Build display rows for the daily snapshot
///
/// Name and price come from the daily row's own snapshot fields when
/// present, falling back to the resolved master entry.
pub fn menu_rows(
    snapshot: &[DailyItem],
    catalog: &[MasterItem],
    policy: &StockPolicy,
) -> Vec<MenuRow> {
    resolve_snapshot(snapshot, catalog)
        .into_iter()
        .map(|resolved| {
            let master = catalog.iter().find(|m| m.id == resolved.master_ref);
            let item_name = resolved
                .daily
                .item_name
                .clone()
                .or_else(|| master.map(|m| m.name.clone()))
                .unwrap_or_else(|| "Unknown Item".to_string());
            let unit_price = resolved
                .daily
                .item_price
                .or_else(|| master.map(|m| m.price))
                .unwrap_or(0);
            let (available_qty, tier) = stock::availability(
                resolved.daily.initial_qty,
                resolved.daily.sold_qty,
                policy,
            );
            MenuRow {
                daily_id: resolved.daily.daily_id,
                master_ref: resolved.master_ref,
                item_name,
                unit_price,
                available_qty,
                tier,
            }
        })
        .collect()
}

/// Edit a draft's quantity in place; false when no draft matches
pub fn set_draft_qty(drafts: &mut [ProvisioningDraft], draft_id: Uuid, qty: i32) -> bool {
    match drafts.iter_mut().find(|d| d.draft_id == draft_id) {
        Some(draft) => {
            draft.initial_qty = qty.max(0);
            true
        }
        None => false,
    }
}

/// Discard a draft locally; false when no draft matches
pub fn remove_draft(drafts: &mut Vec<ProvisioningDraft>, draft_id: Uuid) -> bool {
    let before = drafts.len();
    drafts.retain(|d| d.draft_id != draft_id);
    drafts.len() < before
}
