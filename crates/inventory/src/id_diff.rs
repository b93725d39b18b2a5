//! Insert-candidate detection: application ids with no inventory counterpart.

use std::collections::HashSet;

use skusync_core::SkuBatchId;

use crate::record::{ApplicationRecord, InventoryRecord};

/// Application ids absent from the inventory side, in application order.
///
/// An id repeated on the application side is reported once (first position).
pub fn missing_from_inventory(application: &[SkuBatchId], inventory: &[SkuBatchId]) -> Vec<SkuBatchId> {
    let known: HashSet<&SkuBatchId> = inventory.iter().collect();
    let mut seen: HashSet<&SkuBatchId> = HashSet::new();

    application
        .iter()
        .filter(|id| !known.contains(id) && seen.insert(*id))
        .cloned()
        .collect()
}

/// [`missing_from_inventory`] over full snapshots.
pub fn insert_candidates(application: &[ApplicationRecord], inventory: &[InventoryRecord]) -> Vec<SkuBatchId> {
    let app_ids: Vec<SkuBatchId> = application.iter().map(|r| r.sku_batch_id.clone()).collect();
    let inv_ids: Vec<SkuBatchId> = inventory.iter().map(|r| r.sku_batch_id.clone()).collect();
    missing_from_inventory(&app_ids, &inv_ids)
}
