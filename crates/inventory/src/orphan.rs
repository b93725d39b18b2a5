//! Disposition of inventory records that have no application counterpart.
//!
//! The delta finder only reports orphans; what happens to them is decided by an
//! [`OrphanClassifier`] supplied by the caller.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use skusync_core::SkuBatchId;

use crate::record::InventoryRecord;
use crate::update::{FieldUpdate, InventoryField, SkuBatchUpdate};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanDisposition {
    /// Mark `isArchived = true`.
    Archived,
    /// Mark `isDeleted = true`.
    Deleted,
    /// Leave the record untouched.
    Ignore,
}

/// Decides the disposition of one orphaned SkuBatch.
pub trait OrphanClassifier: Send + Sync {
    fn classify(&self, sku_batch_id: &SkuBatchId) -> OrphanDisposition;
}

impl<F> OrphanClassifier for F
where
    F: Fn(&SkuBatchId) -> OrphanDisposition + Send + Sync,
{
    fn classify(&self, sku_batch_id: &SkuBatchId) -> OrphanDisposition {
        self(sku_batch_id)
    }
}

/// Default classifier: orphans are reported but never written.
#[derive(Debug, Copy, Clone, Default)]
pub struct IgnoreOrphans;

impl OrphanClassifier for IgnoreOrphans {
    fn classify(&self, _sku_batch_id: &SkuBatchId) -> OrphanDisposition {
        OrphanDisposition::Ignore
    }
}

/// Applies the same disposition to every orphan.
#[derive(Debug, Copy, Clone)]
pub struct UniformDisposition(pub OrphanDisposition);

impl OrphanClassifier for UniformDisposition {
    fn classify(&self, _sku_batch_id: &SkuBatchId) -> OrphanDisposition {
        self.0
    }
}

/// Updates produced by classifying `orphans`, in orphan order.
///
/// An orphan that already carries the requested flag yields nothing.
pub fn orphan_updates(
    orphans: &[SkuBatchId],
    inventory: &[InventoryRecord],
    classifier: &dyn OrphanClassifier,
) -> Vec<SkuBatchUpdate> {
    let mut by_id: HashMap<&SkuBatchId, &InventoryRecord> = HashMap::with_capacity(inventory.len());
    for record in inventory {
        by_id.entry(&record.sku_batch_id).or_insert(record);
    }

    let mut seen: HashSet<&SkuBatchId> = HashSet::with_capacity(orphans.len());
    orphans
        .iter()
        .filter(|id| seen.insert(*id))
        .filter_map(|id| {
            let current = by_id.get(id);
            let field = match classifier.classify(id) {
                OrphanDisposition::Ignore => return None,
                OrphanDisposition::Archived if current.is_some_and(|r| r.is_archived) => return None,
                OrphanDisposition::Deleted if current.is_some_and(|r| r.is_deleted) => return None,
                OrphanDisposition::Archived => InventoryField::IsArchived,
                OrphanDisposition::Deleted => InventoryField::IsDeleted,
            };
            SkuBatchUpdate::new(id.clone(), vec![FieldUpdate::new(field, true)])
        })
        .collect()
}
