//! Fan-out of application SkuBatches into per-warehouse inventory records.

use std::collections::HashMap;

use skusync_core::{SkuBatchId, WmsId};

use crate::record::{
    ApplicationRecord, EXPANDED_QUANTITY_PER_UNIT_OF_MEASURE, ExpandedInventoryRecord, WarehouseSet,
};

/// One record per warehouse, in warehouse-set order.
///
/// `quantity_per_unit_of_measure` is always 1: the per-unit quantity belongs to
/// the batch, not to each warehouse placement.
pub fn expand_record(
    record: &ApplicationRecord,
    wms_id: &WmsId,
    warehouses: &WarehouseSet,
) -> Vec<ExpandedInventoryRecord> {
    warehouses
        .iter()
        .map(|warehouse_id| ExpandedInventoryRecord {
            sku_batch_id: record.sku_batch_id.clone(),
            sku_id: record.sku_id.clone(),
            wms_id: wms_id.clone(),
            quantity_per_unit_of_measure: EXPANDED_QUANTITY_PER_UNIT_OF_MEASURE,
            is_archived: false,
            is_deleted: false,
            warehouse_id: warehouse_id.clone(),
        })
        .collect()
}

/// Result of expanding a list of insert candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    pub records: Vec<ExpandedInventoryRecord>,
    /// Candidates with no application record.
    pub missing_application: Vec<SkuBatchId>,
    /// Candidates whose WMS id could not be resolved.
    pub unresolved_wms: Vec<SkuBatchId>,
}

impl Expansion {
    pub fn skipped(&self) -> usize {
        self.missing_application.len() + self.unresolved_wms.len()
    }
}

/// Expand every candidate id, skipping (and recording) the ones that cannot be expanded.
///
/// Records come out grouped by candidate, in candidate order.
pub fn expand_candidates<F>(
    candidates: &[SkuBatchId],
    application: &[ApplicationRecord],
    warehouses: &WarehouseSet,
    mut resolve_wms_id: F,
) -> Expansion
where
    F: FnMut(&SkuBatchId) -> Option<WmsId>,
{
    let mut by_id: HashMap<&SkuBatchId, &ApplicationRecord> = HashMap::with_capacity(application.len());
    for record in application {
        by_id.entry(&record.sku_batch_id).or_insert(record);
    }

    let mut out = Expansion {
        records: Vec::with_capacity(candidates.len() * warehouses.len()),
        ..Expansion::default()
    };

    for id in candidates {
        let Some(record) = by_id.get(id) else {
            out.missing_application.push(id.clone());
            continue;
        };
        let Some(wms_id) = resolve_wms_id(id) else {
            out.unresolved_wms.push(id.clone());
            continue;
        };
        out.records.extend(expand_record(record, &wms_id, warehouses));
    }

    out
}
