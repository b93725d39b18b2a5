//! Field-level drift detection between application and inventory snapshots.
//!
//! The application dataset wins for every synced field. Policies are evaluated
//! in the fixed order of [`FIELD_POLICIES`], which is also the order fields
//! appear in the resulting [`SkuBatchUpdate`].

use std::collections::{HashMap, HashSet};

use skusync_core::SkuBatchId;

use crate::record::{ApplicationRecord, InventoryRecord};
use crate::update::{FieldUpdate, FieldValue, InventoryField, SkuBatchUpdate};

/// A single field's change-detection rule.
struct FieldPolicy {
    field: InventoryField,
    /// Returns the new value when the field must be written.
    detect: fn(&ApplicationRecord, &InventoryRecord) -> Option<FieldValue>,
}

const FIELD_POLICIES: [FieldPolicy; 3] = [
    FieldPolicy {
        field: InventoryField::QuantityPerUnitOfMeasure,
        detect: quantity_per_unit_of_measure,
    },
    FieldPolicy {
        field: InventoryField::SkuId,
        detect: sku_id,
    },
    FieldPolicy {
        field: InventoryField::WmsId,
        detect: wms_id,
    },
];

fn quantity_per_unit_of_measure(app: &ApplicationRecord, inv: &InventoryRecord) -> Option<FieldValue> {
    (app.quantity_per_unit_of_measure != inv.quantity_per_unit_of_measure)
        .then(|| FieldValue::Integer(app.quantity_per_unit_of_measure))
}

/// An assigned inventory sku id is downstream-owned and never overwritten.
fn sku_id(app: &ApplicationRecord, inv: &InventoryRecord) -> Option<FieldValue> {
    match &inv.sku_id {
        Some(_) => None,
        None => Some(FieldValue::Text(app.sku_id.as_str().to_string())),
    }
}

fn wms_id(app: &ApplicationRecord, inv: &InventoryRecord) -> Option<FieldValue> {
    let app_wms = app.wms_id.as_ref()?;
    (app_wms != &inv.wms_id).then(|| FieldValue::Text(app_wms.as_str().to_string()))
}

/// Compare one matching pair. `None` when nothing differs.
pub fn diff_record(app: &ApplicationRecord, inv: &InventoryRecord) -> Option<SkuBatchUpdate> {
    let updates: Vec<FieldUpdate> = FIELD_POLICIES
        .iter()
        .filter_map(|policy| {
            (policy.detect)(app, inv).map(|new_value| FieldUpdate {
                field: policy.field,
                new_value,
            })
        })
        .collect();

    SkuBatchUpdate::new(inv.sku_batch_id.clone(), updates)
}

/// Output of [`find_deltas`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeltaReport {
    /// One entry per changed record, in inventory order.
    pub updates: Vec<SkuBatchUpdate>,
    /// Inventory ids with no application record, in inventory order.
    pub orphans: Vec<SkuBatchId>,
}

impl DeltaReport {
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.orphans.is_empty()
    }
}

/// Compute field deltas for every inventory record that has an application match.
///
/// Application records missing from inventory are not a concern here (see
/// [`crate::id_diff`]). When either side repeats an id, its first record is
/// used and later ones are skipped.
pub fn find_deltas(application: &[ApplicationRecord], inventory: &[InventoryRecord]) -> DeltaReport {
    let mut by_id: HashMap<&SkuBatchId, &ApplicationRecord> = HashMap::with_capacity(application.len());
    for record in application {
        by_id.entry(&record.sku_batch_id).or_insert(record);
    }

    let mut seen: HashSet<&SkuBatchId> = HashSet::with_capacity(inventory.len());
    let mut report = DeltaReport::default();
    for inv in inventory {
        if !seen.insert(&inv.sku_batch_id) {
            continue;
        }
        match by_id.get(&inv.sku_batch_id) {
            Some(app) => report.updates.extend(diff_record(app, inv)),
            None => report.orphans.push(inv.sku_batch_id.clone()),
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use skusync_core::{SkuId, WmsId};

    fn app(id: &str, sku: &str, wms: Option<&str>, qty: i64) -> ApplicationRecord {
        ApplicationRecord {
            sku_batch_id: SkuBatchId::new(id),
            sku_id: SkuId::new(sku),
            quantity_per_unit_of_measure: qty,
            wms_id: wms.map(WmsId::new),
        }
    }

    fn inv(id: &str, sku: Option<&str>, wms: &str, qty: i64) -> InventoryRecord {
        InventoryRecord {
            sku_batch_id: SkuBatchId::new(id),
            sku_id: sku.map(SkuId::new),
            wms_id: WmsId::new(wms),
            quantity_per_unit_of_measure: qty,
            is_archived: false,
            is_deleted: false,
        }
    }

    #[test]
    fn picks_up_quantity_change() {
        let report = find_deltas(&[app("1", "1", Some("1"), 5)], &[inv("1", Some("1"), "1", 10)]);

        assert_eq!(report.updates.len(), 1);
        assert_eq!(
            report.updates[0].updates(),
            &[FieldUpdate::new(InventoryField::QuantityPerUnitOfMeasure, 5i64)]
        );
        assert!(report.orphans.is_empty());
    }

    #[test]
    fn does_not_change_sku_id_if_already_set() {
        let report = find_deltas(&[app("1", "2", Some("1"), 5)], &[inv("1", Some("1"), "1", 10)]);

        assert_eq!(report.updates.len(), 1);
        assert_eq!(
            report.updates[0].updates(),
            &[FieldUpdate::new(InventoryField::QuantityPerUnitOfMeasure, 5i64)]
        );
    }

    #[test]
    fn picks_up_sku_id_if_not_set() {
        let report = find_deltas(&[app("1", "1", Some("1"), 5)], &[inv("1", None, "1", 5)]);

        assert_eq!(report.updates.len(), 1);
        assert_eq!(report.updates[0].updates(), &[FieldUpdate::new(InventoryField::SkuId, "1")]);
    }

    #[test]
    fn picks_up_wms_id_change() {
        let report = find_deltas(&[app("1", "1", Some("2"), 10)], &[inv("1", Some("1"), "1", 10)]);

        assert_eq!(report.updates.len(), 1);
        assert_eq!(report.updates[0].sku_batch_id().as_str(), "1");
        assert_eq!(report.updates[0].updates(), &[FieldUpdate::new(InventoryField::WmsId, "2")]);
    }

    #[test]
    fn absent_application_wms_id_is_not_a_change() {
        assert!(diff_record(&app("1", "1", None, 10), &inv("1", Some("1"), "1", 10)).is_none());
    }

    #[test]
    fn fields_come_out_in_policy_order() {
        let update = diff_record(&app("1", "9", Some("7"), 3), &inv("1", None, "1", 10)).unwrap();
        let fields: Vec<InventoryField> = update.updates().iter().map(|u| u.field).collect();
        assert_eq!(
            fields,
            vec![InventoryField::QuantityPerUnitOfMeasure, InventoryField::SkuId, InventoryField::WmsId]
        );
    }

    #[test]
    fn inventory_only_ids_are_reported_as_orphans() {
        let report = find_deltas(
            &[app("1", "1", Some("1"), 1)],
            &[inv("5", Some("1"), "1", 1), inv("1", Some("1"), "1", 1), inv("6", None, "1", 1)],
        );
        assert!(report.updates.is_empty());
        assert_eq!(report.orphans, vec![SkuBatchId::new("5"), SkuBatchId::new("6")]);
    }

    #[test]
    fn repeated_inventory_rows_count_once() {
        let report = find_deltas(
            &[app("C", "1", None, 25)],
            &[
                inv("C", Some("1"), "1", 1),
                inv("C", Some("1"), "1", 1),
                inv("Z", Some("1"), "1", 1),
                inv("Z", Some("1"), "1", 1),
            ],
        );
        assert_eq!(report.updates.len(), 1);
        assert_eq!(report.updates[0].sku_batch_id(), &SkuBatchId::new("C"));
        assert_eq!(report.orphans, vec![SkuBatchId::new("Z")]);
    }

    #[test]
    fn application_only_ids_are_ignored() {
        let report = find_deltas(&[app("1", "1", Some("1"), 1), app("2", "1", Some("1"), 9)], &[]);
        assert!(report.is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a record that mirrors the application side produces no update.
        #[test]
        fn identical_records_have_no_delta(
            id in "[a-z0-9-]{1,12}",
            sku in "[a-z0-9-]{1,12}",
            wms in "[0-9]{1,6}",
            qty in any::<i64>(),
        ) {
            let a = app(&id, &sku, Some(&wms), qty);
            let i = inv(&id, Some(&sku), &wms, qty);
            prop_assert!(find_deltas(&[a], &[i]).is_empty());
        }

        /// Property: when only the quantity differs, exactly one update carries the app value.
        #[test]
        fn only_quantity_differs(qa in any::<i64>(), qi in any::<i64>()) {
            prop_assume!(qa != qi);
            let report = find_deltas(&[app("b", "s", Some("w"), qa)], &[inv("b", Some("s"), "w", qi)]);
            prop_assert_eq!(report.updates.len(), 1);
            prop_assert_eq!(
                report.updates[0].updates(),
                &[FieldUpdate::new(InventoryField::QuantityPerUnitOfMeasure, qa)]
            );
        }

        /// Property: running the detector twice over the same snapshots is deterministic.
        #[test]
        fn detection_is_deterministic(qtys in prop::collection::vec((0i64..5, 0i64..5), 0..16)) {
            let application: Vec<_> = qtys.iter().enumerate().map(|(n, (qa, _))| app(&n.to_string(), "s", Some("w"), *qa)).collect();
            let inventory: Vec<_> = qtys.iter().enumerate().map(|(n, (_, qi))| inv(&n.to_string(), Some("s"), "w", *qi)).collect();
            prop_assert_eq!(find_deltas(&application, &inventory), find_deltas(&application, &inventory));
        }
    }
}
