//! Inventory reconciliation engine.
//!
//! This crate contains the sync rules between the application SkuBatch dataset
//! and the inventory projection, implemented purely as deterministic functions
//! over snapshots (no IO, no HTTP, no storage, no logging).
//!
//! - [`id_diff`]: application ids that have no inventory counterpart
//! - [`expander`]: fan-out of one SkuBatch into per-warehouse inventory records
//! - [`delta`]: field-level drift between matching records
//! - [`orphan`]: disposition of inventory records missing from the application side

pub mod delta;
pub mod expander;
pub mod id_diff;
pub mod orphan;
pub mod record;
pub mod update;

pub use delta::{DeltaReport, diff_record, find_deltas};
pub use expander::{Expansion, expand_candidates, expand_record};
pub use id_diff::{insert_candidates, missing_from_inventory};
pub use orphan::{IgnoreOrphans, OrphanClassifier, OrphanDisposition, UniformDisposition, orphan_updates};
pub use record::{ApplicationRecord, ExpandedInventoryRecord, InventoryRecord, WarehouseSet};
pub use update::{FieldUpdate, FieldValue, InventoryField, ProjectionTarget, SkuBatchUpdate, UpdatePayload};
