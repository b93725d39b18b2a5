//! Snapshot records exchanged with the application and inventory datasets.

use serde::{Deserialize, Serialize};

use skusync_core::{DomainError, DomainResult, SkuBatchId, SkuId, WarehouseId, WmsId};

/// Per-warehouse quantity written on every expanded record.
pub const EXPANDED_QUANTITY_PER_UNIT_OF_MEASURE: i64 = 1;

/// SkuBatch as seen by the application dataset (source of truth).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub sku_batch_id: SkuBatchId,
    pub sku_id: SkuId,
    pub quantity_per_unit_of_measure: i64,
    /// WMS id the application currently associates with the batch, when it carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wms_id: Option<WmsId>,
}

/// Current downstream state of a SkuBatch in the inventory dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    pub sku_batch_id: SkuBatchId,
    #[serde(default)]
    pub sku_id: Option<SkuId>,
    pub wms_id: WmsId,
    pub quantity_per_unit_of_measure: i64,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_deleted: bool,
}

/// Insert payload: one inventory record per (SkuBatch, warehouse).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedInventoryRecord {
    pub sku_batch_id: SkuBatchId,
    pub sku_id: SkuId,
    pub wms_id: WmsId,
    pub quantity_per_unit_of_measure: i64,
    pub is_archived: bool,
    pub is_deleted: bool,
    pub warehouse_id: WarehouseId,
}

/// Ordered, non-empty, duplicate-free set of known warehouses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WarehouseSet(Vec<WarehouseId>);

impl WarehouseSet {
    pub fn new(warehouses: Vec<WarehouseId>) -> DomainResult<Self> {
        if warehouses.is_empty() {
            return Err(DomainError::validation("warehouse set cannot be empty"));
        }
        for (i, w) in warehouses.iter().enumerate() {
            if w.as_str().trim().is_empty() {
                return Err(DomainError::invalid_id(format!("WarehouseId at position {i}: empty")));
            }
            if warehouses[..i].contains(w) {
                return Err(DomainError::duplicate_key(format!("warehouse {w}")));
            }
        }
        Ok(Self(warehouses))
    }

    /// Parse a comma-separated list (`"warehouse-1, warehouse-2"`).
    pub fn parse_list(list: &str) -> DomainResult<Self> {
        let warehouses = list
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<WarehouseId>)
            .collect::<DomainResult<Vec<_>>>()?;
        Self::new(warehouses)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WarehouseId> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[WarehouseId] {
        &self.0
    }
}

impl<'de> Deserialize<'de> for WarehouseSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let warehouses = Vec::<WarehouseId>::deserialize(deserializer)?;
        Self::new(warehouses).map_err(serde::de::Error::custom)
    }
}
