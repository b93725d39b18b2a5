use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use skusync_core::{SkuBatchId, WmsId};
use skusync_inventory::{ApplicationRecord, InventoryRecord};

use super::{ApplicationDataset, DatasetError, InventoryDataset, WmsResolver};

/// In-memory application + inventory snapshots for tests/dev.
///
/// Snapshots can be swapped between runs to simulate upstream changes.
#[derive(Debug, Default)]
pub struct InMemoryDatasets {
    application: RwLock<Vec<ApplicationRecord>>,
    inventory: RwLock<Vec<InventoryRecord>>,
}

impl InMemoryDatasets {
    pub fn new(application: Vec<ApplicationRecord>, inventory: Vec<InventoryRecord>) -> Self {
        Self {
            application: RwLock::new(application),
            inventory: RwLock::new(inventory),
        }
    }

    pub fn replace_application(&self, records: Vec<ApplicationRecord>) {
        if let Ok(mut app) = self.application.write() {
            *app = records;
        }
    }

    pub fn replace_inventory(&self, records: Vec<InventoryRecord>) {
        if let Ok(mut inv) = self.inventory.write() {
            *inv = records;
        }
    }
}

#[async_trait]
impl ApplicationDataset for InMemoryDatasets {
    async fn read_application_records(&self) -> Result<Vec<ApplicationRecord>, DatasetError> {
        self.application
            .read()
            .map(|records| records.clone())
            .map_err(|_| DatasetError::Unavailable("application snapshot lock poisoned".to_string()))
    }
}

#[async_trait]
impl InventoryDataset for InMemoryDatasets {
    async fn read_inventory_records(&self) -> Result<Vec<InventoryRecord>, DatasetError> {
        self.inventory
            .read()
            .map(|records| records.clone())
            .map_err(|_| DatasetError::Unavailable("inventory snapshot lock poisoned".to_string()))
    }
}

/// Static SkuBatch → WMS id assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WmsDirectory {
    assignments: HashMap<SkuBatchId, WmsId>,
}

impl WmsDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, sku_batch_id: SkuBatchId, wms_id: WmsId) {
        self.assignments.insert(sku_batch_id, wms_id);
    }

    pub fn get(&self, sku_batch_id: &SkuBatchId) -> Option<&WmsId> {
        self.assignments.get(sku_batch_id)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

impl FromIterator<(SkuBatchId, WmsId)> for WmsDirectory {
    fn from_iter<T: IntoIterator<Item = (SkuBatchId, WmsId)>>(iter: T) -> Self {
        Self {
            assignments: iter.into_iter().collect(),
        }
    }
}

#[async_trait]
impl WmsResolver for WmsDirectory {
    async fn resolve_wms_id(&self, sku_batch_id: &SkuBatchId) -> Result<Option<WmsId>, DatasetError> {
        Ok(self.assignments.get(sku_batch_id).cloned())
    }
}
