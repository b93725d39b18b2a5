//! JSON snapshot files exported from the application and inventory databases.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use skusync_core::{SkuBatchId, WmsId};
use skusync_inventory::{ApplicationRecord, InventoryRecord};

use super::{ApplicationDataset, DatasetError, InventoryDataset, WmsDirectory};

/// A JSON array of records (camelCase keys), re-read on every call.
#[derive(Debug, Clone)]
pub struct JsonSnapshotDataset {
    path: PathBuf,
}

impl JsonSnapshotDataset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read<T: DeserializeOwned>(&self) -> Result<T, DatasetError> {
        read_json(&self.path).await
    }
}

#[async_trait]
impl ApplicationDataset for JsonSnapshotDataset {
    async fn read_application_records(&self) -> Result<Vec<ApplicationRecord>, DatasetError> {
        self.read().await
    }
}

#[async_trait]
impl InventoryDataset for JsonSnapshotDataset {
    async fn read_inventory_records(&self) -> Result<Vec<InventoryRecord>, DatasetError> {
        self.read().await
    }
}

impl WmsDirectory {
    /// Load a `{ "<skuBatchId>": <wmsId>, .. }` JSON object. WMS ids may be
    /// numbers or strings.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let raw: HashMap<SkuBatchId, WmsId> = read_json(path.as_ref()).await?;
        Ok(raw.into_iter().collect())
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
