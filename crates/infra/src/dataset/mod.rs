//! Read-side collaborators: application/inventory snapshots and WMS id lookup.
//!
//! Readers are fetched fresh on every run; nothing is cached between runs.

pub mod in_memory;
pub mod json_file;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use skusync_core::{SkuBatchId, WmsId};
use skusync_inventory::{ApplicationRecord, InventoryRecord};

pub use in_memory::{InMemoryDatasets, WmsDirectory};
pub use json_file::JsonSnapshotDataset;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read snapshot {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("dataset unavailable: {0}")]
    Unavailable(String),
}

/// Source of truth for SkuBatch business attributes.
#[async_trait]
pub trait ApplicationDataset: Send + Sync {
    async fn read_application_records(&self) -> Result<Vec<ApplicationRecord>, DatasetError>;
}

/// Current downstream inventory projection.
#[async_trait]
pub trait InventoryDataset: Send + Sync {
    async fn read_inventory_records(&self) -> Result<Vec<InventoryRecord>, DatasetError>;
}

/// WMS id assignment for a SkuBatch. `Ok(None)` means no id is assigned yet.
#[async_trait]
pub trait WmsResolver: Send + Sync {
    async fn resolve_wms_id(&self, sku_batch_id: &SkuBatchId) -> Result<Option<WmsId>, DatasetError>;
}

#[async_trait]
impl<S> ApplicationDataset for Arc<S>
where
    S: ApplicationDataset + ?Sized,
{
    async fn read_application_records(&self) -> Result<Vec<ApplicationRecord>, DatasetError> {
        (**self).read_application_records().await
    }
}

#[async_trait]
impl<S> InventoryDataset for Arc<S>
where
    S: InventoryDataset + ?Sized,
{
    async fn read_inventory_records(&self) -> Result<Vec<InventoryRecord>, DatasetError> {
        (**self).read_inventory_records().await
    }
}

#[async_trait]
impl<S> WmsResolver for Arc<S>
where
    S: WmsResolver + ?Sized,
{
    async fn resolve_wms_id(&self, sku_batch_id: &SkuBatchId) -> Result<Option<WmsId>, DatasetError> {
        (**self).resolve_wms_id(sku_batch_id).await
    }
}
