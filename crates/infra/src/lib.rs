//! Infrastructure layer: dataset readers, downstream writers, config, and the
//! sync orchestrator that drives the reconciliation engine through them.

pub mod config;
pub mod dataset;
pub mod orchestrator;
pub mod writer;

pub use config::{ConfigError, SinkConfig, SyncConfig};
pub use dataset::{ApplicationDataset, DatasetError, InventoryDataset, WmsResolver};
pub use orchestrator::{
    ChangeSet, InsertionReport, RunReport, SyncOrchestrator, SyncPhase, SyncRunError, UpdateReport,
};
pub use writer::{InventoryWriter, WriteError};
