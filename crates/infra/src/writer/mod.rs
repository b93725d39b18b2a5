//! Write-side collaborators: where inserts and projection updates land.
//!
//! Writers perform exactly one downstream call per invocation. They never retry;
//! a failure is reported to the orchestrator, which aborts the current phase.

pub mod http;
pub mod in_memory;
pub mod postgres;
pub mod sql_script;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use skusync_inventory::{ExpandedInventoryRecord, ProjectionTarget, UpdatePayload};

pub use http::HttpInventoryWriter;
pub use in_memory::{InMemoryInventoryWriter, WriteCall};
pub use postgres::PostgresInventoryWriter;
pub use sql_script::SqlScriptWriter;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("database error: {0}")]
    Database(String),
    #[error("write rejected: {0}")]
    Rejected(String),
}

/// Downstream persistence for the inventory projection.
#[async_trait]
pub trait InventoryWriter: Send + Sync {
    /// Create one new inventory record.
    async fn persist_insert(&self, record: &ExpandedInventoryRecord) -> Result<(), WriteError>;

    /// Apply a flattened field update to one projection.
    async fn persist_update(&self, target: ProjectionTarget, payload: &UpdatePayload) -> Result<(), WriteError>;
}

#[async_trait]
impl<W> InventoryWriter for Arc<W>
where
    W: InventoryWriter + ?Sized,
{
    async fn persist_insert(&self, record: &ExpandedInventoryRecord) -> Result<(), WriteError> {
        (**self).persist_insert(record).await
    }

    async fn persist_update(&self, target: ProjectionTarget, payload: &UpdatePayload) -> Result<(), WriteError> {
        (**self).persist_update(target, payload).await
    }
}
