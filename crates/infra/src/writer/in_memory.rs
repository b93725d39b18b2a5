use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use skusync_core::SkuBatchId;
use skusync_inventory::{ExpandedInventoryRecord, ProjectionTarget, UpdatePayload};

use super::{InventoryWriter, WriteError};

/// A downstream call as observed by [`InMemoryInventoryWriter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCall {
    Insert(ExpandedInventoryRecord),
    Update {
        target: ProjectionTarget,
        payload: UpdatePayload,
    },
}

impl WriteCall {
    pub fn sku_batch_id(&self) -> &SkuBatchId {
        match self {
            WriteCall::Insert(record) => &record.sku_batch_id,
            WriteCall::Update { payload, .. } => payload.sku_batch_id(),
        }
    }
}

/// Records every write in memory (tests/dev).
///
/// Writes for ids registered with [`InMemoryInventoryWriter::reject`] fail with
/// [`WriteError::Rejected`] and are not recorded.
#[derive(Debug, Default)]
pub struct InMemoryInventoryWriter {
    calls: Mutex<Vec<WriteCall>>,
    rejected: Mutex<HashSet<SkuBatchId>>,
}

impl InMemoryInventoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write for `sku_batch_id` fail.
    pub fn reject(&self, sku_batch_id: SkuBatchId) {
        if let Ok(mut rejected) = self.rejected.lock() {
            rejected.insert(sku_batch_id);
        }
    }

    pub fn calls(&self) -> Vec<WriteCall> {
        match self.calls.lock() {
            Ok(calls) => calls.clone(),
            Err(_) => vec![],
        }
    }

    pub fn inserts(&self) -> Vec<ExpandedInventoryRecord> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                WriteCall::Insert(record) => Some(record),
                WriteCall::Update { .. } => None,
            })
            .collect()
    }

    pub fn updates(&self) -> Vec<(ProjectionTarget, UpdatePayload)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                WriteCall::Update { target, payload } => Some((target, payload)),
                WriteCall::Insert(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }

    fn record(&self, call: WriteCall) -> Result<(), WriteError> {
        let rejected = self
            .rejected
            .lock()
            .map(|r| r.contains(call.sku_batch_id()))
            .unwrap_or(false);
        if rejected {
            return Err(WriteError::Rejected(format!("skuBatchId={}", call.sku_batch_id())));
        }

        self.calls
            .lock()
            .map_err(|_| WriteError::Rejected("write log lock poisoned".to_string()))?
            .push(call);
        Ok(())
    }
}

#[async_trait]
impl InventoryWriter for InMemoryInventoryWriter {
    async fn persist_insert(&self, record: &ExpandedInventoryRecord) -> Result<(), WriteError> {
        self.record(WriteCall::Insert(record.clone()))
    }

    async fn persist_update(&self, target: ProjectionTarget, payload: &UpdatePayload) -> Result<(), WriteError> {
        self.record(WriteCall::Update {
            target,
            payload: payload.clone(),
        })
    }
}
