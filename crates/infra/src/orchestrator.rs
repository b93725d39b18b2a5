//! Two-phase sync run: insert missing SkuBatches, then apply field deltas.
//!
//! ```text
//! read app + inventory ─▶ insert candidates ─▶ resolve wms ids ─▶ expand ─▶ persist_insert (×N)
//! read app + inventory ─▶ field deltas + orphan dispositions ─▶ persist_update (primary + aggregate)
//! ```
//!
//! Each phase reads fresh snapshots; the update phase does not assume the inserts
//! of the same run are already visible. Writes within a phase run concurrently
//! (bounded) and the first failure aborts the phase. There is no retry and no
//! rollback of writes that already landed.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::{TryStreamExt, stream};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use skusync_core::{SkuBatchId, WmsId};
use skusync_inventory::{
    ApplicationRecord, Expansion, ExpandedInventoryRecord, IgnoreOrphans, InventoryRecord, OrphanClassifier,
    ProjectionTarget, SkuBatchUpdate, UpdatePayload, WarehouseSet, expand_candidates, find_deltas,
    insert_candidates, orphan_updates,
};

use crate::dataset::{ApplicationDataset, DatasetError, InventoryDataset, WmsResolver};
use crate::writer::{InventoryWriter, WriteError};

pub const DEFAULT_MAX_CONCURRENT_WRITES: usize = 16;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    Insertion,
    Update,
}

impl core::fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SyncPhase::Insertion => f.write_str("insertion"),
            SyncPhase::Update => f.write_str("update"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SyncRunError {
    #[error("failed to read {dataset} dataset: {source}")]
    Read {
        dataset: &'static str,
        #[source]
        source: DatasetError,
    },

    #[error("failed to resolve wms id [skuBatchId={sku_batch_id}]: {source}")]
    Resolve {
        sku_batch_id: SkuBatchId,
        #[source]
        source: DatasetError,
    },

    #[error("{phase} phase aborted [skuBatchId={sku_batch_id}, completedWrites={completed}]: {source}")]
    Write {
        phase: SyncPhase,
        sku_batch_id: SkuBatchId,
        /// Writes that had completed when the failure was observed.
        completed: usize,
        #[source]
        source: WriteError,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertionReport {
    pub candidates: Vec<SkuBatchId>,
    pub records_created: usize,
    pub missing_application: Vec<SkuBatchId>,
    pub unresolved_wms: Vec<SkuBatchId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReport {
    /// Field-delta updates (one per changed record).
    pub field_updates: usize,
    /// Orphan disposition updates.
    pub orphan_updates: usize,
    /// Downstream calls issued (two per update).
    pub writes: usize,
    pub orphans: Vec<SkuBatchId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub insertion: InsertionReport,
    pub update: UpdateReport,
}

/// Everything the update phase will write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub field_updates: Vec<SkuBatchUpdate>,
    pub orphans: Vec<SkuBatchId>,
    pub orphan_updates: Vec<SkuBatchUpdate>,
}

impl ChangeSet {
    /// Field updates first, then orphan dispositions.
    pub fn updates(&self) -> impl Iterator<Item = &SkuBatchUpdate> {
        self.field_updates.iter().chain(self.orphan_updates.iter())
    }

    pub fn len(&self) -> usize {
        self.field_updates.len() + self.orphan_updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Drives the reconciliation engine through its collaborators.
pub struct SyncOrchestrator<A, I, R, W> {
    application: A,
    inventory: I,
    resolver: R,
    writer: W,
    warehouses: WarehouseSet,
    classifier: Arc<dyn OrphanClassifier>,
    max_concurrent_writes: usize,
}

impl<A, I, R, W> SyncOrchestrator<A, I, R, W>
where
    A: ApplicationDataset,
    I: InventoryDataset,
    R: WmsResolver,
    W: InventoryWriter,
{
    pub fn new(application: A, inventory: I, resolver: R, writer: W, warehouses: WarehouseSet) -> Self {
        Self {
            application,
            inventory,
            resolver,
            writer,
            warehouses,
            classifier: Arc::new(IgnoreOrphans),
            max_concurrent_writes: DEFAULT_MAX_CONCURRENT_WRITES,
        }
    }

    pub fn with_orphan_classifier(mut self, classifier: impl OrphanClassifier + 'static) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    pub fn with_max_concurrent_writes(mut self, max: usize) -> Self {
        self.max_concurrent_writes = max.max(1);
        self
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Full run: insertion phase, then update phase.
    pub async fn run(&self) -> Result<RunReport, SyncRunError> {
        let result = async {
            let insertion = self.copy_missing_records().await?;
            let update = self.apply_deltas().await?;
            Ok::<_, SyncRunError>(RunReport { insertion, update })
        }
        .await;

        result.inspect_err(|e| error!(error = %e, "error syncing skuBatch data"))
    }

    /// Insertion phase: create per-warehouse inventory records for every
    /// application SkuBatch that inventory does not know yet.
    pub async fn copy_missing_records(&self) -> Result<InsertionReport, SyncRunError> {
        info!("copying missing inventory records from app SkuBatch data");

        let (application, inventory) = self.read_snapshots().await?;
        let candidates = insert_candidates(&application, &inventory);
        info!(sku_batch_count = candidates.len(), "copying new skuBatch records");

        let expansion = self.build_inserts(&candidates, &application).await?;
        let records_created = self.persist_inserts(&expansion.records).await?;

        info!(records_created, "done copying missing inventory records");

        Ok(InsertionReport {
            candidates,
            records_created,
            missing_application: expansion.missing_application,
            unresolved_wms: expansion.unresolved_wms,
        })
    }

    /// Expand insert candidates into per-warehouse records.
    ///
    /// Ids that cannot be expanded are logged and reported in the [`Expansion`].
    pub async fn build_inserts(
        &self,
        candidates: &[SkuBatchId],
        application: &[ApplicationRecord],
    ) -> Result<Expansion, SyncRunError> {
        let mut resolved: HashMap<SkuBatchId, WmsId> = HashMap::with_capacity(candidates.len());
        for id in candidates {
            let wms_id = self
                .resolver
                .resolve_wms_id(id)
                .await
                .map_err(|source| SyncRunError::Resolve {
                    sku_batch_id: id.clone(),
                    source,
                })?;
            if let Some(wms_id) = wms_id {
                resolved.insert(id.clone(), wms_id);
            }
        }

        let expansion = expand_candidates(candidates, application, &self.warehouses, |id| resolved.get(id).cloned());

        for id in &expansion.missing_application {
            warn!(sku_batch_id = %id, "no records found in app SkuBatch");
        }
        for id in &expansion.unresolved_wms {
            error!(sku_batch_id = %id, "no wms id assigned to SkuBatch; skipping insert");
        }
        info!(
            count = expansion.records.len(),
            bad_sku_batch_record_count = expansion.skipped(),
            "created inserts"
        );

        Ok(expansion)
    }

    /// Compute everything the update phase would write, without writing it.
    pub async fn find_changes(&self) -> Result<ChangeSet, SyncRunError> {
        info!("finding app SkuBatch data that has changed and differs from the inventory data");

        let (application, inventory) = self.read_snapshots().await?;
        let report = find_deltas(&application, &inventory);

        if !report.orphans.is_empty() {
            let ids: Vec<&str> = report.orphans.iter().map(SkuBatchId::as_str).collect();
            warn!(
                orphan_count = ids.len(),
                "SkuBatch data found in inventory but missing in app data: [{}]",
                ids.join(",")
            );
        }

        let orphan_updates = orphan_updates(&report.orphans, &inventory, self.classifier.as_ref());
        let changes = ChangeSet {
            field_updates: report.updates,
            orphans: report.orphans,
            orphan_updates,
        };

        info!(
            count = changes.len(),
            orphan_updates = changes.orphan_updates.len(),
            "built updates"
        );
        Ok(changes)
    }

    /// Update phase: write every change to the primary and aggregate projections.
    pub async fn apply_deltas(&self) -> Result<UpdateReport, SyncRunError> {
        info!("updating inventory from deltas in app SkuBatch data");

        let changes = self.find_changes().await?;
        let writes: Vec<(ProjectionTarget, UpdatePayload)> = changes
            .updates()
            .flat_map(|update| {
                let payload = update.payload();
                ProjectionTarget::ALL.map(|target| (target, payload.clone()))
            })
            .collect();

        let writes = self.persist_updates(&writes).await?;
        info!(writes, "done updating inventory from deltas");

        Ok(UpdateReport {
            field_updates: changes.field_updates.len(),
            orphan_updates: changes.orphan_updates.len(),
            writes,
            orphans: changes.orphans,
        })
    }

    async fn read_snapshots(&self) -> Result<(Vec<ApplicationRecord>, Vec<InventoryRecord>), SyncRunError> {
        let read_app = async {
            self.application
                .read_application_records()
                .await
                .map_err(|source| SyncRunError::Read {
                    dataset: "application",
                    source,
                })
        };
        let read_inv = async {
            self.inventory
                .read_inventory_records()
                .await
                .map_err(|source| SyncRunError::Read {
                    dataset: "inventory",
                    source,
                })
        };

        let (application, inventory) = futures::try_join!(read_app, read_inv)?;
        info!(
            application_count = application.len(),
            inventory_count = inventory.len(),
            "read snapshots"
        );
        Ok((application, inventory))
    }

    async fn persist_inserts(&self, records: &[ExpandedInventoryRecord]) -> Result<usize, SyncRunError> {
        let completed = AtomicUsize::new(0);

        stream::iter(records.iter().map(Ok::<_, SyncRunError>))
            .try_for_each_concurrent(self.max_concurrent_writes, |record| {
                let completed = &completed;
                async move {
                    self.writer
                        .persist_insert(record)
                        .await
                        .map_err(|source| SyncRunError::Write {
                            phase: SyncPhase::Insertion,
                            sku_batch_id: record.sku_batch_id.clone(),
                            completed: completed.load(Ordering::SeqCst),
                            source,
                        })?;
                    completed.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            })
            .await?;

        Ok(completed.into_inner())
    }

    async fn persist_updates(&self, writes: &[(ProjectionTarget, UpdatePayload)]) -> Result<usize, SyncRunError> {
        let completed = AtomicUsize::new(0);

        stream::iter(writes.iter().map(Ok::<_, SyncRunError>))
            .try_for_each_concurrent(self.max_concurrent_writes, |(target, payload)| {
                let completed = &completed;
                async move {
                    self.writer
                        .persist_update(*target, payload)
                        .await
                        .map_err(|source| SyncRunError::Write {
                            phase: SyncPhase::Update,
                            sku_batch_id: payload.sku_batch_id().clone(),
                            completed: completed.load(Ordering::SeqCst),
                            source,
                        })?;
                    completed.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            })
            .await?;

        Ok(completed.into_inner())
    }
}
