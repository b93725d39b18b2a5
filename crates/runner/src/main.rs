use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use skusync_infra::dataset::{JsonSnapshotDataset, WmsDirectory};
use skusync_infra::writer::{HttpInventoryWriter, PostgresInventoryWriter, SqlScriptWriter};
use skusync_infra::{InventoryWriter, RunReport, SinkConfig, SyncConfig, SyncOrchestrator};
use skusync_inventory::UniformDisposition;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    skusync_observability::init();

    let config = SyncConfig::from_env().context("invalid sync configuration")?;
    tracing::info!(
        warehouses = config.warehouses.len(),
        max_concurrent_writes = config.max_concurrent_writes,
        orphan_policy = ?config.orphan_policy,
        "starting skuBatch sync"
    );

    let report = match &config.sink {
        SinkConfig::Http { base_url, token } => {
            let writer = match token {
                Some(token) => HttpInventoryWriter::with_token(base_url.clone(), token.clone()),
                None => {
                    tracing::warn!("SKUSYNC_API_TOKEN not set; sending unauthenticated requests");
                    HttpInventoryWriter::new(base_url.clone())
                }
            };
            run(&config, writer).await?
        }
        SinkConfig::Postgres { database_url } => {
            let pool = PgPool::connect(database_url)
                .await
                .context("failed to connect to Postgres")?;
            run(&config, PostgresInventoryWriter::new(pool)).await?
        }
        SinkConfig::SqlScript => {
            let writer = Arc::new(SqlScriptWriter::new());
            let report = run(&config, writer.clone()).await?;
            print!("{}", writer.script());
            report
        }
    };

    tracing::info!(report = %serde_json::to_string(&report)?, "skuBatch sync finished");
    Ok(())
}

async fn run<W: InventoryWriter>(config: &SyncConfig, writer: W) -> anyhow::Result<RunReport> {
    let wms = WmsDirectory::load_json(&config.wms_snapshot)
        .await
        .context("failed to load wms id assignments")?;
    tracing::info!(assignments = wms.len(), "loaded wms directory");

    let orchestrator = SyncOrchestrator::new(
        JsonSnapshotDataset::new(&config.application_snapshot),
        JsonSnapshotDataset::new(&config.inventory_snapshot),
        wms,
        writer,
        config.warehouses.clone(),
    )
    .with_orphan_classifier(UniformDisposition(config.orphan_policy))
    .with_max_concurrent_writes(config.max_concurrent_writes);

    Ok(orchestrator.run().await?)
}
