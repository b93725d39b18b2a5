//! Postgres-backed inventory writer.
//!
//! Writes straight into the `inventory` and `inventory_aggregate` tables with
//! bound parameters. Column names are the snake_case form of the wire fields.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use skusync_inventory::{ExpandedInventoryRecord, FieldValue, ProjectionTarget, UpdatePayload};

use super::{InventoryWriter, WriteError};

const INSERT_INVENTORY: &str = r#"
    INSERT INTO inventory (
        sku_batch_id,
        sku_id,
        wms_id,
        quantity_per_unit_of_measure,
        is_archived,
        is_deleted,
        warehouse_id
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7)
"#;

pub struct PostgresInventoryWriter {
    pool: Arc<PgPool>,
}

impl PostgresInventoryWriter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }
}

/// `UPDATE <table> SET <col> = $1, .. WHERE sku_batch_id = $n`
pub(crate) fn update_query(target: ProjectionTarget, payload: &UpdatePayload) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE ");
    qb.push(target.collection());
    qb.push(" SET ");

    {
        let mut set = qb.separated(", ");
        for update in payload.fields() {
            set.push(update.field.column());
            set.push_unseparated(" = ");
            match &update.new_value {
                FieldValue::Bool(v) => set.push_bind_unseparated(*v),
                FieldValue::Integer(v) => set.push_bind_unseparated(*v),
                FieldValue::Text(v) => set.push_bind_unseparated(v.clone()),
            };
        }
    }

    qb.push(" WHERE sku_batch_id = ");
    qb.push_bind(payload.sku_batch_id().as_str().to_string());
    qb
}

#[async_trait]
impl InventoryWriter for PostgresInventoryWriter {
    async fn persist_insert(&self, record: &ExpandedInventoryRecord) -> Result<(), WriteError> {
        sqlx::query(INSERT_INVENTORY)
            .bind(record.sku_batch_id.as_str())
            .bind(record.sku_id.as_str())
            .bind(record.wms_id.as_str())
            .bind(record.quantity_per_unit_of_measure)
            .bind(record.is_archived)
            .bind(record.is_deleted)
            .bind(record.warehouse_id.as_str())
            .execute(&*self.pool)
            .await
            .map_err(|e| WriteError::Database(e.to_string()))?;
        Ok(())
    }

    async fn persist_update(&self, target: ProjectionTarget, payload: &UpdatePayload) -> Result<(), WriteError> {
        let mut qb = update_query(target, payload);
        let result = qb
            .build()
            .execute(&*self.pool)
            .await
            .map_err(|e| WriteError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            tracing::warn!(
                table = target.collection(),
                sku_batch_id = %payload.sku_batch_id(),
                "update matched no rows"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skusync_core::SkuBatchId;
    use skusync_inventory::{FieldUpdate, InventoryField, SkuBatchUpdate};

    #[test]
    fn update_binds_every_field_and_the_key() {
        let payload = SkuBatchUpdate::new(
            SkuBatchId::new("sku-batch-id-1"),
            vec![
                FieldUpdate::new(InventoryField::QuantityPerUnitOfMeasure, 5i64),
                FieldUpdate::new(InventoryField::SkuId, "sku-id-1"),
            ],
        )
        .unwrap()
        .payload();

        let qb = update_query(ProjectionTarget::Primary, &payload);
        assert_eq!(
            qb.sql(),
            "UPDATE inventory SET quantity_per_unit_of_measure = $1, sku_id = $2 WHERE sku_batch_id = $3"
        );

        let qb = update_query(ProjectionTarget::Aggregate, &payload);
        assert!(qb.sql().starts_with("UPDATE inventory_aggregate SET "));
    }
}
