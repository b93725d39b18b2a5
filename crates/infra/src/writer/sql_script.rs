//! Dry-run writer: renders every write as a literal SQL statement.
//!
//! The script is meant for review or for piping into `psql`; values are quoted
//! and escaped, but nothing is executed.

use std::sync::Mutex;

use async_trait::async_trait;

use skusync_inventory::{ExpandedInventoryRecord, FieldValue, ProjectionTarget, UpdatePayload};

use super::{InventoryWriter, WriteError};

#[derive(Debug, Default)]
pub struct SqlScriptWriter {
    statements: Mutex<Vec<String>>,
}

impl SqlScriptWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statements(&self) -> Vec<String> {
        match self.statements.lock() {
            Ok(s) => s.clone(),
            Err(_) => vec![],
        }
    }

    /// All statements, one per line, `;`-terminated.
    pub fn script(&self) -> String {
        self.statements()
            .iter()
            .map(|s| format!("{s};\n"))
            .collect()
    }

    fn push(&self, statement: String) -> Result<(), WriteError> {
        self.statements
            .lock()
            .map_err(|_| WriteError::Rejected("statement log lock poisoned".to_string()))?
            .push(statement);
        Ok(())
    }
}

pub fn render_insert(record: &ExpandedInventoryRecord) -> String {
    format!(
        "insert into inventory (sku_batch_id, sku_id, wms_id, quantity_per_unit_of_measure, is_archived, is_deleted, warehouse_id) \
         values ({}, {}, {}, {}, {}, {}, {})",
        quote(record.sku_batch_id.as_str()),
        quote(record.sku_id.as_str()),
        quote(record.wms_id.as_str()),
        record.quantity_per_unit_of_measure,
        record.is_archived,
        record.is_deleted,
        quote(record.warehouse_id.as_str()),
    )
}

pub fn render_update(target: ProjectionTarget, payload: &UpdatePayload) -> String {
    let assignments = payload
        .fields()
        .iter()
        .map(|u| format!("{} = {}", u.field.column(), literal(&u.new_value)))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "update {} set {} where sku_batch_id = {}",
        target.collection(),
        assignments,
        quote(payload.sku_batch_id().as_str()),
    )
}

fn literal(value: &FieldValue) -> String {
    match value {
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::Integer(n) => n.to_string(),
        FieldValue::Text(s) => quote(s),
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

#[async_trait]
impl InventoryWriter for SqlScriptWriter {
    async fn persist_insert(&self, record: &ExpandedInventoryRecord) -> Result<(), WriteError> {
        self.push(render_insert(record))
    }

    async fn persist_update(&self, target: ProjectionTarget, payload: &UpdatePayload) -> Result<(), WriteError> {
        self.push(render_update(target, payload))
    }
}
