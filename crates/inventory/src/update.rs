//! Field-level updates and their flattened write payloads.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use skusync_core::SkuBatchId;

/// Inventory fields the sync is allowed to write.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InventoryField {
    QuantityPerUnitOfMeasure,
    SkuId,
    WmsId,
    IsArchived,
    IsDeleted,
}

impl InventoryField {
    /// Wire name (payload key).
    pub fn name(&self) -> &'static str {
        match self {
            InventoryField::QuantityPerUnitOfMeasure => "quantityPerUnitOfMeasure",
            InventoryField::SkuId => "skuId",
            InventoryField::WmsId => "wmsId",
            InventoryField::IsArchived => "isArchived",
            InventoryField::IsDeleted => "isDeleted",
        }
    }

    /// Storage column name.
    pub fn column(&self) -> &'static str {
        match self {
            InventoryField::QuantityPerUnitOfMeasure => "quantity_per_unit_of_measure",
            InventoryField::SkuId => "sku_id",
            InventoryField::WmsId => "wms_id",
            InventoryField::IsArchived => "is_archived",
            InventoryField::IsDeleted => "is_deleted",
        }
    }
}

impl core::fmt::Display for InventoryField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// New value carried by a field update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldUpdate {
    pub field: InventoryField,
    pub new_value: FieldValue,
}

impl FieldUpdate {
    pub fn new(field: InventoryField, new_value: impl Into<FieldValue>) -> Self {
        Self {
            field,
            new_value: new_value.into(),
        }
    }
}

/// All changed fields for one SkuBatch, in detection order.
///
/// Never empty: construction goes through [`SkuBatchUpdate::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuBatchUpdate {
    sku_batch_id: SkuBatchId,
    updates: Vec<FieldUpdate>,
}

impl SkuBatchUpdate {
    /// Returns `None` when there is nothing to update.
    pub fn new(sku_batch_id: SkuBatchId, updates: Vec<FieldUpdate>) -> Option<Self> {
        if updates.is_empty() {
            return None;
        }
        Some(Self {
            sku_batch_id,
            updates,
        })
    }

    pub fn sku_batch_id(&self) -> &SkuBatchId {
        &self.sku_batch_id
    }

    pub fn updates(&self) -> &[FieldUpdate] {
        &self.updates
    }

    /// Flatten into a single write payload keyed by field name.
    pub fn payload(&self) -> UpdatePayload {
        UpdatePayload {
            sku_batch_id: self.sku_batch_id.clone(),
            fields: self.updates.clone(),
        }
    }
}

/// Flattened update: `{ "skuBatchId": .., "<field>": <newValue>, .. }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePayload {
    sku_batch_id: SkuBatchId,
    fields: Vec<FieldUpdate>,
}

impl UpdatePayload {
    pub fn sku_batch_id(&self) -> &SkuBatchId {
        &self.sku_batch_id
    }

    pub fn fields(&self) -> &[FieldUpdate] {
        &self.fields
    }

    pub fn get(&self, field: InventoryField) -> Option<&FieldValue> {
        self.fields
            .iter()
            .rev()
            .find(|u| u.field == field)
            .map(|u| &u.new_value)
    }
}

impl Serialize for UpdatePayload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry("skuBatchId", &self.sku_batch_id)?;
        for update in &self.fields {
            map.serialize_entry(update.field.name(), &update.new_value)?;
        }
        map.end()
    }
}

/// Downstream collection an update is written to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionTarget {
    /// The inventory view itself.
    Primary,
    /// The derived aggregate view, updated in lockstep with the primary.
    Aggregate,
}

impl ProjectionTarget {
    /// Every update is written to each target, in this order.
    pub const ALL: [ProjectionTarget; 2] = [ProjectionTarget::Primary, ProjectionTarget::Aggregate];

    pub fn collection(&self) -> &'static str {
        match self {
            ProjectionTarget::Primary => "inventory",
            ProjectionTarget::Aggregate => "inventory_aggregate",
        }
    }
}

impl core::fmt::Display for ProjectionTarget {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.collection())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_update_list_is_not_an_update() {
        assert!(SkuBatchUpdate::new(SkuBatchId::new("1"), vec![]).is_none());
    }

    #[test]
    fn payload_flattens_fields_next_to_batch_id() {
        let update = SkuBatchUpdate::new(
            SkuBatchId::new("sku-batch-id-1"),
            vec![
                FieldUpdate::new(InventoryField::IsArchived, true),
                FieldUpdate::new(InventoryField::WmsId, "1234"),
            ],
        )
        .unwrap();

        let json = serde_json::to_value(update.payload()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "skuBatchId": "sku-batch-id-1",
                "isArchived": true,
                "wmsId": "1234",
            })
        );
    }

    #[test]
    fn field_update_uses_camel_case_on_the_wire() {
        let json = serde_json::to_value(FieldUpdate::new(InventoryField::QuantityPerUnitOfMeasure, 5i64)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "field": "quantityPerUnitOfMeasure", "newValue": 5 })
        );
    }
}
