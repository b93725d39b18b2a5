//! Inventory REST API client.
//!
//! - `POST {base}/inventory` creates an expanded record
//! - `PUT {base}/<inventory|inventory_aggregate>` applies a flattened update

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};

use skusync_inventory::{ExpandedInventoryRecord, ProjectionTarget, UpdatePayload};

use super::{InventoryWriter, WriteError};

pub struct HttpInventoryWriter {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpInventoryWriter {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            token: None,
        }
    }

    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::new(base_url)
        }
    }

    /// Reuse an existing client (shared connection pool, custom timeouts).
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn endpoint_url(&self, target: ProjectionTarget) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), target.collection())
    }

    async fn send(&self, mut req: RequestBuilder) -> Result<(), WriteError> {
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(|e| WriteError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            return Err(WriteError::Api(status, resp.text().await.unwrap_or_default()));
        }

        Ok(())
    }
}

#[async_trait]
impl InventoryWriter for HttpInventoryWriter {
    async fn persist_insert(&self, record: &ExpandedInventoryRecord) -> Result<(), WriteError> {
        let url = self.endpoint_url(ProjectionTarget::Primary);
        tracing::debug!(%url, sku_batch_id = %record.sku_batch_id, warehouse_id = %record.warehouse_id, "POST inventory record");
        self.send(self.client.post(&url).json(record)).await
    }

    async fn persist_update(&self, target: ProjectionTarget, payload: &UpdatePayload) -> Result<(), WriteError> {
        let url = self.endpoint_url(target);
        tracing::debug!(%url, sku_batch_id = %payload.sku_batch_id(), "PUT inventory update");
        self.send(self.client.put(&url).json(payload)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, Method, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    use skusync_core::{SkuBatchId, SkuId, WarehouseId, WmsId};
    use skusync_inventory::{FieldUpdate, InventoryField, SkuBatchUpdate};

    #[derive(Debug, Clone, PartialEq)]
    struct Seen {
        method: Method,
        collection: String,
        auth: Option<String>,
        body: Value,
    }

    type Log = Arc<Mutex<Vec<Seen>>>;

    async fn record(
        State(log): State<Log>,
        method: Method,
        Path(collection): Path<String>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> StatusCode {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        log.lock().unwrap().push(Seen {
            method,
            collection,
            auth,
            body,
        });
        StatusCode::NO_CONTENT
    }

    async fn broken() -> (StatusCode, &'static str) {
        (StatusCode::INTERNAL_SERVER_ERROR, "inventory unavailable")
    }

    async fn serve() -> (String, Log) {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/v1/:collection", post(record).put(record))
            .route("/broken/:collection", post(broken).put(broken))
            .with_state(log.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}"), log)
    }

    fn expanded() -> ExpandedInventoryRecord {
        ExpandedInventoryRecord {
            sku_batch_id: SkuBatchId::new("sku-batch-id-5"),
            sku_id: SkuId::new("sku-id-2"),
            wms_id: WmsId::from(1238u64),
            quantity_per_unit_of_measure: 1,
            is_archived: false,
            is_deleted: false,
            warehouse_id: WarehouseId::new("warehouse-1"),
        }
    }

    #[test]
    fn endpoint_url_ignores_trailing_slash() {
        let writer = HttpInventoryWriter::new("https://inventory.example/v1/");
        assert_eq!(writer.endpoint_url(ProjectionTarget::Primary), "https://inventory.example/v1/inventory");
        assert_eq!(
            writer.endpoint_url(ProjectionTarget::Aggregate),
            "https://inventory.example/v1/inventory_aggregate"
        );
    }

    #[tokio::test]
    async fn posts_inserts_and_puts_updates() {
        let (base, log) = serve().await;
        let writer = HttpInventoryWriter::with_token(format!("{base}/v1"), "secret");

        writer.persist_insert(&expanded()).await.unwrap();

        let payload = SkuBatchUpdate::new(
            SkuBatchId::new("sku-batch-id-6"),
            vec![FieldUpdate::new(InventoryField::IsArchived, true)],
        )
        .unwrap()
        .payload();
        writer.persist_update(ProjectionTarget::Aggregate, &payload).await.unwrap();

        let seen = log.lock().unwrap().clone();
        assert_eq!(seen.len(), 2);

        assert_eq!(seen[0].method, Method::POST);
        assert_eq!(seen[0].collection, "inventory");
        assert_eq!(seen[0].auth.as_deref(), Some("Bearer secret"));
        assert_eq!(
            seen[0].body,
            json!({
                "skuBatchId": "sku-batch-id-5",
                "skuId": "sku-id-2",
                "wmsId": "1238",
                "quantityPerUnitOfMeasure": 1,
                "isArchived": false,
                "isDeleted": false,
                "warehouseId": "warehouse-1",
            })
        );

        assert_eq!(seen[1].method, Method::PUT);
        assert_eq!(seen[1].collection, "inventory_aggregate");
        assert_eq!(seen[1].body, json!({ "skuBatchId": "sku-batch-id-6", "isArchived": true }));
    }

    #[tokio::test]
    async fn non_success_status_is_an_api_error() {
        let (base, _log) = serve().await;
        let writer = HttpInventoryWriter::new(format!("{base}/broken"));

        match writer.persist_insert(&expanded()).await {
            Err(WriteError::Api(500, body)) => assert_eq!(body, "inventory unavailable"),
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let writer = HttpInventoryWriter::new("http://127.0.0.1:1");
        let err = writer.persist_insert(&expanded()).await.unwrap_err();
        assert!(matches!(err, WriteError::Network(_)));
    }
}
