//! # Catalog Store Client
//!
//! One async method per store endpoint.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Resource           Calls                                               │
//! │  ─────────────────  ──────────────────────────────────────────────────  │
//! │  /api/products      GET, POST, PUT /{id}, DELETE /{id}, POST /bulk     │
//! │  /api/categories    GET, POST, PUT /{id}, DELETE /{id}                 │
//! │  /api/customers     GET, POST, PUT /{id}, DELETE /{id}                 │
//! │  /api/vendors       GET, POST, PUT /{id}, DELETE /{id}                 │
//! │  /api/orders        GET, POST, PUT /{id}/status, DELETE /{id}          │
//! │  /api/settings      GET, POST { key, value }                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Request Lifecycle
//! ```text
//! call ──► debug!(request_id, method, path) ──► reqwest ──► status?
//!                                                          │
//!                         2xx ◄────────────────────────────┤
//!                          │                               └── non-2xx ──► warn! + Status
//!                          ▼
//!                    decode JSON ──► Decode on mismatch
//! ```
//!
//! Writes do not decode the store's answer: callers reload the list they
//! changed. Nothing is retried.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use catalog_core::bulk_edit::ProductPatch;
use catalog_core::catalog::ProductPayload;
use catalog_core::import::{BulkImportRequest, BulkImportResult};
use catalog_core::orders::{NewOrder, StatusUpdate};
use catalog_core::settings::{AdminSettings, SettingUpdate};
use catalog_core::{
    Category, CategoryPayload, Customer, CustomerPayload, Order, OrderStatus, Product, Vendor,
    VendorPayload,
};

use crate::config::{ApiSettings, ClientConfig};
use crate::error::{ClientError, ClientResult};

/// Async client for the remote catalog store.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(api: &ApiSettings) -> ClientResult<Self> {
        url::Url::parse(&api.base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = api.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(CatalogClient {
            http: builder.build()?,
            base_url: api.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Self::new(&config.api)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =========================================================================
    // Products
    // =========================================================================

    pub async fn list_products(&self) -> ClientResult<Vec<Product>> {
        self.get("/api/products").await
    }

    pub async fn create_product(&self, payload: &ProductPayload) -> ClientResult<()> {
        self.write(Method::POST, "/api/products", payload).await
    }

    /// Replaces a product with the product form's payload.
    pub async fn update_product(&self, id: &str, payload: &ProductPayload) -> ClientResult<()> {
        self.write(Method::PUT, &format!("/api/products/{}", id), payload)
            .await
    }

    /// Sends only the fields present in the patch.
    pub async fn patch_product(&self, id: &str, patch: &ProductPatch) -> ClientResult<()> {
        self.write(Method::PUT, &format!("/api/products/{}", id), patch)
            .await
    }

    pub async fn delete_product(&self, id: &str) -> ClientResult<()> {
        self.delete(&format!("/api/products/{}", id)).await
    }

    /// Creates many products in one call. The store reports how many it
    /// created; rows are not checked individually.
    pub async fn bulk_create_products(
        &self,
        request: &BulkImportRequest,
    ) -> ClientResult<BulkImportResult> {
        self.send(Method::POST, "/api/products/bulk", Some(request))
            .await
    }

    // =========================================================================
    // Categories
    // =========================================================================

    pub async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        self.get("/api/categories").await
    }

    pub async fn create_category(&self, payload: &CategoryPayload) -> ClientResult<()> {
        self.write(Method::POST, "/api/categories", payload).await
    }

    pub async fn rename_category(&self, id: &str, payload: &CategoryPayload) -> ClientResult<()> {
        self.write(Method::PUT, &format!("/api/categories/{}", id), payload)
            .await
    }

    pub async fn delete_category(&self, id: &str) -> ClientResult<()> {
        self.delete(&format!("/api/categories/{}", id)).await
    }

    // =========================================================================
    // Customers
    // =========================================================================

    pub async fn list_customers(&self) -> ClientResult<Vec<Customer>> {
        self.get("/api/customers").await
    }

    pub async fn create_customer(&self, payload: &CustomerPayload) -> ClientResult<()> {
        self.write(Method::POST, "/api/customers", payload).await
    }

    pub async fn update_customer(&self, id: &str, payload: &CustomerPayload) -> ClientResult<()> {
        self.write(Method::PUT, &format!("/api/customers/{}", id), payload)
            .await
    }

    pub async fn delete_customer(&self, id: &str) -> ClientResult<()> {
        self.delete(&format!("/api/customers/{}", id)).await
    }

    // =========================================================================
    // Vendors
    // =========================================================================

    pub async fn list_vendors(&self) -> ClientResult<Vec<Vendor>> {
        self.get("/api/vendors").await
    }

    pub async fn create_vendor(&self, payload: &VendorPayload) -> ClientResult<()> {
        self.write(Method::POST, "/api/vendors", payload).await
    }

    pub async fn update_vendor(&self, id: &str, payload: &VendorPayload) -> ClientResult<()> {
        self.write(Method::PUT, &format!("/api/vendors/{}", id), payload)
            .await
    }

    pub async fn delete_vendor(&self, id: &str) -> ClientResult<()> {
        self.delete(&format!("/api/vendors/{}", id)).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    pub async fn list_orders(&self) -> ClientResult<Vec<Order>> {
        self.get("/api/orders").await
    }

    pub async fn create_order(&self, order: &NewOrder) -> ClientResult<()> {
        self.write(Method::POST, "/api/orders", order).await
    }

    pub async fn update_order_status(&self, id: &str, status: OrderStatus) -> ClientResult<()> {
        self.write(
            Method::PUT,
            &format!("/api/orders/{}/status", id),
            &StatusUpdate { status },
        )
        .await
    }

    pub async fn delete_order(&self, id: &str) -> ClientResult<()> {
        self.delete(&format!("/api/orders/{}", id)).await
    }

    // =========================================================================
    // Settings
    // =========================================================================

    pub async fn get_settings(&self) -> ClientResult<AdminSettings> {
        self.get("/api/settings").await
    }

    pub async fn update_setting(&self, update: &SettingUpdate) -> ClientResult<()> {
        self.write(Method::POST, "/api/settings", update).await
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send::<T, ()>(Method::GET, path, None).await
    }

    async fn write<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<()> {
        self.execute(method, path, Some(body)).await.map(|_| ())
    }

    async fn delete(&self, path: &str) -> ClientResult<()> {
        self.execute::<()>(Method::DELETE, path, None)
            .await
            .map(|_| ())
    }

    async fn send<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let text = self.execute(method, path, body).await?;
        serde_json::from_str(&text).map_err(|e| ClientError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    /// Sends one request and returns the body of a 2xx response.
    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<String> {
        let request_id = Uuid::new_v4();
        let url = format!("{}{}", self.base_url, path);
        debug!(%request_id, %method, path, "Sending store request");

        let mut request = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(%request_id, %method, path, status = status.as_u16(), "Store rejected request");
            return Err(ClientError::Status {
                status: status.as_u16(),
                path: path.to_string(),
                body: text,
            });
        }

        debug!(%request_id, status = status.as_u16(), bytes = text.len(), "Store responded");
        Ok(text)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::routing::{get, post, put};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use catalog_core::import::{Cell, ImportPreview, RawRow};
    use catalog_core::settings::SettingFlag;
    use catalog_core::{Money, MAX_IMPORT_ROWS};

    type Calls = Arc<Mutex<Vec<(String, Value)>>>;

    fn record(calls: &Calls, what: impl Into<String>, body: Value) {
        calls.lock().unwrap().push((what.into(), body));
    }

    async fn list_products() -> Json<Value> {
        Json(json!([
            {"id": "p1", "name": "Rice", "price": "52.50", "stock": 3, "units": [{"name": "kg", "multiplier": 1}]},
            {"id": "p2", "name": "Tea", "price": 120, "mrp": null, "stock": 0}
        ]))
    }

    async fn bulk(State(calls): State<Calls>, Json(body): Json<Value>) -> Json<Value> {
        let count = body["products"].as_array().map_or(0, Vec::len);
        record(&calls, "bulk", body);
        Json(json!({ "success": count }))
    }

    async fn put_product(
        State(calls): State<Calls>,
        Path(id): Path<String>,
        Json(body): Json<Value>,
    ) -> StatusCode {
        record(&calls, format!("put {id}"), body);
        StatusCode::OK
    }

    async fn order_status(
        State(calls): State<Calls>,
        Path(id): Path<String>,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        record(&calls, format!("status {id}"), body);
        Json(json!({"ok": true}))
    }

    async fn settings() -> Json<Value> {
        Json(json!({
            "product_features": {"enable_stock": true},
            "ui": {"show_product_images": true}
        }))
    }

    async fn update_setting(State(calls): State<Calls>, Json(body): Json<Value>) -> StatusCode {
        record(&calls, "setting", body);
        StatusCode::NO_CONTENT
    }

    async fn broken() -> (StatusCode, &'static str) {
        (StatusCode::INTERNAL_SERVER_ERROR, "database down")
    }

    async fn garbage() -> &'static str {
        "<html>not json</html>"
    }

    /// Starts a stub store on an ephemeral port.
    async fn stub_store() -> (CatalogClient, Calls) {
        let calls: Calls = Arc::default();
        let app = Router::new()
            .route("/api/products", get(list_products))
            .route("/api/products/bulk", post(bulk))
            .route("/api/products/{id}", put(put_product))
            .route("/api/orders/{id}/status", put(order_status))
            .route("/api/settings", get(settings).post(update_setting))
            .route("/api/categories", get(broken))
            .route("/api/vendors", get(garbage))
            .with_state(calls.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let api = ApiSettings {
            base_url: format!("http://{addr}/"),
            timeout_secs: Some(5),
        };
        (CatalogClient::new(&api).unwrap(), calls)
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let api = ApiSettings {
            base_url: "::nope::".to_string(),
            timeout_secs: None,
        };
        assert!(matches!(CatalogClient::new(&api), Err(ClientError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_list_products_decodes_lenient_records() {
        let (client, _) = stub_store().await;
        assert!(!client.base_url().ends_with('/'));

        let products = client.list_products().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].price, Money::from_paise(5250));
        assert_eq!(products[1].mrp, None);
    }

    #[tokio::test]
    async fn test_bulk_import_reports_success_count() {
        let (client, calls) = stub_store().await;

        let rows: Vec<RawRow> = ["Rice", "Tea"]
            .into_iter()
            .map(|name| {
                RawRow::from([
                    ("Product".to_string(), Cell::from(name)),
                    ("Rate".to_string(), Cell::from("40")),
                ])
            })
            .collect();
        let request = ImportPreview::build(&rows, MAX_IMPORT_ROWS).unwrap().batch().unwrap();

        let result = client.bulk_create_products(&request).await.unwrap();
        assert_eq!(result.success, 2);

        let calls = calls.lock().unwrap();
        assert_eq!(calls[0].0, "bulk");
        assert_eq!(calls[0].1["products"][1]["name"], "Tea");
    }

    #[tokio::test]
    async fn test_patch_sends_only_touched_fields() {
        let (client, calls) = stub_store().await;

        client
            .patch_product("p1", &ProductPatch::stock(0.0))
            .await
            .unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls[0].0, "put p1");
        assert_eq!(calls[0].1, json!({"stock": 0.0, "availability": false}));
    }

    #[tokio::test]
    async fn test_order_status_update() {
        let (client, calls) = stub_store().await;

        client
            .update_order_status("o7", OrderStatus::Completed)
            .await
            .unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls[0], ("status o7".to_string(), json!({"status": "completed"})));
    }

    #[tokio::test]
    async fn test_settings_round_trip() {
        let (client, calls) = stub_store().await;

        let settings = client.get_settings().await.unwrap();
        assert!(settings.get(SettingFlag::EnableStock));
        assert!(settings.get(SettingFlag::ShowProductImages));
        assert!(!settings.get(SettingFlag::EnableCoupons));

        client
            .update_setting(&SettingUpdate::new(SettingFlag::EnableCoupons, true))
            .await
            .unwrap();
        assert_eq!(
            calls.lock().unwrap()[0].1,
            json!({"key": "customer_features.enable_coupons", "value": true})
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let (client, _) = stub_store().await;

        let err = client.list_categories().await.unwrap_err();
        match err {
            ClientError::Status { status, path, body } => {
                assert_eq!(status, 500);
                assert_eq!(path, "/api/categories");
                assert_eq!(body, "database down");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = client.list_customers().await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_undecodable_body() {
        let (client, _) = stub_store().await;
        assert!(matches!(
            client.list_vendors().await,
            Err(ClientError::Decode { .. })
        ));
    }
}
