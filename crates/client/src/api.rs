//! Remote Store API client.
//!
//! HTTP/JSON collaborator, bearer-token authenticated. This is the single
//! enforcement point for two cross-cutting rules:
//!
//! - **401 handling**: any authenticated response with status 401 clears
//!   the token slot before surfacing [`RemoteError::Unauthorized`], so the
//!   next resolution cycle starts anonymous.
//! - **Response normalization**: list endpoints are known to drift between
//!   bare arrays and `{items: [...]}`-style envelopes. Both shapes are
//!   accepted in exactly one place; anything else is a
//!   [`RemoteError::Shape`], never branching logic in a consumer.
//!
//! The [`StoreBackend`] trait covers the operations the resolver and the
//! workflows depend on, so they can be exercised against fakes in tests.

use std::future::Future;
use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use farmstall_core::{
    Order, OrderReceipt, Product, ProductId, UserId, VendorApplication, VendorApplicationId,
    VendorStatus,
};

use crate::config::ClientConfig;
use crate::error::RemoteError;
use crate::store::TokenStore;

/// Keys under which the store has been observed to wrap list payloads.
const LIST_ENVELOPE_KEYS: &[&str] = &["items", "products", "orders", "applications", "data"];

// ─────────────────────────────────────────────────────────────────────────────
// Request / response types
// ─────────────────────────────────────────────────────────────────────────────

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    pub product_id: ProductId,
    pub quantity: Decimal,
    pub mobile: String,
    pub address: String,
}

/// Body of `POST /apply-vendor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendorApplicationRequest {
    pub shop_name: String,
    /// The store's wire name for the contact number.
    pub whatsapp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Fields of the multipart `PUT /products/{id}`.
#[derive(Debug, Clone)]
pub struct ProductUpdate {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: Decimal,
    pub image: Option<ImageUpload>,
}

/// Image file attached to a product update.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct VendorStatusResponse {
    status: VendorStatus,
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend seam
// ─────────────────────────────────────────────────────────────────────────────

/// Operations the session resolver and the workflows consume.
///
/// [`StoreApi`] is the production implementation; tests substitute fakes
/// that count calls, which is how "no network call on local rejection" is
/// asserted.
pub trait StoreBackend: Send + Sync {
    /// `GET /vendors/status/{userId}`.
    fn vendor_status(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<VendorStatus, RemoteError>> + Send;

    /// `GET /products`.
    fn fetch_products(&self) -> impl Future<Output = Result<Vec<Product>, RemoteError>> + Send;

    /// `GET /products/{id}`.
    fn fetch_product(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<Product, RemoteError>> + Send;

    /// `POST /orders`.
    fn submit_order(
        &self,
        request: &OrderRequest,
    ) -> impl Future<Output = Result<OrderReceipt, RemoteError>> + Send;

    /// `GET /orders` (the caller's own orders).
    fn fetch_orders(&self) -> impl Future<Output = Result<Vec<Order>, RemoteError>> + Send;

    /// `POST /apply-vendor`.
    fn apply_vendor(
        &self,
        application: &VendorApplicationRequest,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// `GET /vendors/pending`.
    fn pending_vendors(
        &self,
    ) -> impl Future<Output = Result<Vec<VendorApplication>, RemoteError>> + Send;

    /// `POST /vendors/{id}/approve`.
    fn approve_vendor(
        &self,
        id: &VendorApplicationId,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// `POST /vendors/{id}/reject`.
    fn reject_vendor(
        &self,
        id: &VendorApplicationId,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;
}

// ─────────────────────────────────────────────────────────────────────────────
// StoreApi
// ─────────────────────────────────────────────────────────────────────────────

/// Production Remote Store API client.
#[derive(Clone)]
pub struct StoreApi {
    inner: Arc<StoreApiInner>,
}

struct StoreApiInner {
    client: reqwest::Client,
    base_url: String,
    store: TokenStore,
}

impl StoreApi {
    /// Create a client for the configured store, sharing the given token
    /// slot with the rest of the application.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig, store: TokenStore) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(StoreApiInner {
                client,
                base_url: config.api_base_url.as_str().trim_end_matches('/').to_owned(),
                store,
            }),
        })
    }

    /// The token slot this client clears on 401.
    #[must_use]
    pub fn token_store(&self) -> &TokenStore {
        &self.inner.store
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Attach the stored bearer token, if any. Requests without a token go
    /// out unauthenticated and let the store answer 401.
    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.inner.store.load() {
            Ok(Some(token)) => builder.bearer_auth(token),
            Ok(None) => builder,
            Err(e) => {
                tracing::warn!(error = %e, "token slot unreadable; sending unauthenticated");
                builder
            }
        }
    }

    /// Send a request and decode a JSON body, applying the global 401 rule.
    async fn execute<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, RemoteError> {
        let text = self.execute_raw(builder).await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(200).collect::<String>(),
                "failed to parse store response"
            );
            RemoteError::Parse(e)
        })
    }

    /// Send a request where the body, if any, is ignored.
    async fn execute_empty(&self, builder: reqwest::RequestBuilder) -> Result<(), RemoteError> {
        self.execute_raw(builder).await.map(drop)
    }

    /// Send a request and decode a normalized list body.
    async fn execute_list<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<Vec<T>, RemoteError> {
        let value: Value = self.execute(builder).await?;
        normalize_list(value)
    }

    async fn execute_raw(&self, builder: reqwest::RequestBuilder) -> Result<String, RemoteError> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("store returned 401; clearing the session slot");
            if let Err(e) = self.inner.store.clear() {
                tracing::error!(error = %e, "failed to clear the session slot after 401");
            }
            return Err(RemoteError::Unauthorized);
        }

        // Read text first so failed responses keep their own wording.
        let text = response.text().await?;

        if !status.is_success() {
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message: extract_message(&text),
            });
        }

        Ok(text)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Authentication
    // ─────────────────────────────────────────────────────────────────────

    /// `POST /users/signup`. On success the issued token is saved into the
    /// slot, replacing whatever was there.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the slot cannot be
    /// written.
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<String, RemoteError> {
        let body = serde_json::json!({
            "username": username,
            "email": email,
            "password": password.expose_secret(),
        });
        let response: TokenResponse = self
            .execute(self.inner.client.post(self.endpoint("/users/signup")).json(&body))
            .await?;
        self.persist_token(&response.access_token)?;
        Ok(response.access_token)
    }

    /// `POST /users/login`. On success the issued token is saved into the
    /// slot, replacing whatever was there.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the slot cannot be
    /// written.
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<String, RemoteError> {
        let body = serde_json::json!({
            "email": email,
            "password": password.expose_secret(),
        });
        let response: TokenResponse = self
            .execute(self.inner.client.post(self.endpoint("/users/login")).json(&body))
            .await?;
        self.persist_token(&response.access_token)?;
        Ok(response.access_token)
    }

    fn persist_token(&self, token: &str) -> Result<(), RemoteError> {
        self.inner.store.save(token).map_err(|e| {
            tracing::error!(error = %e, "failed to persist the issued token");
            RemoteError::Store(e)
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Vendor product management
    // ─────────────────────────────────────────────────────────────────────

    /// `PUT /products/{id}` - multipart update of a vendor's product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the store rejects it.
    pub async fn update_product(
        &self,
        id: &ProductId,
        update: ProductUpdate,
    ) -> Result<Product, RemoteError> {
        let mut form = Form::new()
            .text("name", update.name)
            .text("description", update.description)
            .text("price", update.price.to_string())
            .text("stock", update.stock.to_string());

        if let Some(image) = update.image {
            form = form.part("image", Part::bytes(image.bytes).file_name(image.file_name));
        }

        let builder = self
            .inner
            .client
            .put(self.endpoint(&format!("/products/{id}")))
            .multipart(form);
        self.execute(self.authed(builder)).await
    }
}

impl StoreBackend for StoreApi {
    async fn vendor_status(&self, user_id: &UserId) -> Result<VendorStatus, RemoteError> {
        let builder = self
            .inner
            .client
            .get(self.endpoint(&format!("/vendors/status/{user_id}")));
        let response: VendorStatusResponse = self.execute(self.authed(builder)).await?;
        Ok(response.status)
    }

    async fn fetch_products(&self) -> Result<Vec<Product>, RemoteError> {
        let builder = self.inner.client.get(self.endpoint("/products"));
        self.execute_list(builder).await
    }

    async fn fetch_product(&self, id: &ProductId) -> Result<Product, RemoteError> {
        let builder = self.inner.client.get(self.endpoint(&format!("/products/{id}")));
        self.execute(builder).await
    }

    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderReceipt, RemoteError> {
        let builder = self
            .inner
            .client
            .post(self.endpoint("/orders"))
            .json(request);
        self.execute(self.authed(builder)).await
    }

    async fn fetch_orders(&self) -> Result<Vec<Order>, RemoteError> {
        let builder = self.inner.client.get(self.endpoint("/orders"));
        self.execute_list(self.authed(builder)).await
    }

    async fn apply_vendor(
        &self,
        application: &VendorApplicationRequest,
    ) -> Result<(), RemoteError> {
        let builder = self
            .inner
            .client
            .post(self.endpoint("/apply-vendor"))
            .json(application);
        self.execute_empty(self.authed(builder)).await
    }

    async fn pending_vendors(&self) -> Result<Vec<VendorApplication>, RemoteError> {
        let builder = self.inner.client.get(self.endpoint("/vendors/pending"));
        self.execute_list(self.authed(builder)).await
    }

    async fn approve_vendor(&self, id: &VendorApplicationId) -> Result<(), RemoteError> {
        let builder = self
            .inner
            .client
            .post(self.endpoint(&format!("/vendors/{id}/approve")));
        self.execute_empty(self.authed(builder)).await
    }

    async fn reject_vendor(&self, id: &VendorApplicationId) -> Result<(), RemoteError> {
        let builder = self
            .inner
            .client
            .post(self.endpoint(&format!("/vendors/{id}/reject")));
        self.execute_empty(self.authed(builder)).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Response normalization
// ─────────────────────────────────────────────────────────────────────────────

/// Accept a bare array or a single-key list envelope; anything else is
/// shape drift.
fn normalize_list<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, RemoteError> {
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(ref map) => {
            for key in LIST_ENVELOPE_KEYS {
                if let Some(inner) = map.get(*key)
                    && inner.is_array()
                {
                    return Ok(serde_json::from_value(inner.clone())?);
                }
            }
            Err(RemoteError::Shape(
                "expected a list or a known list envelope".to_owned(),
            ))
        }
        other => Err(RemoteError::Shape(format!(
            "expected a list, got {}",
            json_kind(&other)
        ))),
    }
}

/// Pull the store's human-readable message out of an error body.
///
/// The store answers errors as `{"message": ...}` (sometimes `detail` or
/// `error`); fall back to the raw body so nothing is swallowed.
fn extract_message(body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "detail", "error"] {
            if let Some(Value::String(message)) = map.get(key) {
                return message.clone();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "(no error details provided)".to_owned()
    } else {
        trimmed.chars().take(200).collect()
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_bare_array() {
        let value = json!([{"status": "pending"}, {"status": "approved"}]);
        let list: Vec<VendorStatusResponse> = normalize_list(value).expect("normalize");
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].status, VendorStatus::Approved);
    }

    #[test]
    fn test_normalize_enveloped_list() {
        for key in ["items", "products", "data"] {
            let value = json!({ key: [{"status": "rejected"}] });
            let list: Vec<VendorStatusResponse> = normalize_list(value).expect("normalize");
            assert_eq!(list.len(), 1);
        }
    }

    #[test]
    fn test_normalize_rejects_unknown_envelope() {
        let value = json!({"results": []});
        let result: Result<Vec<VendorStatusResponse>, _> = normalize_list(value);
        assert!(matches!(result, Err(RemoteError::Shape(_))));
    }

    #[test]
    fn test_normalize_rejects_scalar() {
        let result: Result<Vec<VendorStatusResponse>, _> = normalize_list(json!(42));
        assert!(matches!(result, Err(RemoteError::Shape(_))));
    }

    #[test]
    fn test_extract_message_prefers_json_message() {
        assert_eq!(
            extract_message(r#"{"message":"Not enough stock"}"#),
            "Not enough stock"
        );
        assert_eq!(extract_message(r#"{"detail":"expired"}"#), "expired");
    }

    #[test]
    fn test_extract_message_falls_back_to_body() {
        assert_eq!(extract_message("plain failure"), "plain failure");
        assert_eq!(extract_message("  "), "(no error details provided)");
    }

    #[test]
    fn test_order_request_wire_shape() {
        let request = OrderRequest {
            product_id: ProductId::new("p1"),
            quantity: rust_decimal_macros::dec!(1.5),
            mobile: "+27 82 000 0000".to_owned(),
            address: "1 Farm Rd".to_owned(),
        };
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["product_id"], "p1");
        assert!(value.get("quantity").is_some());
        assert_eq!(value["address"], "1 Farm Rd");
    }

    use std::sync::atomic::{AtomicU32, Ordering};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use crate::config::ClientConfig;
    use crate::store::TokenStore;

    static SLOT: AtomicU32 = AtomicU32::new(0);

    fn temp_store() -> TokenStore {
        let n = SLOT.fetch_add(1, Ordering::Relaxed);
        TokenStore::new(
            std::env::temp_dir()
                .join(format!("farmstall-api-test-{}-{n}", std::process::id()))
                .join("token"),
        )
    }

    /// One-shot HTTP server answering every request with a canned
    /// response.
    async fn one_shot_server(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.expect("write");
            socket.shutdown().await.ok();
        });

        format!("http://{addr}")
    }

    fn api_for(base_url: &str, store: TokenStore) -> StoreApi {
        let config = ClientConfig {
            api_base_url: base_url.parse().expect("url"),
            token_path: store.path().to_path_buf(),
            http_timeout: std::time::Duration::from_secs(5),
        };
        StoreApi::new(&config, store).expect("client")
    }

    #[tokio::test]
    async fn test_401_clears_the_stored_token() {
        let base_url = one_shot_server("HTTP/1.1 401 Unauthorized", "{}").await;
        let store = temp_store();
        store.save("h.p.s").expect("save");

        let api = api_for(&base_url, store.clone());
        let result = api.fetch_orders().await;

        assert!(matches!(result, Err(RemoteError::Unauthorized)));
        // The global rule: the slot is gone, so the next resolve() is
        // anonymous.
        assert_eq!(store.load().expect("load"), None);
    }

    #[tokio::test]
    async fn test_store_error_message_survives_verbatim() {
        let base_url = one_shot_server(
            "HTTP/1.1 422 Unprocessable Entity",
            r#"{"message":"Not enough stock"}"#,
        )
        .await;
        let store = temp_store();
        store.save("h.p.s").expect("save");

        let api = api_for(&base_url, store.clone());
        let result = api
            .submit_order(&OrderRequest {
                product_id: ProductId::new("p1"),
                quantity: rust_decimal_macros::dec!(1),
                mobile: "+27".to_owned(),
                address: "1 Farm Rd".to_owned(),
            })
            .await;

        match result {
            Err(RemoteError::Api { status, message }) => {
                assert_eq!(status, 422);
                assert_eq!(message, "Not enough stock");
            }
            other => panic!("expected store error, got {other:?}"),
        }
        // Non-401 failures leave the slot alone.
        assert_eq!(store.load().expect("load").as_deref(), Some("h.p.s"));
        store.clear().expect("clear");
    }

    #[tokio::test]
    async fn test_vendor_status_parses_envelope() {
        let base_url =
            one_shot_server("HTTP/1.1 200 OK", r#"{"status":"approved"}"#).await;
        let store = temp_store();

        let api = api_for(&base_url, store);
        let status = api
            .vendor_status(&UserId::new("u1"))
            .await
            .expect("status");
        assert_eq!(status, VendorStatus::Approved);
    }

    #[test]
    fn test_vendor_application_omits_empty_description() {
        let request = VendorApplicationRequest {
            shop_name: "Green Acres".to_owned(),
            whatsapp: "+27 82 000 0000".to_owned(),
            description: None,
        };
        let value = serde_json::to_value(&request).expect("serialize");
        assert!(value.get("description").is_none());
        assert_eq!(value["whatsapp"], "+27 82 000 0000");
    }
}
