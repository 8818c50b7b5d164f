//! JSON/HTTP implementation of [`LinkApi`].
//!
//! Endpoints live under a configurable base URL:
//!
//! | Operation | Request                        |
//! |-----------|--------------------------------|
//! | list      | `GET    {base}/{collection}`      |
//! | create    | `POST   {base}/{collection}`      |
//! | update    | `PATCH  {base}/{collection}/{id}` |
//! | delete    | `DELETE {base}/{collection}/{id}` |
//!
//! with collections `mappings`, `options` and `suppliers`.

use std::time::Duration;

use async_trait::async_trait;
use kogebog_core::model::{
    MappingPatch, OptionPatch, ProductMapping, Supplier, SupplierOption, SupplierPatch,
};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::LinkApi;
use crate::error::ApiError;

/// Default request timeout for a single API call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const MAPPINGS: &str = "mappings";
const OPTIONS: &str = "options";
const SUPPLIERS: &str = "suppliers";

/// HTTP client for the link API.
pub struct HttpLinkApi {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl std::fmt::Debug for HttpLinkApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpLinkApi")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl HttpLinkApi {
    /// Create a client with its own connection pool and request timeout.
    ///
    /// * `base_url` - API root, e.g. `http://localhost:3000/api/v1`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, ApiError> {
        let parsed =
            Url::parse(base_url).map_err(|_| ApiError::InvalidBaseUrl(base_url.to_string()))?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            client,
            base_url: parsed,
            token: None,
        })
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL below the base, percent-encoding each segment.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Base URLs are validated as http(s) in the constructor, so they
        // always have path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    // ---- private helpers ----

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        tracing::debug!(%method, %url, "Link API request");
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn list<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, ApiError> {
        let response = self
            .request(Method::GET, self.endpoint(&[collection]))
            .send()
            .await?;
        let response = Self::ensure_success(response, None).await?;
        Ok(response.json::<Vec<T>>().await?)
    }

    async fn create<B, T>(&self, collection: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::POST, self.endpoint(&[collection]))
            .json(body)
            .send()
            .await?;
        let response = Self::ensure_success(response, None).await?;
        Ok(response.json::<T>().await?)
    }

    async fn update<B, T>(
        &self,
        entity: &'static str,
        collection: &str,
        id: &str,
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::PATCH, self.endpoint(&[collection, id]))
            .json(body)
            .send()
            .await?;
        let response = Self::ensure_success(response, Some((entity, id))).await?;
        Ok(response.json::<T>().await?)
    }

    async fn delete(&self, entity: &'static str, collection: &str, id: &str) -> Result<(), ApiError> {
        let response = self
            .request(Method::DELETE, self.endpoint(&[collection, id]))
            .send()
            .await?;
        Self::ensure_success(response, Some((entity, id))).await?;
        Ok(())
    }

    /// Map non-2xx responses onto [`ApiError`]. A 404 on an addressed
    /// record becomes [`ApiError::NotFound`].
    async fn ensure_success(
        response: reqwest::Response,
        target: Option<(&'static str, &str)>,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ApiError::RateLimited);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            if let Some((entity, id)) = target {
                return Err(ApiError::NotFound {
                    entity,
                    id: id.to_string(),
                });
            }
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(ApiError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl LinkApi for HttpLinkApi {
    async fn list_mappings(&self) -> Result<Vec<ProductMapping>, ApiError> {
        self.list(MAPPINGS).await
    }

    async fn create_mapping(&self, mapping: &ProductMapping) -> Result<ProductMapping, ApiError> {
        self.create(MAPPINGS, mapping).await
    }

    async fn update_mapping(
        &self,
        id: &str,
        patch: &MappingPatch,
    ) -> Result<ProductMapping, ApiError> {
        self.update("mapping", MAPPINGS, id, patch).await
    }

    async fn delete_mapping(&self, id: &str) -> Result<(), ApiError> {
        self.delete("mapping", MAPPINGS, id).await
    }

    async fn list_options(&self) -> Result<Vec<SupplierOption>, ApiError> {
        self.list(OPTIONS).await
    }

    async fn create_option(&self, option: &SupplierOption) -> Result<SupplierOption, ApiError> {
        self.create(OPTIONS, option).await
    }

    async fn update_option(
        &self,
        id: &str,
        patch: &OptionPatch,
    ) -> Result<SupplierOption, ApiError> {
        self.update("option", OPTIONS, id, patch).await
    }

    async fn delete_option(&self, id: &str) -> Result<(), ApiError> {
        self.delete("option", OPTIONS, id).await
    }

    async fn list_suppliers(&self) -> Result<Vec<Supplier>, ApiError> {
        self.list(SUPPLIERS).await
    }

    async fn create_supplier(&self, supplier: &Supplier) -> Result<Supplier, ApiError> {
        self.create(SUPPLIERS, supplier).await
    }

    async fn update_supplier(&self, id: &str, patch: &SupplierPatch) -> Result<Supplier, ApiError> {
        self.update("supplier", SUPPLIERS, id, patch).await
    }

    async fn delete_supplier(&self, id: &str) -> Result<(), ApiError> {
        self.delete("supplier", SUPPLIERS, id).await
    }
}
