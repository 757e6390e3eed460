//! REST client implementation.

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use rocketshoes_core::{Product, ProductId, Stock};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::ApiError;
use crate::config::ApiConfig;
use crate::services::{CatalogService, StockService};

/// Upper bound on cached products.
const CATALOG_CACHE_CAPACITY: u64 = 1000;

/// Client for the catalog and stock endpoints.
///
/// Cheaply cloneable; clones share the HTTP connection pool and the product
/// cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    catalog_cache: Option<Cache<ProductId, Product>>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| ApiError::InvalidToken(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        let catalog_cache = config.catalog_cache_ttl.map(|ttl| {
            Cache::builder()
                .max_capacity(CATALOG_CACHE_CAPACITY)
                .time_to_live(ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                catalog_cache,
            }),
        })
    }

    /// Fetch product metadata, serving from the cache when possible.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown products, or any transport,
    /// status or parse error.
    #[instrument(skip_all, fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        if let Some(cache) = &self.inner.catalog_cache
            && let Some(product) = cache.get(&id).await
        {
            debug!("catalog cache hit");
            return Ok(product);
        }

        let product: Product = self.get_json(&format!("products/{id}")).await?;
        ensure_id(id, product.id)?;

        if let Some(cache) = &self.inner.catalog_cache {
            cache.insert(id, product.clone()).await;
        }

        Ok(product)
    }

    /// Fetch the current stock level. Never cached.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown products, or any transport,
    /// status or parse error.
    #[instrument(skip_all, fields(product_id = %id))]
    pub async fn get_stock(&self, id: ProductId) -> Result<Stock, ApiError> {
        let stock: Stock = self.get_json(&format!("stock/{id}")).await?;
        ensure_id(id, stock.id)?;
        Ok(stock)
    }

    /// Resolve an API path against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Execute a GET request and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "API returned non-success status"
            );
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

fn ensure_id(requested: ProductId, received: ProductId) -> Result<(), ApiError> {
    if requested == received {
        Ok(())
    } else {
        Err(ApiError::UnexpectedId {
            requested,
            received,
        })
    }
}

#[async_trait]
impl CatalogService for ApiClient {
    async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.get_product(id).await
    }
}

#[async_trait]
impl StockService for ApiClient {
    async fn stock(&self, id: ProductId) -> Result<Stock, ApiError> {
        self.get_stock(id).await
    }
}
