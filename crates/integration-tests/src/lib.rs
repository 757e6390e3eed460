//! Integration tests for RocketShoes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! Tests start a [`MockApi`] (an `axum` server on an ephemeral port) serving
//! `/products/{id}` and `/stock/{id}`, and point the real storefront client at
//! it. Cart storage goes to a temporary directory.

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rocketshoes_storefront::CartStore;
use rocketshoes_storefront::config::StorefrontConfig;
use rocketshoes_storefront::notify::RecordingNotifier;
use rocketshoes_storefront::state::AppState;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use url::Url;

#[derive(Default)]
struct MockData {
    products: HashMap<i32, Value>,
    stock: HashMap<i32, i64>,
    stock_down: bool,
    product_hits: usize,
    stock_hits: usize,
    last_authorization: Option<String>,
}

#[derive(Clone, Default)]
struct MockState(Arc<Mutex<MockData>>);

impl MockState {
    fn lock(&self) -> MutexGuard<'_, MockData> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// In-process catalog/stock API.
pub struct MockApi {
    addr: SocketAddr,
    state: MockState,
    server: JoinHandle<()>,
}

impl MockApi {
    /// Start the mock server on 127.0.0.1 with an ephemeral port.
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new()
            .route("/products/{id}", get(product))
            .route("/stock/{id}", get(stock))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock API");
        let addr = listener.local_addr().expect("Mock API has no address");

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/", self.addr)).expect("Mock API URL is valid")
    }

    /// Register a product the way the legacy API serves it (`title`/`image`).
    pub fn add_product(&self, id: i32, title: &str, price: f64, stock: i64) {
        let mut data = self.state.lock();
        data.products.insert(
            id,
            json!({
                "id": id,
                "title": title,
                "price": price,
                "image": format!("https://cdn.example/{id}.jpg"),
            }),
        );
        data.stock.insert(id, stock);
    }

    pub fn set_stock(&self, id: i32, amount: i64) {
        self.state.lock().stock.insert(id, amount);
    }

    /// Make `/stock/{id}` answer 500 until switched back.
    pub fn set_stock_down(&self, down: bool) {
        self.state.lock().stock_down = down;
    }

    #[must_use]
    pub fn product_hits(&self) -> usize {
        self.state.lock().product_hits
    }

    #[must_use]
    pub fn stock_hits(&self) -> usize {
        self.state.lock().stock_hits
    }

    /// `Authorization` header of the most recent request.
    #[must_use]
    pub fn last_authorization(&self) -> Option<String> {
        self.state.lock().last_authorization.clone()
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn product(
    State(state): State<MockState>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Response {
    let mut data = state.lock();
    data.product_hits += 1;
    data.last_authorization = authorization(&headers);

    data.products.get(&id).map_or_else(
        || StatusCode::NOT_FOUND.into_response(),
        |body| Json(body.clone()).into_response(),
    )
}

async fn stock(
    State(state): State<MockState>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Response {
    let mut data = state.lock();
    data.stock_hits += 1;
    data.last_authorization = authorization(&headers);

    if data.stock_down {
        return (StatusCode::INTERNAL_SERVER_ERROR, "stock service unavailable").into_response();
    }

    data.stock.get(&id).map_or_else(
        || StatusCode::NOT_FOUND.into_response(),
        |&amount| Json(json!({ "id": id, "amount": amount })).into_response(),
    )
}

fn authorization(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

/// Storefront state pointed at `api`, storing the cart under `dir`.
///
/// `extra` overrides or adds environment variables.
#[must_use]
pub fn app_state(api: &MockApi, dir: &tempfile::TempDir, extra: &[(&str, &str)]) -> AppState {
    let mut vars: HashMap<String, String> = HashMap::from([
        (
            "ROCKETSHOES_API_URL".to_string(),
            api.base_url().to_string(),
        ),
        (
            "ROCKETSHOES_STORAGE_PATH".to_string(),
            dir.path().join("storage.json").display().to_string(),
        ),
    ]);
    for (key, value) in extra {
        vars.insert((*key).to_string(), (*value).to_string());
    }

    let config = StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
        .expect("Test configuration is valid");
    AppState::new(config).expect("API client builds")
}

/// Cart store over `state` with a notifier the test can inspect.
#[must_use]
pub fn cart_store(state: &AppState) -> (CartStore, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let store = state.cart_store(notifier.clone());
    (store, notifier)
}
