//! Integration tests for Tienda.
//!
//! Each test starts the storefront router on an ephemeral local port and
//! drives it over HTTP with `reqwest`. The cart is backed by
//! [`MemoryStorage`] so tests can inspect exactly what was persisted, and
//! categories are assigned by id so filters are predictable.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tienda-integration-tests
//! ```

#![allow(clippy::missing_panics_doc)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};
use reqwest::Client;
use serde_json::{Value, json};
use tienda_storefront::cart::{CartStore, MemoryStorage};
use tienda_storefront::catalog::{CatalogClient, CatalogStore, CategoriesById, ProductRecord};
use tienda_storefront::config::{CatalogConfig, StorefrontConfig};
use tienda_storefront::routes;
use tienda_storefront::state::{AppState, SharedStorage};
use url::Url;

/// A running storefront plus handles to its storage.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub storage: MemoryStorage,
    pub state: AppState,
}

impl TestContext {
    /// Storefront with the sample catalog already loaded and an empty cart.
    pub async fn new() -> Self {
        Self::with_storage(MemoryStorage::new()).await
    }

    /// Storefront with the sample catalog loaded and a cart restored from `storage`.
    pub async fn with_storage(storage: MemoryStorage) -> Self {
        let config = test_config(unreachable_catalog_url());
        let client = CatalogClient::new(config.catalog.url.clone(), config.catalog.timeout)
            .expect("Failed to build catalog client");

        let mut catalog = CatalogStore::new(CategoriesById);
        catalog.load(sample_records());

        let shared: SharedStorage = Arc::new(storage.clone());
        let state = AppState::with_parts(config, client, catalog, CartStore::open(shared));

        Self::serve(state, storage).await
    }

    /// Storefront whose catalog is fetched from `catalog_url`, not yet loaded.
    pub async fn with_catalog_url(catalog_url: Url) -> Self {
        let storage = MemoryStorage::new();
        let shared: SharedStorage = Arc::new(storage.clone());
        let config = test_config(catalog_url);
        let client = CatalogClient::new(config.catalog.url.clone(), config.catalog.timeout)
            .expect("Failed to build catalog client");

        let state = AppState::with_parts(
            config,
            client,
            CatalogStore::new(CategoriesById),
            CartStore::open(shared),
        );

        Self::serve(state, storage).await
    }

    async fn serve(state: AppState, storage: MemoryStorage) -> Self {
        let addr = spawn_router(routes::app(state.clone())).await;

        Self {
            client: Client::new(),
            base_url: format!("http://{addr}"),
            storage,
            state,
        }
    }

    /// Absolute URL for `path` on the test server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path` and return the status and body.
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request");
        let status = resp.status();
        (status, resp.text().await.expect("Failed to read body"))
    }

    /// POST a form to `path`.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("Failed to send request")
    }

    /// Add one unit of `product_id` to the cart.
    pub async fn add_to_cart(&self, product_id: i32) -> reqwest::Response {
        let id = product_id.to_string();
        self.post_form("/cart/add", &[("product_id", id.as_str())])
            .await
    }

    /// The persisted cart snapshot, parsed.
    #[must_use]
    pub fn snapshot(&self) -> Option<Value> {
        self.storage
            .get("cart")
            .map(|raw| serde_json::from_str(&raw).expect("snapshot is valid JSON"))
    }
}

/// Configuration pointing at `catalog_url` with a short timeout.
#[must_use]
pub fn test_config(catalog_url: Url) -> StorefrontConfig {
    StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        catalog: CatalogConfig::new(catalog_url),
        data_dir: std::env::temp_dir(),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// A catalog URL nothing listens on.
#[must_use]
pub fn unreachable_catalog_url() -> Url {
    Url::parse("http://127.0.0.1:9/products").expect("valid URL")
}

/// Six products. With [`CategoriesById`]: 1 and 4 are accesorios, 2 and 5
/// are ofertas, 3 and 6 are ropa.
#[must_use]
pub fn sample_catalog_json() -> Value {
    json!([
        { "id": 1, "title": "Mochila Fjallraven", "price": 109.95, "image": "https://img.test/1.jpg" },
        { "id": 2, "title": "Camiseta Slim Fit", "price": 22.3, "image": "https://img.test/2.jpg" },
        { "id": 3, "title": "Chaqueta de Algodon", "price": 55.99, "image": "https://img.test/3.jpg" },
        { "id": 4, "title": "Gorra Casual", "price": 15.99, "image": "https://img.test/4.jpg" },
        { "id": 5, "title": "Pulsera Dragon", "price": 695, "image": "https://img.test/5.jpg" },
        { "id": 6, "title": "Anillo Micropave", "price": 168, "image": "https://img.test/6.jpg" }
    ])
}

/// [`sample_catalog_json`] as records.
#[must_use]
pub fn sample_records() -> Vec<ProductRecord> {
    serde_json::from_value(sample_catalog_json()).expect("sample catalog parses")
}

/// Serve `router` on an ephemeral local port.
pub async fn spawn_router(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener has an address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Test server error");
    });

    addr
}

/// A fake catalog API.
pub struct FakeCatalog {
    pub url: Url,
    pub hits: Arc<AtomicUsize>,
}

impl FakeCatalog {
    /// Serve `status` with `body` at `/products`, for the first `failures`
    /// requests; the sample catalog afterwards.
    pub async fn start(failures: usize, status: StatusCode, body: &'static str) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        let router = Router::new().route(
            "/products",
            get(move || {
                let counter = Arc::clone(&counter);
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) < failures {
                        (status, body.to_owned()).into_response()
                    } else {
                        axum::Json(sample_catalog_json()).into_response()
                    }
                }
            }),
        );

        let addr = spawn_router(router).await;
        let url = Url::parse(&format!("http://{addr}/products")).expect("valid URL");

        Self { url, hits }
    }

    /// A catalog that always answers with the sample products.
    pub async fn healthy() -> Self {
        Self::start(0, StatusCode::OK, "").await
    }

    /// Number of requests served so far.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}
