//! Integration tests for the luv2shop storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p luv2shop-integration-tests
//! ```
//!
//! No external services are needed: [`MockBackend`] serves a small canned
//! catalog on an ephemeral local port with the same envelopes and paths as
//! the luv2shop REST API, and the storefront router is driven in-process.
//!
//! # Test Categories
//!
//! - `api_clients` - Catalog, reference and checkout clients against the mock
//! - `storefront_routes` - Cart and checkout over the HTTP surface

#![allow(clippy::unwrap_used, clippy::missing_panics_doc, clippy::expect_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use http_body_util::BodyExt;
use luv2shop_storefront::config::StorefrontConfig;
use luv2shop_storefront::state::AppState;
use luv2shop_storefront::storage::MemoryStore;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::ServiceExt;
use url::Url;

/// Default page size of the luv2shop API.
const API_PAGE_SIZE: usize = 20;

/// `(id, category, name, unit price)` of the canned catalog.
const PRODUCTS: &[(i64, i64, &str, f64)] = &[
    (1, 1, "Crash Course in Python", 14.99),
    (2, 1, "Become a Guru in JavaScript", 20.99),
    (3, 1, "Exploring Vue.js", 14.99),
    (4, 1, "Advanced Techniques in Big Data", 13.99),
    (5, 1, "Crash Course in Big Data", 18.99),
    (6, 1, "JavaScript Cookbook", 23.99),
    (7, 2, "Coffee Mug - Express", 18.99),
    (8, 3, "Mouse Pad - Fast", 10.00),
];

const CATEGORIES: &[(i64, &str)] = &[(1, "Books"), (2, "Coffee Mugs"), (3, "Mouse Pads")];

const COUNTRIES: &[(i64, &str, &str)] = &[
    (1, "BR", "Brazil"),
    (2, "US", "United States"),
    (3, "AQ", "Antarctica"),
];

const STATES: &[(i64, &str, &str)] = &[
    (1, "BR", "Acre"),
    (2, "BR", "Bahia"),
    (3, "US", "Alabama"),
    (4, "US", "Alaska"),
];

/// Requests and purchases seen by the mock backend.
#[derive(Default)]
pub struct Recorded {
    pub requests: Vec<String>,
    pub purchases: Vec<Value>,
}

/// A luv2shop REST API stand-in listening on `127.0.0.1`.
pub struct MockBackend {
    /// API base URL (`http://127.0.0.1:{port}/api`).
    pub base_url: Url,
    recorded: Arc<Mutex<Recorded>>,
}

impl MockBackend {
    /// Start the backend on an ephemeral port.
    pub async fn spawn() -> Self {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let api = Router::new()
            .route("/products/search/findByCategoryId", get(products_by_category))
            .route("/products/search/findByNameContaining", get(products_by_name))
            .route("/products/{id}", get(product))
            .route("/product-category", get(categories))
            .route("/countries", get(countries))
            .route("/states/search/findByCountryCode", get(states))
            .route("/checkout/purchase", post(purchase))
            .with_state(Arc::clone(&recorded));
        let app = Router::new().nest("/api", api);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}/api")).unwrap(),
            recorded,
        }
    }

    /// Paths (with query) requested so far.
    pub fn requests(&self) -> Vec<String> {
        self.recorded.lock().unwrap().requests.clone()
    }

    /// Purchase bodies posted so far.
    pub fn purchases(&self) -> Vec<Value> {
        self.recorded.lock().unwrap().purchases.clone()
    }
}

type Shared = State<Arc<Mutex<Recorded>>>;

fn record(recorded: &Shared, path: &str, query: &HashMap<String, String>) {
    let mut pairs: Vec<_> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
    pairs.sort();
    let entry = if pairs.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{}", pairs.join("&"))
    };
    recorded.0.lock().unwrap().requests.push(entry);
}

fn product_json(&(id, category, name, price): &(i64, i64, &str, f64)) -> Value {
    json!({
        "id": id,
        "sku": format!("SKU-{category}-{id}"),
        "name": name,
        "description": format!("About {name}"),
        "unitPrice": price,
        "imageUrl": format!("assets/images/products/{id}.png"),
        "active": true,
        "unitsInStock": 100,
        "dateCreated": "2026-01-05T10:00:00Z",
        "lastUpdated": null,
    })
}

fn paged(key: &str, items: &[Value], query: &HashMap<String, String>) -> Value {
    let page: usize = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
    let size: usize = query
        .get("size")
        .and_then(|s| s.parse().ok())
        .unwrap_or(API_PAGE_SIZE);
    let slice: Vec<Value> = items.iter().skip(page * size).take(size).cloned().collect();
    json!({
        "_embedded": { (key): slice },
        "page": {
            "size": size,
            "totalElements": items.len(),
            "totalPages": items.len().div_ceil(size),
            "number": page,
        }
    })
}

async fn products_by_category(
    recorded: Shared,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    record(&recorded, "/products/search/findByCategoryId", &query);
    let category: i64 = query.get("id").and_then(|id| id.parse().ok()).unwrap_or(0);
    let items: Vec<Value> = PRODUCTS
        .iter()
        .filter(|p| p.1 == category)
        .map(product_json)
        .collect();
    Json(paged("products", &items, &query))
}

async fn products_by_name(
    recorded: Shared,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    record(&recorded, "/products/search/findByNameContaining", &query);
    let name = query.get("name").cloned().unwrap_or_default().to_lowercase();
    let items: Vec<Value> = PRODUCTS
        .iter()
        .filter(|p| p.2.to_lowercase().contains(&name))
        .map(product_json)
        .collect();
    Json(paged("products", &items, &query))
}

async fn product(recorded: Shared, Path(id): Path<i64>) -> Response {
    record(&recorded, &format!("/products/{id}"), &HashMap::new());
    PRODUCTS.iter().find(|p| p.0 == id).map_or_else(
        || StatusCode::NOT_FOUND.into_response(),
        |p| Json(product_json(p)).into_response(),
    )
}

async fn categories(recorded: Shared) -> Json<Value> {
    record(&recorded, "/product-category", &HashMap::new());
    let items: Vec<Value> = CATEGORIES
        .iter()
        .map(|(id, name)| json!({ "id": id, "categoryName": name }))
        .collect();
    Json(json!({ "_embedded": { "productCategory": items } }))
}

async fn countries(recorded: Shared) -> Json<Value> {
    record(&recorded, "/countries", &HashMap::new());
    let items: Vec<Value> = COUNTRIES
        .iter()
        .map(|(id, code, name)| json!({ "id": id, "code": code, "name": name }))
        .collect();
    Json(paged("countries", &items, &HashMap::new()))
}

async fn states(
    recorded: Shared,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    record(&recorded, "/states/search/findByCountryCode", &query);
    let code = query.get("code").cloned().unwrap_or_default();
    let items: Vec<Value> = STATES
        .iter()
        .filter(|(_, country, _)| *country == code)
        .map(|(id, _, name)| json!({ "id": id, "name": name }))
        .collect();
    Json(paged("states", &items, &HashMap::new()))
}

async fn purchase(recorded: Shared, Json(body): Json<Value>) -> Json<Value> {
    let mut recorded = recorded.0.lock().unwrap();
    recorded.requests.push("/checkout/purchase".to_string());
    recorded.purchases.push(body);
    let tracking = format!("TRACK-{}", recorded.purchases.len());
    Json(json!({ "orderTrackingNumber": tracking }))
}

/// Storefront configuration pointing at `api_url`.
pub fn storefront_config(api_url: &Url) -> StorefrontConfig {
    let vars = HashMap::from([
        ("LUV2SHOP_API_URL", api_url.to_string()),
        ("OIDC_CLIENT_ID", "0oa-storefront".to_string()),
        (
            "OIDC_ISSUER",
            "https://id.example.com/oauth2/default".to_string(),
        ),
        (
            "OIDC_REDIRECT_URI",
            "http://localhost:4200/login/callback".to_string(),
        ),
    ]);
    StorefrontConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

/// Storefront router backed by `backend` with an in-memory cart store.
pub fn storefront_app(backend: &MockBackend) -> Router {
    let config = storefront_config(&backend.base_url);
    let state = AppState::with_store(&config, Box::new(MemoryStore::new())).unwrap();
    luv2shop_storefront::routes::app(state)
}

/// Send one request through the router and decode the JSON answer.
///
/// Non-JSON bodies decode to [`Value::Null`].
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
