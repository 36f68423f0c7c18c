//! Integration tests for the storefront HTTP surface.
//!
//! The router runs in-process against a mock luv2shop backend with an
//! in-memory cart store.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use luv2shop_core::{Price, ProductId};
use luv2shop_integration_tests::{MockBackend, send, storefront_app};
use luv2shop_storefront::routes::cart::CartView;
use serde_json::{Value, json};
use tower::ServiceExt;

fn cart_view(body: Value) -> CartView {
    serde_json::from_value(body).unwrap()
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_catalog_routes() {
    let backend = MockBackend::spawn().await;
    let app = storefront_app(&backend);

    let (status, body) = send(&app, Method::GET, "/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, body) = send(&app, Method::GET, "/products?category=1&page=2&size=4", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["page"]["number"], 1);
    assert_eq!(body["page"]["totalPages"], 2);

    let (status, body) = send(&app, Method::GET, "/products/search?keyword=mug", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["name"], "Coffee Mug - Express");

    let (status, body) = send(&app, Method::GET, "/products/7", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unitPrice"], 18.99);
}

#[tokio::test]
async fn test_products_default_to_first_category_and_page() {
    let backend = MockBackend::spawn().await;
    let app = storefront_app(&backend);

    let (status, body) = send(&app, Method::GET, "/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 5);
    assert_eq!(
        backend.requests(),
        vec!["/products/search/findByCategoryId?id=1&page=0&size=5".to_string()]
    );
}

#[tokio::test]
async fn test_catalog_errors() {
    let backend = MockBackend::spawn().await;
    let app = storefront_app(&backend);

    let (status, _) = send(&app, Method::GET, "/products/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::GET, "/products?page=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad request: page starts at 1");
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_add_same_product_twice() {
    let backend = MockBackend::spawn().await;
    let app = storefront_app(&backend);

    let add = json!({ "productId": 8 });
    send(&app, Method::POST, "/cart/items", Some(add.clone())).await;
    let (status, body) = send(&app, Method::POST, "/cart/items", Some(add)).await;
    assert_eq!(status, StatusCode::OK);

    let cart = cart_view(body);
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 2);
    assert_eq!(cart.total_price, Price::from_cents(2000));
    assert_eq!(cart.total_quantity, 2);

    let (_, body) = send(&app, Method::GET, "/cart", None).await;
    assert_eq!(cart_view(body), cart);
}

#[tokio::test]
async fn test_decrement_and_remove() {
    let backend = MockBackend::spawn().await;
    let app = storefront_app(&backend);

    send(&app, Method::POST, "/cart/items", Some(json!({ "productId": 8 }))).await;
    send(&app, Method::POST, "/cart/items", Some(json!({ "productId": 1 }))).await;

    let (_, body) = send(&app, Method::POST, "/cart/items/8/decrement", None).await;
    let cart = cart_view(body);
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].id, ProductId::new(1));
    assert_eq!(cart.total_price, Price::from_cents(1499));

    // Unknown ids change nothing.
    let (status, body) = send(&app, Method::DELETE, "/cart/items/42", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart_view(body), cart);

    let (_, body) = send(&app, Method::DELETE, "/cart/items/1", None).await;
    let cart = cart_view(body);
    assert!(cart.items.is_empty());
    assert_eq!(cart.total_quantity, 0);
}

#[tokio::test]
async fn test_add_unknown_product_is_not_found() {
    let backend = MockBackend::spawn().await;
    let app = storefront_app(&backend);

    let (status, _) = send(&app, Method::POST, "/cart/items", Some(json!({ "productId": 999 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, Method::GET, "/cart", None).await;
    assert!(cart_view(body).items.is_empty());
}

#[tokio::test]
async fn test_totals_stream_replays_latest_value() {
    let backend = MockBackend::spawn().await;
    let app = storefront_app(&backend);
    send(&app, Method::POST, "/cart/items", Some(json!({ "productId": 7 }))).await;

    let request = Request::builder()
        .uri("/cart/totals/stream")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "text/event-stream"
    );

    let mut body = response.into_body();
    let frame = body.frame().await.unwrap().unwrap();
    let text = String::from_utf8(frame.into_data().unwrap().to_vec()).unwrap();
    assert!(text.contains("event: totals"), "{text}");
    assert!(text.contains(r#""totalQuantity":1"#), "{text}");
}

// ============================================================================
// Checkout
// ============================================================================

fn filled_form() -> Value {
    json!({
        "customer": {
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com"
        },
        "shippingAddress": {
            "street": "1 Main",
            "city": "Montgomery",
            "country": "US",
            "zipCode": "36104"
        },
        "creditCard": {
            "cardType": "Visa",
            "nameOnCard": "Ada Lovelace",
            "cardNumber": "4111111111111111",
            "securityCode": "123",
            "expirationMonth": "1"
        }
    })
}

#[tokio::test]
async fn test_checkout_view_is_initialized() {
    let backend = MockBackend::spawn().await;
    let app = storefront_app(&backend);

    let (status, view) = send(&app, Method::GET, "/checkout", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["countries"].as_array().unwrap().len(), 3);
    assert_eq!(view["creditCardYears"].as_array().unwrap().len(), 11);
    assert!(!view["creditCardMonths"].as_array().unwrap().is_empty());
    assert_eq!(view["valid"], false);
    assert_eq!(view["errors"], json!({}));
    assert_eq!(view["totalQuantity"], 0);
}

#[tokio::test]
async fn test_submit_empty_form_is_unprocessable() {
    let backend = MockBackend::spawn().await;
    let app = storefront_app(&backend);

    let (status, body) = send(&app, Method::POST, "/checkout/submit", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["customer.firstName"], json!(["required"]));
    assert_eq!(body["errors"]["creditCard.cardNumber"], json!(["required"]));
    assert!(body["errors"].get("creditCard.expirationYear").is_none());
    assert!(backend.purchases().is_empty());

    // Every control is touched now, so the view shows the same errors.
    let (_, view) = send(&app, Method::GET, "/checkout", None).await;
    assert_eq!(view["errors"], body["errors"]);
}

#[tokio::test]
async fn test_form_update_reports_touched_errors() {
    let backend = MockBackend::spawn().await;
    let app = storefront_app(&backend);

    let update = json!({ "customer": { "firstName": " ", "email": "Ada@Example" } });
    let (status, view) = send(&app, Method::PUT, "/checkout/form", Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        view["errors"],
        json!({
            "customer.email": ["pattern"],
            "customer.firstName": ["minlength", "notOnlyWhitespace"],
        })
    );
}

#[tokio::test]
async fn test_expiration_year_must_be_offered() {
    let backend = MockBackend::spawn().await;
    let app = storefront_app(&backend);

    let (status, _) = send(
        &app,
        Method::POST,
        "/checkout/expiration-year",
        Some(json!({ "year": 1999 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_full_checkout() {
    let backend = MockBackend::spawn().await;
    let app = storefront_app(&backend);

    let add = json!({ "productId": 8 });
    send(&app, Method::POST, "/cart/items", Some(add.clone())).await;
    send(&app, Method::POST, "/cart/items", Some(add)).await;

    let (_, view) = send(&app, Method::GET, "/checkout", None).await;
    assert_eq!(view["totalQuantity"], 2);
    let next_year = view["creditCardYears"][1].as_i64().unwrap();

    send(&app, Method::PUT, "/checkout/form", Some(filled_form())).await;

    let (_, view) = send(
        &app,
        Method::POST,
        "/checkout/country",
        Some(json!({ "section": "shipping" })),
    )
    .await;
    assert_eq!(view["shippingAddressStates"][0]["name"], "Alabama");
    assert_eq!(view["form"]["shippingAddress"]["state"], "Alabama");
    assert_eq!(view["billingAddressStates"], json!([]));

    let (_, view) = send(
        &app,
        Method::POST,
        "/checkout/billing-same-as-shipping",
        Some(json!({ "enabled": true })),
    )
    .await;
    assert_eq!(view["billingSameAsShipping"], true);
    assert_eq!(view["form"]["billingAddress"], view["form"]["shippingAddress"]);
    assert_eq!(view["billingAddressStates"], view["shippingAddressStates"]);

    let (_, view) = send(
        &app,
        Method::POST,
        "/checkout/expiration-year",
        Some(json!({ "year": next_year })),
    )
    .await;
    assert_eq!(view["creditCardMonths"].as_array().unwrap().len(), 12);
    assert_eq!(view["valid"], true);

    let (status, body) = send(&app, Method::POST, "/checkout/submit", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orderTrackingNumber"], "TRACK-1");

    let purchases = backend.purchases();
    assert_eq!(purchases.len(), 1);
    let purchase = &purchases[0];
    assert_eq!(purchase["order"]["totalQuantity"], 2);
    assert_eq!(purchase["order"]["totalPrice"], 20.0);
    assert_eq!(purchase["orderItems"][0]["productId"], 8);
    assert_eq!(purchase["orderItems"][0]["quantity"], 2);
    assert_eq!(purchase["shippingAddress"]["country"], "United States");
    assert_eq!(purchase["shippingAddress"]["state"], "Alabama");
    assert_eq!(purchase["billingAddress"]["city"], "Montgomery");
    assert_eq!(purchase["customer"]["email"], "ada@example.com");

    // The form starts over; the cart is left as it was.
    let (_, view) = send(&app, Method::GET, "/checkout", None).await;
    assert_eq!(view["form"]["customer"]["firstName"], Value::Null);
    assert_eq!(view["billingSameAsShipping"], false);
    assert_eq!(view["totalQuantity"], 2);
}

// ============================================================================
// Server
// ============================================================================

#[tokio::test]
async fn test_served_over_tcp() {
    let backend = MockBackend::spawn().await;
    let app = storefront_app(&backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::new();
    let health = client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(health.status(), reqwest::StatusCode::OK);
    assert_eq!(health.text().await.unwrap(), "ok");

    let oidc: Value = client
        .get(format!("http://{addr}/auth/config"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(oidc["clientId"], "0oa-storefront");
    assert_eq!(oidc["scopes"], json!(["openid", "profile", "email"]));
}
