//! HTTP contract tests for the Bazaar API.
//!
//! # Running Tests
//!
//! ```bash
//! # Apply migrations and start the server
//! cargo run -p bazaar-cli -- migrate
//! cargo run -p bazaar-api
//!
//! # Run the ignored integration tests against it
//! cargo test -p bazaar-integration-tests -- --ignored
//! ```
//!
//! `BAZAAR_BASE_URL` overrides the server address (default
//! `http://localhost:3000`). Every test creates its own rows with unique
//! names, so runs do not depend on each other.

#![allow(clippy::missing_panics_doc)]

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("BAZAAR_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Build `{base_url}{path}`.
#[must_use]
pub fn url(path: &str) -> String {
    format!("{}{path}", base_url())
}

/// HTTP client for tests.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// Short random suffix for unique names and emails.
#[must_use]
pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// Read the `id` field of a JSON body.
#[must_use]
pub fn id_of(body: &Value) -> i64 {
    body["id"].as_i64().expect("response has an integer id")
}

/// POST JSON and return the created entity, asserting 201.
pub async fn create(client: &Client, path: &str, body: &Value) -> Value {
    let resp = client
        .post(url(path))
        .json(body)
        .send()
        .await
        .expect("Failed to send create request");
    assert_eq!(resp.status(), StatusCode::CREATED, "POST {path}");
    resp.json().await.expect("Failed to parse create response")
}

/// Create a product with a unique name.
pub async fn create_product(client: &Client, price: &str) -> Value {
    create(
        client,
        "/products",
        &json!({ "name": unique("product"), "price": price }),
    )
    .await
}

/// Create a warehouse with a unique name.
pub async fn create_warehouse(client: &Client) -> Value {
    create(client, "/warehouses", &json!({ "name": unique("warehouse") })).await
}

/// Create a customer with a unique email.
pub async fn create_customer(client: &Client) -> Value {
    create(
        client,
        "/customers",
        &json!({
            "name": "Test Customer",
            "email": format!("{}@example.com", unique("customer")),
        }),
    )
    .await
}
