//! Contract tests for users, products, warehouses and addresses.
//!
//! These tests require a migrated database and a running API server.

#![allow(clippy::unwrap_used)]

use bazaar_integration_tests::{
    client, create, create_product, create_warehouse, id_of, unique, url,
};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_health_endpoints() {
    let client = client();

    let resp = client.get(url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));

    let resp = client.get(url("/health/ready")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_user_crud() {
    let client = client();
    let email = format!("{}@Example.COM", unique("user"));

    let user = create(&client, "/users", &json!({ "name": "Grace", "email": email })).await;
    let id = id_of(&user);
    assert!(user["email"].as_str().unwrap().ends_with("@example.com"));

    let resp = client
        .put(url(&format!("/users/{id}")))
        .json(&json!({ "profile_picture": "https://cdn.example.com/grace.png" }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["profile_picture"], "https://cdn.example.com/grace.png");
    assert_eq!(body["name"], "Grace");

    let resp = client.delete(url(&format!("/users/{id}"))).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let resp = client.get(url(&format!("/users/{id}"))).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_product_update_and_list() {
    let client = client();
    let product = create_product(&client, "10.00").await;
    let id = id_of(&product);
    assert_eq!(product["price"], "10.00");

    let resp = client
        .put(url(&format!("/products/{id}")))
        .json(&json!({ "price": "8.75", "description": "On sale" }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["price"], "8.75");
    assert_eq!(body["name"], product["name"]);

    let page: Vec<Value> = client
        .get(url("/products?limit=1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_warehouse_addresses() {
    let client = client();
    let warehouse = create_warehouse(&client).await;
    let id = id_of(&warehouse);

    let address = create(
        &client,
        &format!("/warehouses/{id}/addresses"),
        &json!({
            "line1": "1 Dock Road",
            "city": "Rotterdam",
            "postal_code": "3011 AA",
            "country_code": "NL"
        }),
    )
    .await;
    assert_eq!(address["addressable_type"], "warehouse");

    let resp = client
        .put(url(&format!("/addresses/{}", id_of(&address))))
        .json(&json!({ "city": "Schiedam" }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["city"], "Schiedam");
    assert_eq!(body["line1"], "1 Dock Road");

    // Duplicate names conflict
    let resp = client
        .post(url("/warehouses"))
        .json(&json!({ "name": warehouse["name"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_missing_owner_is_not_found() {
    let client = client();

    let resp = client
        .get(url(&format!("/warehouses/{}/addresses", i32::MAX)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_zero_price_has_two_decimal_places() {
    let client = client();
    let product = create_product(&client, "0").await;
    assert_eq!(product["price"], "0.00");

    let body: Value = client
        .get(url(&format!("/products/{}", id_of(&product))))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["price"], "0.00");
}
