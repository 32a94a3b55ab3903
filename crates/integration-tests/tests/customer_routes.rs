//! Contract tests for `/customers` and their cards, addresses and carts.
//!
//! These tests require a migrated database and a running API server.

#![allow(clippy::unwrap_used)]

use bazaar_integration_tests::{client, create, create_customer, create_product, id_of, url};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_customer_defaults_and_update() {
    let client = client();
    let customer = create_customer(&client).await;
    let id = id_of(&customer);
    assert_eq!(customer["balance"], "0.00");
    assert_eq!(customer["cart"], json!([]));

    let resp = client
        .put(url(&format!("/customers/{id}")))
        .json(&json!({ "name": "Renamed", "balance": "25.50" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = client
        .get(url(&format!("/customers/{id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["balance"], "25.50");
    assert_eq!(body["email"], customer["email"]);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_duplicate_email_conflicts() {
    let client = client();
    let customer = create_customer(&client).await;

    let resp = client
        .post(url("/customers"))
        .json(&json!({ "name": "Copy", "email": customer["email"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_add_credit_card_returns_id() {
    let client = client();
    let id = id_of(&create_customer(&client).await);

    let created = create(
        &client,
        &format!("/customers/{id}/credit-cards"),
        &json!({
            "cardholder_name": "Test Customer",
            "card_number": "4111-1111-1111-1111",
            "expiry_month": 12,
            "expiry_year": 2040
        }),
    )
    .await;
    let card_id = id_of(&created);

    let cards: Vec<Value> = client
        .get(url(&format!("/customers/{id}/credit-cards")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(id_of(&cards[0]), card_id);
    assert_eq!(cards[0]["brand"], "visa");
    assert_eq!(cards[0]["last_four"], "1111");
    assert!(cards[0].get("card_number").is_none());

    let resp = client
        .delete(url(&format!("/customers/{id}/credit-cards/{card_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_add_address_links_customer() {
    let client = client();
    let id = id_of(&create_customer(&client).await);

    let address = create(
        &client,
        &format!("/customers/{id}/addresses"),
        &json!({
            "line1": "221B Baker Street",
            "city": "London",
            "postal_code": "NW1 6XE",
            "country_code": "gb"
        }),
    )
    .await;
    assert_eq!(address["addressable_id"], id);
    assert_eq!(address["addressable_type"], "customer");
    assert_eq!(address["country_code"], "GB");

    let addresses: Vec<Value> = client
        .get(url(&format!("/customers/{id}/addresses")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(addresses.len(), 1);

    // Deleting the customer removes its addresses
    let resp = client.delete(url(&format!("/customers/{id}"))).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(url(&format!("/addresses/{}", id_of(&address))))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_cart_appends_and_persists() {
    let client = client();
    let id = id_of(&create_customer(&client).await);
    let product = id_of(&create_product(&client, "4.00").await);

    for quantity in [2, 3] {
        let resp = client
            .post(url(&format!("/customers/{id}/cart")))
            .json(&json!({ "product_id": product, "quantity": quantity }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let cart: Value = client
        .get(url(&format!("/customers/{id}/cart")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        cart,
        json!([
            { "product_id": product, "quantity": 2 },
            { "product_id": product, "quantity": 3 }
        ])
    );

    // Deleting the product strips it from the cart
    client.delete(url(&format!("/products/{product}"))).send().await.unwrap();
    let cart: Value = client
        .get(url(&format!("/customers/{id}/cart")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart, json!([]));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_cart_rejects_unknown_product() {
    let client = client();
    let id = id_of(&create_customer(&client).await);

    let resp = client
        .post(url(&format!("/customers/{id}/cart")))
        .json(&json!({ "product_id": i32::MAX, "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_cart_for_missing_customer_is_not_found() {
    let client = client();

    // Unknown customer wins over unknown product
    let resp = client
        .post(url(&format!("/customers/{}/cart", i32::MAX)))
        .json(&json!({ "product_id": i32::MAX, "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_clear_cart() {
    let client = client();
    let id = id_of(&create_customer(&client).await);
    let product = id_of(&create_product(&client, "0.00").await);

    let resp = client
        .post(url(&format!("/customers/{id}/cart")))
        .json(&json!({ "product_id": product, "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .delete(url(&format!("/customers/{id}/cart")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let cart: Value = client
        .get(url(&format!("/customers/{id}/cart")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart, json!([]));

    let resp = client
        .delete(url(&format!("/customers/{}/cart", i32::MAX)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_credit_card_delete_is_scoped_to_owner() {
    let client = client();
    let owner = id_of(&create_customer(&client).await);
    let other = id_of(&create_customer(&client).await);

    let card_id = id_of(
        &create(
            &client,
            &format!("/customers/{owner}/credit-cards"),
            &json!({
                "cardholder_name": "Test Customer",
                "card_number": "5555 5555 5555 4444",
                "expiry_month": 1,
                "expiry_year": 2040
            }),
        )
        .await,
    );

    let resp = client
        .delete(url(&format!("/customers/{other}/credit-cards/{card_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let cards: Vec<Value> = client
        .get(url(&format!("/customers/{owner}/credit-cards")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(id_of(&cards[0]), card_id);
}
