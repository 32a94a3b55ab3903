//! Customer route handlers, including credit cards, addresses and the cart.

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde::Serialize;
use tracing::instrument;

use bazaar_core::{AddressableType, CreditCardId, UserId};

use crate::db::{AddressRepository, CreditCardRepository, CustomerRepository};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::models::{
    Address, AddressInput, CartItem, CreateCreditCardInput, CreateCustomerInput, CreditCard,
    Customer, Pagination, UpdateCustomerInput,
};
use crate::state::AppState;

/// Response body for a newly stored credit card.
#[derive(Debug, Serialize)]
pub struct CreatedCard {
    pub id: CreditCardId,
}

// =============================================================================
// Customer CRUD
// =============================================================================

#[instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateCustomerInput>,
) -> Result<(StatusCode, Json<Customer>)> {
    input.validate()?;

    let customer = CustomerRepository::new(state.pool()).create(&input).await?;
    tracing::info!(customer_id = %customer.user.id, "Customer created");

    Ok((StatusCode::CREATED, Json(customer)))
}

#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<Vec<Customer>>> {
    let customers = CustomerRepository::new(state.pool()).list(page).await?;
    Ok(Json(customers))
}

#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
) -> Result<Json<Customer>> {
    CustomerRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
    ApiJson(input): ApiJson<UpdateCustomerInput>,
) -> Result<Json<Customer>> {
    input.validate()?;

    CustomerRepository::new(state.pool())
        .update(id, &input)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
) -> Result<StatusCode> {
    if !CustomerRepository::new(state.pool()).delete(id).await? {
        return Err(not_found(id));
    }
    tracing::info!(customer_id = %id, "Customer deleted");

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Credit Cards
// =============================================================================

/// Store a credit card for the customer and return its id.
#[instrument(skip(state))]
pub async fn add_credit_card(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
    ApiJson(input): ApiJson<CreateCreditCardInput>,
) -> Result<(StatusCode, Json<CreatedCard>)> {
    input.validate(Utc::now().date_naive())?;
    ensure_customer(&state, id).await?;

    let card_id = CreditCardRepository::new(state.pool())
        .create(id, &input)
        .await?;
    tracing::info!(
        customer_id = %id,
        card_id = %card_id,
        brand = input.card_number.brand().as_str(),
        "Credit card added"
    );

    Ok((StatusCode::CREATED, Json(CreatedCard { id: card_id })))
}

#[instrument(skip(state))]
pub async fn credit_cards(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
) -> Result<Json<Vec<CreditCard>>> {
    ensure_customer(&state, id).await?;

    let cards = CreditCardRepository::new(state.pool())
        .list_for_customer(id)
        .await?;
    Ok(Json(cards))
}

#[instrument(skip(state))]
pub async fn remove_credit_card(
    State(state): State<AppState>,
    ApiPath((id, card_id)): ApiPath<(UserId, CreditCardId)>,
) -> Result<StatusCode> {
    if !CreditCardRepository::new(state.pool())
        .delete(id, card_id)
        .await?
    {
        return Err(AppError::NotFound(format!("Credit card {card_id}")));
    }
    tracing::info!(customer_id = %id, card_id = %card_id, "Credit card removed");

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Addresses
// =============================================================================

#[instrument(skip(state))]
pub async fn add_address(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
    ApiJson(input): ApiJson<AddressInput>,
) -> Result<(StatusCode, Json<Address>)> {
    input.validate()?;
    ensure_customer(&state, id).await?;

    let address = AddressRepository::new(state.pool())
        .create(AddressableType::Customer, id.as_i32(), &input)
        .await?;
    tracing::info!(customer_id = %id, address_id = %address.id, "Customer address added");

    Ok((StatusCode::CREATED, Json(address)))
}

#[instrument(skip(state))]
pub async fn addresses(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
) -> Result<Json<Vec<Address>>> {
    ensure_customer(&state, id).await?;

    let addresses = AddressRepository::new(state.pool())
        .list_for_owner(AddressableType::Customer, id.as_i32())
        .await?;
    Ok(Json(addresses))
}

// =============================================================================
// Cart
// =============================================================================

#[instrument(skip(state))]
pub async fn cart(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
) -> Result<Json<Vec<CartItem>>> {
    CustomerRepository::new(state.pool())
        .get_cart(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// Append a line to the cart and return the whole cart.
#[instrument(skip(state))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
    ApiJson(item): ApiJson<CartItem>,
) -> Result<Json<Vec<CartItem>>> {
    item.validate()?;

    let cart = CustomerRepository::new(state.pool())
        .add_to_cart(id, item)
        .await?
        .ok_or_else(|| not_found(id))?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        &[
            ("customer_id", id.to_string()),
            ("product_id", item.product_id.to_string()),
            ("quantity", item.quantity.to_string()),
        ],
    );
    tracing::info!(customer_id = %id, lines = cart.len(), "Cart updated");

    Ok(Json(cart))
}

#[instrument(skip(state))]
pub async fn clear_cart(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
) -> Result<StatusCode> {
    if !CustomerRepository::new(state.pool()).clear_cart(id).await? {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Helpers
// =============================================================================

fn not_found(id: UserId) -> AppError {
    AppError::NotFound(format!("Customer {id}"))
}

async fn ensure_customer(state: &AppState, id: UserId) -> Result<()> {
    if CustomerRepository::new(state.pool()).exists(id).await? {
        Ok(())
    } else {
        Err(not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::{empty_request, json_request, read_json, send};

    #[tokio::test]
    async fn test_create_rejects_negative_balance() {
        let request = json_request(
            "POST",
            "/customers",
            &json!({ "name": "Ada", "email": "ada@example.com", "balance": "-0.01" }),
        );
        let (status, body) = read_json(send(request).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "balance: cannot be negative");
    }

    #[tokio::test]
    async fn test_add_to_cart_rejects_zero_quantity() {
        let request = json_request(
            "POST",
            "/customers/1/cart",
            &json!({ "product_id": 4, "quantity": 0 }),
        );
        let (status, body) = read_json(send(request).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().is_some_and(|m| m.starts_with("quantity")));
    }

    #[tokio::test]
    async fn test_add_credit_card_rejects_bad_number() {
        let request = json_request(
            "POST",
            "/customers/1/credit-cards",
            &json!({
                "cardholder_name": "Ada Lovelace",
                "card_number": "4242 4242 4242 4241",
                "expiry_month": 12,
                "expiry_year": 2099
            }),
        );
        let (status, body) = read_json(send(request).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().is_some_and(|m| !m.contains("4241")));
    }

    #[tokio::test]
    async fn test_add_credit_card_rejects_bad_month() {
        let request = json_request(
            "POST",
            "/customers/1/credit-cards",
            &json!({
                "cardholder_name": "Ada Lovelace",
                "card_number": "4242 4242 4242 4242",
                "expiry_month": 13,
                "expiry_year": 2030
            }),
        );
        let (status, body) = read_json(send(request).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "expiry_month: must be between 1 and 12");
    }

    #[tokio::test]
    async fn test_credit_card_path_requires_integer_ids() {
        let request = empty_request("DELETE", "/customers/1/credit-cards/visa");
        let (status, _) = read_json(send(request).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
