//! Address route handlers.
//!
//! Addresses are created through their owner (`/customers/{id}/addresses`,
//! `/warehouses/{id}/addresses`); these routes act on one address by id.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use bazaar_core::AddressId;

use crate::db::AddressRepository;
use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::models::{Address, UpdateAddressInput};
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<AddressId>,
) -> Result<Json<Address>> {
    AddressRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Address {id}")))
}

#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<AddressId>,
    ApiJson(input): ApiJson<UpdateAddressInput>,
) -> Result<Json<Address>> {
    input.validate()?;

    AddressRepository::new(state.pool())
        .update(id, &input)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Address {id}")))
}

#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<AddressId>,
) -> Result<StatusCode> {
    if !AddressRepository::new(state.pool()).delete(id).await? {
        return Err(AppError::NotFound(format!("Address {id}")));
    }
    tracing::info!(address_id = %id, "Address deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::{json_request, read_json, send};

    #[tokio::test]
    async fn test_update_rejects_bad_country_code() {
        let request = json_request("PUT", "/addresses/4", &json!({ "country_code": "USA" }));
        let (status, body) = read_json(send(request).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().is_some_and(|m| m.starts_with("country_code")));
    }
}
