//! Warehouse route handlers.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use bazaar_core::{AddressableType, WarehouseId};

use crate::db::{AddressRepository, WarehouseRepository};
use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::models::{Address, AddressInput, Pagination, Warehouse, WarehouseInput};
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<WarehouseInput>,
) -> Result<(StatusCode, Json<Warehouse>)> {
    input.validate()?;

    let warehouse = WarehouseRepository::new(state.pool()).create(&input).await?;
    tracing::info!(warehouse_id = %warehouse.id, "Warehouse created");

    Ok((StatusCode::CREATED, Json(warehouse)))
}

#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<Vec<Warehouse>>> {
    let warehouses = WarehouseRepository::new(state.pool()).list(page).await?;
    Ok(Json(warehouses))
}

#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<WarehouseId>,
) -> Result<Json<Warehouse>> {
    WarehouseRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Warehouse {id}")))
}

#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<WarehouseId>,
    ApiJson(input): ApiJson<WarehouseInput>,
) -> Result<Json<Warehouse>> {
    input.validate()?;

    WarehouseRepository::new(state.pool())
        .update(id, &input)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Warehouse {id}")))
}

/// Delete a warehouse together with its addresses and stock rows.
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<WarehouseId>,
) -> Result<StatusCode> {
    if !WarehouseRepository::new(state.pool()).delete(id).await? {
        return Err(AppError::NotFound(format!("Warehouse {id}")));
    }
    tracing::info!(warehouse_id = %id, "Warehouse deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn add_address(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<WarehouseId>,
    ApiJson(input): ApiJson<AddressInput>,
) -> Result<(StatusCode, Json<Address>)> {
    input.validate()?;
    ensure_warehouse(&state, id).await?;

    let address = AddressRepository::new(state.pool())
        .create(AddressableType::Warehouse, id.as_i32(), &input)
        .await?;
    tracing::info!(warehouse_id = %id, address_id = %address.id, "Warehouse address added");

    Ok((StatusCode::CREATED, Json(address)))
}

#[instrument(skip(state))]
pub async fn addresses(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<WarehouseId>,
) -> Result<Json<Vec<Address>>> {
    ensure_warehouse(&state, id).await?;

    let addresses = AddressRepository::new(state.pool())
        .list_for_owner(AddressableType::Warehouse, id.as_i32())
        .await?;
    Ok(Json(addresses))
}

async fn ensure_warehouse(state: &AppState, id: WarehouseId) -> Result<()> {
    if WarehouseRepository::new(state.pool()).exists(id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("Warehouse {id}")))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::{json_request, read_json, send};

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let request = json_request("POST", "/warehouses", &json!({ "name": "" }));
        let (status, body) = read_json(send(request).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "name: cannot be blank");
    }

    #[tokio::test]
    async fn test_add_address_validates_before_lookup() {
        let request = json_request(
            "POST",
            "/warehouses/1/addresses",
            &json!({
                "line1": "1 Dock Road",
                "city": "Rotterdam",
                "postal_code": "",
                "country_code": "NL"
            }),
        );
        let (status, body) = read_json(send(request).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "postal_code: cannot be blank");
    }
}
