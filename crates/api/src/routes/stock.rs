//! Stock route handlers.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use bazaar_core::{ProductId, StockId, WarehouseId};

use crate::db::StockRepository;
use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::models::{CreateStockInput, Pagination, Stock, UpdateStockInput};
use crate::state::AppState;

/// Add a stock row for a product in a warehouse.
#[instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateStockInput>,
) -> Result<(StatusCode, Json<Stock>)> {
    input.validate()?;

    let stock = StockRepository::new(state.pool()).create(&input).await?;
    tracing::info!(stock_id = %stock.id, "Stock row created");

    Ok((StatusCode::CREATED, Json(stock)))
}

/// List all stock rows.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<Vec<Stock>>> {
    let rows = StockRepository::new(state.pool()).list(page).await?;
    Ok(Json(rows))
}

/// Stock row detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<StockId>,
) -> Result<Json<Stock>> {
    StockRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Stock {id}")))
}

/// Stock rows held for a product.
#[instrument(skip(state))]
pub async fn by_product(
    State(state): State<AppState>,
    ApiPath(product_id): ApiPath<ProductId>,
) -> Result<Json<Vec<Stock>>> {
    let rows = StockRepository::new(state.pool())
        .list_by_product(product_id)
        .await?;
    Ok(Json(rows))
}

/// Stock rows held in a warehouse.
#[instrument(skip(state))]
pub async fn by_warehouse(
    State(state): State<AppState>,
    ApiPath(warehouse_id): ApiPath<WarehouseId>,
) -> Result<Json<Vec<Stock>>> {
    let rows = StockRepository::new(state.pool())
        .list_by_warehouse(warehouse_id)
        .await?;
    Ok(Json(rows))
}

/// Update a stock row's quantity.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<StockId>,
    ApiJson(input): ApiJson<UpdateStockInput>,
) -> Result<Json<Stock>> {
    input.validate()?;

    let stock = StockRepository::new(state.pool())
        .update_quantity(id, input.quantity)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Stock {id}")))?;
    tracing::info!(stock_id = %id, quantity = stock.quantity, "Stock quantity updated");

    Ok(Json(stock))
}

/// Delete a stock row.
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<StockId>,
) -> Result<StatusCode> {
    if !StockRepository::new(state.pool()).delete(id).await? {
        return Err(AppError::NotFound(format!("Stock {id}")));
    }
    tracing::info!(stock_id = %id, "Stock row deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::{empty_request, json_request, read_json, send};

    #[tokio::test]
    async fn test_create_rejects_negative_quantity() {
        let request = json_request(
            "POST",
            "/stock",
            &json!({ "product_id": 1, "warehouse_id": 2, "quantity": -1 }),
        );
        let (status, body) = read_json(send(request).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "quantity: cannot be negative");
    }

    #[tokio::test]
    async fn test_create_rejects_missing_fields() {
        let request = json_request("POST", "/stock", &json!({ "product_id": 1 }));
        let (status, body) = read_json(send(request).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().is_some_and(|m| m.contains("warehouse_id")));
    }

    #[tokio::test]
    async fn test_update_rejects_negative_quantity() {
        let request = json_request("PUT", "/stock/7", &json!({ "quantity": -5 }));
        let (status, _) = read_json(send(request).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_integer_ids_are_rejected() {
        for uri in ["/stock/abc", "/stock/product/abc", "/stock/warehouse/1x"] {
            let (status, _) = read_json(send(empty_request("GET", uri)).await).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_patch_is_not_allowed() {
        let request = json_request("PATCH", "/stock/1", &json!({ "quantity": 1 }));
        let response = send(request).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
