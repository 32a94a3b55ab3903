//! Product route handlers.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use bazaar_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::models::{CreateProductInput, Pagination, Product, UpdateProductInput};
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateProductInput>,
) -> Result<(StatusCode, Json<Product>)> {
    input.validate()?;

    let product = ProductRepository::new(state.pool()).create(&input).await?;
    tracing::info!(product_id = %product.id, "Product created");

    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list(page).await?;
    Ok(Json(products))
}

#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<Product>> {
    ProductRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Product {id}")))
}

#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
    ApiJson(input): ApiJson<UpdateProductInput>,
) -> Result<Json<Product>> {
    input.validate()?;

    ProductRepository::new(state.pool())
        .update(id, &input)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Product {id}")))
}

/// Delete a product. Its stock rows and cart lines go with it.
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<StatusCode> {
    if !ProductRepository::new(state.pool()).delete(id).await? {
        return Err(AppError::NotFound(format!("Product {id}")));
    }
    tracing::info!(product_id = %id, "Product deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::{json_request, read_json, send};

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let request = json_request("POST", "/products", &json!({ "name": "  ", "price": "4.50" }));
        let (status, body) = read_json(send(request).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "name: cannot be blank");
    }

    #[tokio::test]
    async fn test_create_rejects_negative_price() {
        let request = json_request(
            "POST",
            "/products",
            &json!({ "name": "Mug", "price": "-1.00" }),
        );
        let (status, body) = read_json(send(request).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "price: cannot be negative");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/products")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{\"name\": "))
            .expect("request");
        let (status, body) = read_json(send(request).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}
