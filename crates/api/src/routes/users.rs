//! User route handlers.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use bazaar_core::UserId;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::models::{CreateUserInput, Pagination, UpdateUserInput, User};
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateUserInput>,
) -> Result<(StatusCode, Json<User>)> {
    input.validate()?;

    let user = UserRepository::new(state.pool()).create(&input).await?;
    tracing::info!(user_id = %user.id, "User created");

    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<Vec<User>>> {
    let users = UserRepository::new(state.pool()).list(page).await?;
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
) -> Result<Json<User>> {
    UserRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("User {id}")))
}

#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
    ApiJson(input): ApiJson<UpdateUserInput>,
) -> Result<Json<User>> {
    input.validate()?;

    UserRepository::new(state.pool())
        .update(id, &input)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("User {id}")))
}

#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
) -> Result<StatusCode> {
    if !UserRepository::new(state.pool()).delete(id).await? {
        return Err(AppError::NotFound(format!("User {id}")));
    }
    tracing::info!(user_id = %id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::{json_request, read_json, send};

    #[tokio::test]
    async fn test_create_rejects_invalid_email() {
        let request = json_request(
            "POST",
            "/users",
            &json!({ "name": "Ada", "email": "ada.example.com" }),
        );
        let (status, body) = read_json(send(request).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().is_some_and(|m| m.contains("email")));
    }

    #[tokio::test]
    async fn test_update_rejects_blank_name() {
        let request = json_request("PUT", "/users/3", &json!({ "name": "" }));
        let (status, body) = read_json(send(request).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "name: cannot be blank");
    }
}
