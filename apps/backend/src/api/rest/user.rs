use axum::{extract::State, http::StatusCode, response::Json};

use super::extract::JsonDocument;
use crate::errors::{ErrorResponse, Result};
use crate::models::api::{InsertResult, UserInput};
use crate::AppState;

/// Register a user (one per email)
#[utoipa::path(
    post,
    path = "/user",
    request_body = UserInput,
    responses(
        (status = 201, description = "User created", body = InsertResult),
        (status = 400, description = "Missing email or name", body = ErrorResponse),
        (status = 409, description = "User already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "user"
)]
pub async fn create_user(
    State(state): State<AppState>,
    JsonDocument(doc): JsonDocument,
) -> Result<(StatusCode, Json<InsertResult>)> {
    let result = state.service.create_user(doc).await?;
    Ok((StatusCode::CREATED, Json(result)))
}
