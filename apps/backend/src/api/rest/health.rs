use crate::models::ApiResponse;
use axum::response::Json;

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Health check response", body = ApiResponse)
    ),
    tag = "api"
)]
pub async fn health_check() -> Json<ApiResponse> {
    Json(ApiResponse {
        message: "Task Management server is running".to_string(),
        status: "OK".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().timestamp().max(0) as u64,
    })
}
