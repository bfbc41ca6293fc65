use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

use super::extract::JsonDocument;
use crate::errors::{ErrorResponse, Result};
use crate::models::api::{
    DeleteResult, InsertResult, TaskInput, TaskPatch, TasksQuery, UpdateResult,
};
use crate::models::domain::Task;
use crate::AppState;

/// List the tasks owned by an email address
#[utoipa::path(
    get,
    path = "/tasks",
    params(TasksQuery),
    responses(
        (status = 200, description = "Tasks owned by the email", body = [Task]),
        (status = 400, description = "Email is missing", body = ErrorResponse),
        (status = 404, description = "No tasks for this email", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<TasksQuery>,
) -> Result<Json<Vec<Task>>> {
    let tasks = state.service.tasks_for_owner(query.email.as_deref()).await?;
    Ok(Json(tasks))
}

/// Create a task
#[utoipa::path(
    post,
    path = "/tasks",
    request_body = TaskInput,
    responses(
        (status = 201, description = "Task created", body = InsertResult),
        (status = 400, description = "Missing required fields", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn create_task(
    State(state): State<AppState>,
    JsonDocument(doc): JsonDocument,
) -> Result<(StatusCode, Json<InsertResult>)> {
    let result = state.service.create_task(doc).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// Replace a task
#[utoipa::path(
    put,
    path = "/tasks/{id}",
    params(("id" = String, Path, description = "Task identifier")),
    request_body = TaskInput,
    responses(
        (status = 200, description = "Task replaced", body = UpdateResult),
        (status = 400, description = "Invalid identifier or fields", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn replace_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonDocument(doc): JsonDocument,
) -> Result<Json<UpdateResult>> {
    let result = state.service.replace_task(&id, doc).await?;
    Ok(Json(result))
}

/// Update some fields of a task
#[utoipa::path(
    patch,
    path = "/tasks/{id}",
    params(("id" = String, Path, description = "Task identifier")),
    request_body = TaskPatch,
    responses(
        (status = 200, description = "Task updated", body = UpdateResult),
        (status = 400, description = "Invalid identifier or fields", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonDocument(doc): JsonDocument,
) -> Result<Json<UpdateResult>> {
    let result = state.service.update_task(&id, doc).await?;
    Ok(Json(result))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    params(("id" = String, Path, description = "Task identifier")),
    responses(
        (status = 200, description = "Task deleted", body = DeleteResult),
        (status = 400, description = "Invalid identifier", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>> {
    let result = state.service.delete_task(&id).await?;
    Ok(Json(result))
}
