use axum::{
    routing::{get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::errors::ErrorResponse;
use crate::models::api::{
    DeleteResult, InsertResult, TaskInput, TaskPatch, UpdateResult, UserInput,
};
use crate::models::domain::Task;
use crate::models::ApiResponse;
use crate::AppState;

mod extract;
pub mod health;
pub mod tasks;
pub mod user;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Task Management API",
        version = "0.1.0",
        description = "Task CRUD with live snapshots over WebSocket at /ws"
    ),
    paths(
        health::health_check,
        tasks::list_tasks,
        tasks::create_task,
        tasks::replace_task,
        tasks::update_task,
        tasks::delete_task,
        user::create_user,
    ),
    components(
        schemas(
            ApiResponse,
            Task,
            TaskInput,
            TaskPatch,
            UserInput,
            InsertResult,
            UpdateResult,
            DeleteResult,
            ErrorResponse
        )
    ),
    tags(
        (name = "api", description = "General API endpoints"),
        (name = "tasks", description = "Task records"),
        (name = "user", description = "User records")
    )
)]
pub struct ApiDoc;

// request -> handler -> service (validate, store) -> response
//                               \-> background publish -> /ws observers
pub fn create_rest() -> Router<AppState> {
    Router::new()
        .route("/", get(health::health_check))
        .route("/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/tasks/{id}",
            put(tasks::replace_task)
                .patch(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/user", post(user::create_user))
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
}
