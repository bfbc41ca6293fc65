use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::realtime::ObserverId;

#[derive(Error, Debug)]
pub enum TaskError {
    // Client errors (4xx)
    #[error("{message}")]
    Validation { message: String },

    #[error("Invalid task ID '{id}'")]
    InvalidIdentifier { id: String },

    #[error("Task '{id}' not found")]
    TaskNotFound { id: String },

    #[error("No tasks found for '{email}'")]
    NoTasksForEmail { email: String },

    #[error("User '{email}' already exists")]
    UserExists { email: String },

    // Infrastructure errors (5xx)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {message}")]
    Storage { message: String },
}

pub type Result<T> = std::result::Result<T, TaskError>;

impl TaskError {
    pub fn validation(message: impl Into<String>) -> Self {
        TaskError::Validation {
            message: message.into(),
        }
    }

    /// Get the error code for this error
    fn error_code(&self) -> &'static str {
        match self {
            TaskError::Validation { .. } => "VALIDATION_ERROR",
            TaskError::InvalidIdentifier { .. } => "INVALID_IDENTIFIER",
            TaskError::TaskNotFound { .. } => "TASK_NOT_FOUND",
            TaskError::NoTasksForEmail { .. } => "NO_TASKS_FOUND",
            TaskError::UserExists { .. } => "CONFLICT",
            TaskError::Database(_) => "DATABASE_ERROR",
            TaskError::Storage { .. } => "STORAGE_ERROR",
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            TaskError::Validation { .. } => StatusCode::BAD_REQUEST,
            TaskError::InvalidIdentifier { .. } => StatusCode::BAD_REQUEST,
            TaskError::TaskNotFound { .. } => StatusCode::NOT_FOUND,
            TaskError::NoTasksForEmail { .. } => StatusCode::NOT_FOUND,
            TaskError::UserExists { .. } => StatusCode::CONFLICT,
            TaskError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TaskError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        // For server errors, log the details but don't expose them
        let error_message = match &self {
            TaskError::Database(ref e) => {
                log::error!("Database error: {}", e);
                "Internal server error".to_string()
            }
            TaskError::Storage { ref message } => {
                log::error!("Storage error: {}", message);
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(ErrorResponse {
            error: error_message,
            code: error_code.to_string(),
        });

        (status, body).into_response()
    }
}

/// Failure to hand a snapshot to one observer. Logged, never returned to an HTTP caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Observer {observer_id} is no longer receiving snapshots")]
    ObserverClosed { observer_id: ObserverId },

    #[error("Observer {observer_id} is not registered")]
    UnknownObserver { observer_id: ObserverId },
}
