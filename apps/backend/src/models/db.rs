use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use super::domain::{Document, Task, User};
use crate::errors::TaskError;

// ============================================================================
// DATABASE ROW TYPES
// ============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct TaskRow {
    pub id: Uuid,
    pub doc: Json<Document>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub extra: Json<Document>,
    pub created_at: DateTime<Utc>,
}

/// Rebuild a task from its stored document and row id
pub fn task_from_document(id: Uuid, mut doc: Document) -> Result<Task, TaskError> {
    doc.insert("id".to_string(), Value::String(id.to_string()));
    serde_json::from_value(Value::Object(doc)).map_err(|e| TaskError::Storage {
        message: format!("Stored task {} is malformed: {}", id, e),
    })
}

impl TryFrom<TaskRow> for Task {
    type Error = TaskError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        task_from_document(row.id, row.doc.0)
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            name: row.name,
            extra: row.extra.0,
        }
    }
}
