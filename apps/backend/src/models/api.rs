use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::domain::{Snapshot, Task};

// ============================================================================
// REST API TYPES
// ============================================================================

/// Health payload served at `/`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse {
    pub message: String,
    pub status: String,
    pub version: String,
    pub timestamp: u64,
}

/// Query string of `GET /tasks`
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TasksQuery {
    /// Owner email to filter by (required)
    pub email: Option<String>,
}

/// Response after a successful insert
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InsertResult {
    pub acknowledged: bool,
    pub inserted_id: Uuid,
}

/// Response after a successful replace or partial update
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Response after a successful delete
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteResult {
    pub message: String,
}

/// Task payload for create and replace (extra fields are accepted and stored)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskInput {
    pub title: String,
    pub description: String,
    pub email: String,
    pub status: String,
}

/// Partial task payload for `PATCH` (extra fields are accepted and merged)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
}

/// User payload for `POST /user` (extra fields are accepted and stored)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserInput {
    pub email: String,
    pub name: String,
}

// ============================================================================
// WEBSOCKET MESSAGE TYPES
// ============================================================================

/// Messages accepted from WebSocket clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Ping,
}

/// Messages sent to WebSocket clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The full task collection; the only event used for snapshot pushes
    TaskUpdated { sequence: u64, tasks: Vec<Task> },
    Pong,
}

impl From<&Snapshot> for ServerMessage {
    fn from(snapshot: &Snapshot) -> Self {
        ServerMessage::TaskUpdated {
            sequence: snapshot.sequence,
            tasks: snapshot.tasks.clone(),
        }
    }
}
