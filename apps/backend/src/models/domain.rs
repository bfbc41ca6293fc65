use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

/// Loose JSON document as received from a client or stored in the task store
pub type Document = Map<String, Value>;

// ============================================================================
// DOMAIN TYPES
// ============================================================================

/// A task record. Fields beyond the four required ones are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub email: String,
    pub status: String,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Document,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Document,
}

/// Every task in the store at one instant, tagged with the publish sequence that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub sequence: u64,
    pub tasks: Vec<Task>,
}

impl Snapshot {
    pub fn new(sequence: u64, tasks: Vec<Task>) -> Self {
        Self { sequence, tasks }
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.tasks.iter().any(|task| &task.id == id)
    }
}

/// Outcome of an update as reported by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// How an update payload is applied to the stored document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// The payload becomes the whole document
    Replace,
    /// The payload is merged key by key into the stored document
    Merge,
}

/// Merge `fields` into `doc` the same way the store does for `UpdateMode::Merge`
pub fn merge_document(doc: &mut Document, fields: Document) {
    for (key, value) in fields {
        doc.insert(key, value);
    }
}
