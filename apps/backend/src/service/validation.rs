use serde_json::Value;
use uuid::Uuid;

use crate::errors::{Result, TaskError};
use crate::models::domain::Document;

pub const TASK_FIELDS: [&str; 4] = ["title", "description", "email", "status"];
pub const USER_FIELDS: [&str; 2] = ["email", "name"];

/// Keys that would collide with the store-assigned identifier
const IDENTIFIER_KEYS: [&str; 2] = ["id", "_id"];

/// Parse a task identifier taken from the request path
pub fn parse_task_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| TaskError::InvalidIdentifier {
        id: raw.to_string(),
    })
}

/// Remove any client-supplied identifier so it can never reach the store
pub fn strip_identifier(doc: &mut Document) {
    for key in IDENTIFIER_KEYS {
        doc.remove(key);
    }
}

/// Trim the owner email so stored values match the trimmed lookup key
pub fn trim_email(doc: &mut Document) {
    if let Some(Value::String(email)) = doc.get_mut("email") {
        let trimmed = email.trim();
        if trimmed.len() != email.len() {
            *email = trimmed.to_string();
        }
    }
}

fn is_non_empty_text(value: &Value) -> bool {
    value.as_str().is_some_and(|s| !s.trim().is_empty())
}

/// Every field in `fields` must be present as non-empty text
pub fn require_fields(doc: &Document, fields: &[&str]) -> Result<()> {
    let missing: Vec<&str> = fields
        .iter()
        .copied()
        .filter(|field| !doc.get(*field).is_some_and(is_non_empty_text))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(TaskError::validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/// Fields in `fields` may be absent, but if present they must be non-empty text
pub fn check_present_fields(doc: &Document, fields: &[&str]) -> Result<()> {
    let invalid: Vec<&str> = fields
        .iter()
        .copied()
        .filter(|field| doc.get(*field).is_some_and(|v| !is_non_empty_text(v)))
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(TaskError::validation(format!(
            "Fields must be non-empty text: {}",
            invalid.join(", ")
        )))
    }
}

/// Fetch a required text field that `require_fields` already checked
pub fn text_field<'a>(doc: &'a Document, field: &str) -> Result<&'a str> {
    doc.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| TaskError::validation(format!("Missing required fields: {}", field)))
}
