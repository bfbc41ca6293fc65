// Mutation handling: validate -> store -> publish
// Every successful task mutation dispatches exactly one background publish
// before returning. Failed mutations publish nothing.

pub mod validation;

use std::sync::Arc;

use crate::db::TaskStore;
use crate::errors::{Result, TaskError};
use crate::models::api::{DeleteResult, InsertResult, UpdateResult};
use crate::models::domain::{Document, Task, UpdateMode};
use crate::realtime::SnapshotPublisher;
use validation::{
    check_present_fields, parse_task_id, require_fields, strip_identifier, text_field,
    trim_email, TASK_FIELDS, USER_FIELDS,
};

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    publisher: Arc<SnapshotPublisher>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>, publisher: Arc<SnapshotPublisher>) -> Self {
        Self { store, publisher }
    }

    /// Tasks owned by `email`
    pub async fn tasks_for_owner(&self, email: Option<&str>) -> Result<Vec<Task>> {
        let email = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| TaskError::validation("Email is required"))?;

        let tasks = self.store.find_tasks(Some(email)).await?;
        if tasks.is_empty() {
            return Err(TaskError::NoTasksForEmail {
                email: email.to_string(),
            });
        }
        Ok(tasks)
    }

    pub async fn create_task(&self, mut doc: Document) -> Result<InsertResult> {
        strip_identifier(&mut doc);
        trim_email(&mut doc);
        require_fields(&doc, &TASK_FIELDS)?;

        let id = self.store.insert_task(doc).await?;
        log::info!("Created task {}", id);
        self.publisher.spawn_publish("task create");

        Ok(InsertResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    /// Replace the whole task document, keeping its identifier
    pub async fn replace_task(&self, id: &str, mut doc: Document) -> Result<UpdateResult> {
        let id = parse_task_id(id)?;
        strip_identifier(&mut doc);
        trim_email(&mut doc);
        require_fields(&doc, &TASK_FIELDS)?;

        self.apply_update(id, doc, UpdateMode::Replace).await
    }

    /// Merge the given fields into the task document
    pub async fn update_task(&self, id: &str, mut doc: Document) -> Result<UpdateResult> {
        let id = parse_task_id(id)?;
        strip_identifier(&mut doc);
        trim_email(&mut doc);
        if doc.is_empty() {
            return Err(TaskError::validation("No fields to update"));
        }
        check_present_fields(&doc, &TASK_FIELDS)?;

        self.apply_update(id, doc, UpdateMode::Merge).await
    }

    async fn apply_update(
        &self,
        id: uuid::Uuid,
        doc: Document,
        mode: UpdateMode,
    ) -> Result<UpdateResult> {
        let outcome = self.store.update_task(id, doc, mode).await?;
        if outcome.matched == 0 {
            return Err(TaskError::TaskNotFound { id: id.to_string() });
        }

        log::info!("Updated task {} ({:?}, modified={})", id, mode, outcome.modified);
        self.publisher.spawn_publish("task update");

        Ok(UpdateResult {
            acknowledged: true,
            matched_count: outcome.matched,
            modified_count: outcome.modified,
        })
    }

    pub async fn delete_task(&self, id: &str) -> Result<DeleteResult> {
        let id = parse_task_id(id)?;

        let deleted = self.store.delete_task(id).await?;
        if deleted == 0 {
            return Err(TaskError::TaskNotFound { id: id.to_string() });
        }

        log::info!("Deleted task {}", id);
        self.publisher.spawn_publish("task delete");

        Ok(DeleteResult {
            message: "Task deleted successfully".to_string(),
        })
    }

    /// Create a user unless one with the same email exists
    pub async fn create_user(&self, mut doc: Document) -> Result<InsertResult> {
        strip_identifier(&mut doc);
        trim_email(&mut doc);
        require_fields(&doc, &USER_FIELDS)?;

        let email = text_field(&doc, "email")?.to_string();
        let name = text_field(&doc, "name")?.to_string();
        doc.remove("email");
        doc.remove("name");

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(TaskError::UserExists { email });
        }

        let id = self.store.insert_user(&email, &name, doc).await?;
        log::info!("Created user {}", id);

        Ok(InsertResult {
            acknowledged: true,
            inserted_id: id,
        })
    }
}
