//! In-process document store, used by tests and local runs without PostgreSQL

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::TaskStore;
use crate::errors::{Result, TaskError};
use crate::models::db::task_from_document;
use crate::models::domain::{merge_document, Document, Task, UpdateMode, UpdateOutcome, User};

#[derive(Default)]
struct Collections {
    tasks: Vec<(Uuid, Document)>,
    users: Vec<User>,
}

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail with a storage error until switched back
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(TaskError::Storage {
                message: "memory store is unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, doc: Document) -> Result<Uuid> {
        self.check_available()?;
        let id = Uuid::new_v4();
        self.collections.write().await.tasks.push((id, doc));
        Ok(id)
    }

    async fn find_tasks(&self, email: Option<&str>) -> Result<Vec<Task>> {
        self.check_available()?;
        let collections = self.collections.read().await;

        collections
            .tasks
            .iter()
            .filter(|(_, doc)| match email {
                Some(email) => doc.get("email").and_then(|v| v.as_str()) == Some(email),
                None => true,
            })
            .map(|(id, doc)| task_from_document(*id, doc.clone()))
            .collect()
    }

    async fn update_task(
        &self,
        id: Uuid,
        doc: Document,
        mode: UpdateMode,
    ) -> Result<UpdateOutcome> {
        self.check_available()?;
        let mut collections = self.collections.write().await;

        let Some((_, stored)) = collections.tasks.iter_mut().find(|(task_id, _)| *task_id == id)
        else {
            return Ok(UpdateOutcome {
                matched: 0,
                modified: 0,
            });
        };

        let mut updated = match mode {
            UpdateMode::Replace => Document::new(),
            UpdateMode::Merge => stored.clone(),
        };
        merge_document(&mut updated, doc);

        let modified = u64::from(*stored != updated);
        *stored = updated;

        Ok(UpdateOutcome {
            matched: 1,
            modified,
        })
    }

    async fn delete_task(&self, id: Uuid) -> Result<u64> {
        self.check_available()?;
        let mut collections = self.collections.write().await;
        let before = collections.tasks.len();
        collections.tasks.retain(|(task_id, _)| *task_id != id);
        Ok((before - collections.tasks.len()) as u64)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.check_available()?;
        let collections = self.collections.read().await;
        Ok(collections.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, email: &str, name: &str, extra: Document) -> Result<Uuid> {
        self.check_available()?;
        let mut collections = self.collections.write().await;

        // Same guarantee as the unique index on users.email
        if collections.users.iter().any(|u| u.email == email) {
            return Err(TaskError::UserExists {
                email: email.to_string(),
            });
        }

        let id = Uuid::new_v4();
        collections.users.push(User {
            id,
            email: email.to_string(),
            name: name.to_string(),
            extra,
        });
        Ok(id)
    }

    async fn count_users(&self) -> Result<u64> {
        self.check_available()?;
        Ok(self.collections.read().await.users.len() as u64)
    }
}
