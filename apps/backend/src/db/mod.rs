// Database connection modules
pub mod memory;
pub mod pg;

// Entity modules
pub mod tasks;
pub mod users;

use async_trait::async_trait;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::errors::Result;
use crate::models::domain::{Document, Task, UpdateMode, UpdateOutcome, User};

// Re-export common types
pub use memory::MemoryStore;
pub use sqlx::postgres::PgPool;

/// Document store holding task and user records.
///
/// Single-document operations are atomic; nothing beyond that is assumed.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert a task document and return the identifier assigned to it
    async fn insert_task(&self, doc: Document) -> Result<Uuid>;

    /// All tasks in insertion order, optionally restricted to one owner email
    async fn find_tasks(&self, email: Option<&str>) -> Result<Vec<Task>>;

    async fn update_task(&self, id: Uuid, doc: Document, mode: UpdateMode)
        -> Result<UpdateOutcome>;

    /// Delete a task, returning how many records were removed
    async fn delete_task(&self, id: Uuid) -> Result<u64>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Insert a user and return the identifier assigned to it
    async fn insert_user(&self, email: &str, name: &str, extra: Document) -> Result<Uuid>;

    async fn count_users(&self) -> Result<u64>;
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct Db {
    pub postgres: PgPool,
}

impl Db {
    /// Connect to PostgreSQL and run migrations
    pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let postgres = pg::create_pool(config).await?;
        Ok(Self { postgres })
    }

    pub fn from_pool(postgres: PgPool) -> Self {
        Self { postgres }
    }
}

#[async_trait]
impl TaskStore for Db {
    async fn insert_task(&self, doc: Document) -> Result<Uuid> {
        self.create_task(doc).await
    }

    async fn find_tasks(&self, email: Option<&str>) -> Result<Vec<Task>> {
        self.list_tasks(email).await
    }

    async fn update_task(
        &self,
        id: Uuid,
        doc: Document,
        mode: UpdateMode,
    ) -> Result<UpdateOutcome> {
        match mode {
            UpdateMode::Replace => self.replace_task_doc(id, doc).await,
            UpdateMode::Merge => self.merge_task_doc(id, doc).await,
        }
    }

    async fn delete_task(&self, id: Uuid) -> Result<u64> {
        self.remove_task(id).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email(email).await
    }

    async fn insert_user(&self, email: &str, name: &str, extra: Document) -> Result<Uuid> {
        self.create_user(email, name, extra).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.user_count().await
    }
}
