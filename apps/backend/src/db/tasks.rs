use sqlx::types::Json;
use uuid::Uuid;

use crate::db::Db;
use crate::errors::Result;
use crate::models::db::TaskRow;
use crate::models::domain::{Document, Task, UpdateOutcome};

impl Db {
    /// Insert a new task document
    pub async fn create_task(&self, doc: Document) -> Result<Uuid> {
        let id = Uuid::new_v4();

        sqlx::query("INSERT INTO tasks (id, doc) VALUES ($1, $2)")
            .bind(id)
            .bind(Json(doc))
            .execute(&self.postgres)
            .await?;

        Ok(id)
    }

    /// List tasks in insertion order, optionally for a single owner
    pub async fn list_tasks(&self, email: Option<&str>) -> Result<Vec<Task>> {
        let rows: Vec<TaskRow> = sqlx::query_as(
            r#"
            SELECT id, doc, created_at
            FROM tasks
            WHERE ($1::TEXT IS NULL OR doc->>'email' = $1)
            ORDER BY seq ASC
            "#,
        )
        .bind(email)
        .fetch_all(&self.postgres)
        .await?;

        rows.into_iter().map(Task::try_from).collect()
    }

    /// Overwrite a task document
    pub async fn replace_task_doc(&self, id: Uuid, doc: Document) -> Result<UpdateOutcome> {
        let modified: Option<bool> = sqlx::query_scalar(
            r#"
            WITH prev AS (SELECT id, doc FROM tasks WHERE id = $1 FOR UPDATE)
            UPDATE tasks
            SET doc = $2, updated_at = NOW()
            FROM prev
            WHERE tasks.id = prev.id
            RETURNING prev.doc IS DISTINCT FROM tasks.doc
            "#,
        )
        .bind(id)
        .bind(Json(doc))
        .fetch_optional(&self.postgres)
        .await?;

        Ok(update_outcome(modified))
    }

    /// Merge fields into a task document, keeping fields not present in `doc`
    pub async fn merge_task_doc(&self, id: Uuid, doc: Document) -> Result<UpdateOutcome> {
        let modified: Option<bool> = sqlx::query_scalar(
            r#"
            WITH prev AS (SELECT id, doc FROM tasks WHERE id = $1 FOR UPDATE)
            UPDATE tasks
            SET doc = tasks.doc || $2, updated_at = NOW()
            FROM prev
            WHERE tasks.id = prev.id
            RETURNING prev.doc IS DISTINCT FROM tasks.doc
            "#,
        )
        .bind(id)
        .bind(Json(doc))
        .fetch_optional(&self.postgres)
        .await?;

        Ok(update_outcome(modified))
    }

    pub async fn remove_task(&self, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.postgres)
            .await?;

        Ok(result.rows_affected())
    }
}

fn update_outcome(modified: Option<bool>) -> UpdateOutcome {
    match modified {
        Some(modified) => UpdateOutcome {
            matched: 1,
            modified: u64::from(modified),
        },
        None => UpdateOutcome {
            matched: 0,
            modified: 0,
        },
    }
}
