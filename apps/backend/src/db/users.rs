use sqlx::types::Json;
use uuid::Uuid;

use crate::db::Db;
use crate::errors::{Result, TaskError};
use crate::models::{db::UserRow, domain::Document, domain::User};

impl Db {
    /// Create a new user. The unique index on `email` backs the service-level duplicate check.
    pub async fn create_user(&self, email: &str, name: &str, extra: Document) -> Result<Uuid> {
        let id = Uuid::new_v4();

        let result = sqlx::query("INSERT INTO users (id, email, name, extra) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(email)
            .bind(name)
            .bind(Json(extra))
            .execute(&self.postgres)
            .await;

        match result {
            Ok(_) => Ok(id),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(TaskError::UserExists {
                email: email.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, email, name, extra, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.postgres)
        .await?;

        Ok(row.map(User::from))
    }

    pub async fn user_count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.postgres)
            .await?;

        Ok(count as u64)
    }
}
