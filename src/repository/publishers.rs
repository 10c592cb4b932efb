//! Publishers repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::{contains_pattern, PublisherStore};
use crate::{
    error::{AppError, AppResult},
    models::{publisher::PUBLISHER_HAS_BOOKS, Publisher},
};

#[derive(Clone)]
pub struct PublishersRepository {
    pool: Pool<Postgres>,
}

impl PublishersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PublisherStore for PublishersRepository {
    async fn list(&self, name: Option<String>) -> AppResult<Vec<Publisher>> {
        let rows = sqlx::query_as::<_, Publisher>(
            r#"
            SELECT id, name FROM publishers
            WHERE $1::text IS NULL OR name ILIKE $1
            ORDER BY name, id
            "#,
        )
        .bind(name.as_deref().map(contains_pattern))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Publisher>> {
        let row =
            sqlx::query_as::<_, Publisher>("SELECT id, name FROM publishers WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row)
    }

    async fn create(&self, name: &str) -> AppResult<Publisher> {
        let row = sqlx::query_as::<_, Publisher>(
            "INSERT INTO publishers (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn has_books(&self, id: i32) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE publisher_id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM publishers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                    AppError::BusinessRule(PUBLISHER_HAS_BOOKS.to_string())
                }
                other => other.into(),
            })?;
        Ok(result.rows_affected() > 0)
    }
}
