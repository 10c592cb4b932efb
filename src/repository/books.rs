//! Books repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{contains_pattern, BookStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        book::{BookFilter, NewBook},
        Book, BookDetails, PageRequest,
    },
};

const DETAILS_SELECT: &str = r#"
    SELECT b.id, b.title, b.author_id, a.name AS author_name,
           b.publisher_id, p.name AS publisher_name, b.is_borrowed
    FROM books b
    JOIN authors a ON a.id = b.author_id
    JOIN publishers p ON p.id = b.publisher_id
"#;

/// Appends the WHERE clause for `filter`, binding every value
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &BookFilter) {
    builder.push(" WHERE TRUE");
    if let Some(title) = filter.title.as_deref() {
        builder
            .push(" AND b.title ILIKE ")
            .push_bind(contains_pattern(title));
    }
    if let Some(author_id) = filter.author_id {
        builder.push(" AND b.author_id = ").push_bind(author_id);
    }
    if let Some(publisher_id) = filter.publisher_id {
        builder.push(" AND b.publisher_id = ").push_bind(publisher_id);
    }
    if let Some(is_borrowed) = filter.is_borrowed {
        builder.push(" AND b.is_borrowed = ").push_bind(is_borrowed);
    }
}

/// Maps a foreign-key failure on insert/update to a validation error
fn reference_error(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
            AppError::Validation("Referenced author or publisher does not exist.".to_string())
        }
        other => other.into(),
    }
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn search(
        &self,
        filter: &BookFilter,
        page: &PageRequest,
    ) -> AppResult<(Vec<BookDetails>, i64)> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM books b");
        push_filter(&mut count, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut select = QueryBuilder::<Postgres>::new(DETAILS_SELECT);
        push_filter(&mut select, filter);
        select
            .push(" ORDER BY b.title, b.id LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let books = select
            .build_query_as::<BookDetails>()
            .fetch_all(&self.pool)
            .await?;

        Ok((books, total))
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<BookDetails>> {
        let query = format!("{} WHERE b.id = $1", DETAILS_SELECT);
        let book = sqlx::query_as::<_, BookDetails>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn create(&self, book: &NewBook) -> AppResult<BookDetails> {
        sqlx::query(
            r#"
            INSERT INTO books (id, title, author_id, publisher_id, is_borrowed)
            VALUES ($1, $2, $3, $4, FALSE)
            "#,
        )
        .bind(book.id)
        .bind(&book.title)
        .bind(book.author_id)
        .bind(book.publisher_id)
        .execute(&self.pool)
        .await
        .map_err(reference_error)?;

        self.get_by_id(book.id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Book {} vanished after insert", book.id)))
    }

    async fn update(&self, book: &Book) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE books SET title = $2, author_id = $3, publisher_id = $4
            WHERE id = $1 AND is_borrowed = FALSE
            "#,
        )
        .bind(book.id)
        .bind(&book.title)
        .bind(book.author_id)
        .bind(book.publisher_id)
        .execute(&self.pool)
        .await
        .map_err(reference_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_borrowed(&self, id: Uuid, borrowed: bool) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE books SET is_borrowed = $2 WHERE id = $1 AND is_borrowed <> $2")
                .bind(id)
                .bind(borrowed)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1 AND is_borrowed = FALSE")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
