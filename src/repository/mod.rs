//! Repository layer for catalog storage.
//!
//! Services talk to storage through the [`AuthorStore`], [`PublisherStore`] and
//! [`BookStore`] traits. Two backends implement them: PostgreSQL (`authors`,
//! `publishers`, `books`) and an in-process store ([`memory::MemoryStore`]).
//! Both enforce the same referential rules. Listing order uses the database
//! collation in PostgreSQL and a case-insensitive key in memory.

pub mod authors;
pub mod books;
pub mod memory;
pub mod publishers;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book::{BookFilter, NewBook},
        Author, Book, BookDetails, PageRequest, Publisher,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorStore: Send + Sync {
    /// All authors ordered by name, optionally filtered by a name substring
    async fn list(&self, name: Option<String>) -> AppResult<Vec<Author>>;
    async fn get_by_id(&self, id: i32) -> AppResult<Option<Author>>;
    async fn create(&self, name: &str) -> AppResult<Author>;
    async fn count(&self) -> AppResult<i64>;
    async fn has_books(&self, id: i32) -> AppResult<bool>;
    /// Returns false when no row was deleted
    async fn delete(&self, id: i32) -> AppResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PublisherStore: Send + Sync {
    async fn list(&self, name: Option<String>) -> AppResult<Vec<Publisher>>;
    async fn get_by_id(&self, id: i32) -> AppResult<Option<Publisher>>;
    async fn create(&self, name: &str) -> AppResult<Publisher>;
    async fn has_books(&self, id: i32) -> AppResult<bool>;
    async fn delete(&self, id: i32) -> AppResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// One page of matching books plus the total number of matches
    async fn search(
        &self,
        filter: &BookFilter,
        page: &PageRequest,
    ) -> AppResult<(Vec<BookDetails>, i64)>;
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<BookDetails>>;
    async fn create(&self, book: &NewBook) -> AppResult<BookDetails>;
    /// Overwrites title, author and publisher of an available book.
    /// Returns false when the book is missing or borrowed.
    async fn update(&self, book: &Book) -> AppResult<bool>;
    /// Flips `is_borrowed` to the given value. Returns false when the book is
    /// missing or already in that state.
    async fn set_borrowed(&self, id: Uuid, borrowed: bool) -> AppResult<bool>;
    /// Deletes an available book. Returns false when missing or borrowed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Main repository struct holding the storage backends
#[derive(Clone)]
pub struct Repository {
    pub pool: Option<Pool<Postgres>>,
    pub authors: Arc<dyn AuthorStore>,
    pub publishers: Arc<dyn PublisherStore>,
    pub books: Arc<dyn BookStore>,
}

impl Repository {
    /// Create a repository backed by PostgreSQL
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(authors::AuthorsRepository::new(pool.clone())),
            publishers: Arc::new(publishers::PublishersRepository::new(pool.clone())),
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Create a repository backed by an empty in-process store
    pub fn in_memory() -> Self {
        let store = memory::MemoryStore::default();
        Self {
            pool: None,
            authors: Arc::new(store.clone()),
            publishers: Arc::new(store.clone()),
            books: Arc::new(store),
        }
    }

    /// Check that the backing store answers
    pub async fn ping(&self) -> AppResult<()> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }
}

/// Builds an `ILIKE` pattern matching `needle` anywhere, with wildcards escaped
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
