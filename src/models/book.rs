//! Book model, request types and the borrow state machine.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::{author::AuthorDto, not_blank, null_as_empty, publisher::PublisherDto};
use crate::error::AppError;

pub const INVALID_BOOK: &str = "Invalid book data.";
pub const INVALID_BOOK_ID: &str = "Invalid book id.";

/// Circulation state of a book.
///
/// `Available` maps to `is_borrowed = false` and `Borrowed` to `is_borrowed = true`.
/// Every transition either returns the new state or a [`BookStateError`] and never
/// mutates the caller's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookStatus {
    Available,
    Borrowed,
}

/// Rejected transition on a [`BookStatus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BookStateError {
    #[error("Book is already borrowed.")]
    AlreadyBorrowed,
    #[error("Book is not borrowed.")]
    NotBorrowed,
    #[error("Cannot update a borrowed book.")]
    UpdateWhileBorrowed,
    #[error("Cannot delete a borrowed book.")]
    DeleteWhileBorrowed,
}

impl From<BookStateError> for AppError {
    fn from(e: BookStateError) -> Self {
        AppError::BusinessRule(e.to_string())
    }
}

impl BookStatus {
    pub fn from_flag(is_borrowed: bool) -> Self {
        if is_borrowed {
            BookStatus::Borrowed
        } else {
            BookStatus::Available
        }
    }

    pub fn is_borrowed(self) -> bool {
        self == BookStatus::Borrowed
    }

    /// Available -> Borrowed
    pub fn borrow(self) -> Result<Self, BookStateError> {
        match self {
            BookStatus::Available => Ok(BookStatus::Borrowed),
            BookStatus::Borrowed => Err(BookStateError::AlreadyBorrowed),
        }
    }

    /// Borrowed -> Available
    pub fn give_back(self) -> Result<Self, BookStateError> {
        match self {
            BookStatus::Borrowed => Ok(BookStatus::Available),
            BookStatus::Available => Err(BookStateError::NotBorrowed),
        }
    }

    pub fn ensure_editable(self) -> Result<(), BookStateError> {
        match self {
            BookStatus::Available => Ok(()),
            BookStatus::Borrowed => Err(BookStateError::UpdateWhileBorrowed),
        }
    }

    pub fn ensure_deletable(self) -> Result<(), BookStateError> {
        match self {
            BookStatus::Available => Ok(()),
            BookStatus::Borrowed => Err(BookStateError::DeleteWhileBorrowed),
        }
    }
}

/// Book row
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author_id: i32,
    pub publisher_id: i32,
    pub is_borrowed: bool,
}

impl Book {
    pub fn status(&self) -> BookStatus {
        BookStatus::from_flag(self.is_borrowed)
    }
}

/// Book joined with its author and publisher names
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct BookDetails {
    pub id: Uuid,
    pub title: String,
    pub author_id: i32,
    pub author_name: String,
    pub publisher_id: i32,
    pub publisher_name: String,
    pub is_borrowed: bool,
}

impl BookDetails {
    pub fn status(&self) -> BookStatus {
        BookStatus::from_flag(self.is_borrowed)
    }
}

/// Book as exposed by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: Uuid,
    pub title: String,
    pub author: AuthorDto,
    pub publisher: PublisherDto,
    pub is_borrowed: bool,
}

impl From<BookDetails> for BookDto {
    fn from(book: BookDetails) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: AuthorDto {
                id: book.author_id,
                name: book.author_name,
            },
            publisher: PublisherDto {
                id: book.publisher_id,
                name: book.publisher_name,
            },
            is_borrowed: book.is_borrowed,
        }
    }
}

/// Create/update book request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    pub author_id: i32,
    pub publisher_id: i32,
}

/// Values written to the `books` table on insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub id: Uuid,
    pub title: String,
    pub author_id: i32,
    pub publisher_id: i32,
}

/// Book list filters and paging, as read from the query string
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    pub author_id: Option<i32>,
    pub publisher_id: Option<i32>,
    pub is_borrowed: Option<bool>,
    /// 1-based page number (default 1)
    pub page: Option<i64>,
    /// Page size (default 10, max 100)
    pub page_size: Option<i64>,
}

/// Filters applied by the book store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub title: Option<String>,
    pub author_id: Option<i32>,
    pub publisher_id: Option<i32>,
    pub is_borrowed: Option<bool>,
}

impl BookFilter {
    /// Whether a book matches every set filter
    pub fn matches(&self, book: &Book) -> bool {
        let title_ok = self.title.as_deref().map_or(true, |needle| {
            book.title.to_lowercase().contains(&needle.to_lowercase())
        });
        title_ok
            && self.author_id.map_or(true, |id| book.author_id == id)
            && self.publisher_id.map_or(true, |id| book.publisher_id == id)
            && self.is_borrowed.map_or(true, |b| book.is_borrowed == b)
    }
}

impl From<&BookQuery> for BookFilter {
    fn from(query: &BookQuery) -> Self {
        Self {
            title: query
                .title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from),
            author_id: query.author_id,
            publisher_id: query.publisher_id,
            is_borrowed: query.is_borrowed,
        }
    }
}
