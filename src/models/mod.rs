//! Data models for the library catalog

pub mod author;
pub mod book;
pub mod paging;
pub mod publisher;

use serde::{Deserialize, Deserializer};
use validator::ValidationError;

// Re-export commonly used types
pub use author::{Author, AuthorDto};
pub use book::{Book, BookDetails, BookDto, BookStatus};
pub use paging::{PageRequest, PagedResult};
pub use publisher::{Publisher, PublisherDto};

/// Rejects empty and whitespace-only strings
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Reads a JSON `null` as an empty string so it reaches the not-blank rule
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
