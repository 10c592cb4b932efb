//! Publisher model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{not_blank, null_as_empty};

pub const INVALID_PUBLISHER: &str = "Invalid publisher data.";
pub const PUBLISHER_HAS_BOOKS: &str = "Cannot delete a publisher with associated books.";

/// Publisher row
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Publisher {
    pub id: i32,
    pub name: String,
}

/// Publisher as exposed by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublisherDto {
    pub id: i32,
    pub name: String,
}

impl From<Publisher> for PublisherDto {
    fn from(publisher: Publisher) -> Self {
        Self {
            id: publisher.id,
            name: publisher.name,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePublisher {
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(custom(function = "not_blank"))]
    pub name: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PublisherQuery {
    /// Case-insensitive substring of the publisher name
    pub name: Option<String>,
}
