//! Author management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{CreateAuthor, AUTHOR_HAS_BOOKS, INVALID_AUTHOR},
        AuthorDto,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List authors, optionally filtered by name
    pub async fn list(&self, name: Option<&str>) -> AppResult<Vec<AuthorDto>> {
        let name = name.map(str::trim).filter(|n| !n.is_empty()).map(String::from);
        let authors = self.repository.authors.list(name).await?;
        Ok(authors.into_iter().map(AuthorDto::from).collect())
    }

    pub async fn get(&self, id: i32) -> AppResult<AuthorDto> {
        self.repository
            .authors
            .get_by_id(id)
            .await?
            .map(AuthorDto::from)
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    pub async fn create(&self, data: &CreateAuthor) -> AppResult<AuthorDto> {
        data.validate()
            .map_err(|_| AppError::Validation(INVALID_AUTHOR.to_string()))?;

        let author = self.repository.authors.create(data.name.trim()).await?;
        tracing::info!(author_id = author.id, name = %author.name, "Author created");
        Ok(author.into())
    }

    /// Delete an author that no book references
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.get(id).await?;

        if self.repository.authors.has_books(id).await? {
            return Err(AppError::BusinessRule(AUTHOR_HAS_BOOKS.to_string()));
        }

        if !self.repository.authors.delete(id).await? {
            return Err(AppError::NotFound(format!("Author {} not found", id)));
        }
        tracing::info!(author_id = id, "Author deleted");
        Ok(())
    }
}
