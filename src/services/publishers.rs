//! Publisher management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        publisher::{CreatePublisher, INVALID_PUBLISHER, PUBLISHER_HAS_BOOKS},
        PublisherDto,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct PublishersService {
    repository: Repository,
}

impl PublishersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, name: Option<&str>) -> AppResult<Vec<PublisherDto>> {
        let name = name.map(str::trim).filter(|n| !n.is_empty()).map(String::from);
        let publishers = self.repository.publishers.list(name).await?;
        Ok(publishers.into_iter().map(PublisherDto::from).collect())
    }

    pub async fn get(&self, id: i32) -> AppResult<PublisherDto> {
        self.repository
            .publishers
            .get_by_id(id)
            .await?
            .map(PublisherDto::from)
            .ok_or_else(|| AppError::NotFound(format!("Publisher {} not found", id)))
    }

    pub async fn create(&self, data: &CreatePublisher) -> AppResult<PublisherDto> {
        data.validate()
            .map_err(|_| AppError::Validation(INVALID_PUBLISHER.to_string()))?;

        let publisher = self.repository.publishers.create(data.name.trim()).await?;
        tracing::info!(publisher_id = publisher.id, name = %publisher.name, "Publisher created");
        Ok(publisher.into())
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.get(id).await?;

        if self.repository.publishers.has_books(id).await? {
            return Err(AppError::BusinessRule(PUBLISHER_HAS_BOOKS.to_string()));
        }

        if !self.repository.publishers.delete(id).await? {
            return Err(AppError::NotFound(format!("Publisher {} not found", id)));
        }
        tracing::info!(publisher_id = id, "Publisher deleted");
        Ok(())
    }
}
