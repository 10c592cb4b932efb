//! Business logic services

pub mod authors;
pub mod catalog;
pub mod loans;
pub mod publishers;
pub mod seed;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub publishers: publishers::PublishersService,
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            authors: authors::AuthorsService::new(repository.clone()),
            publishers: publishers::PublishersService::new(repository.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone()),
            repository,
        }
    }
}
