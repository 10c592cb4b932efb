//! Borrow and return service

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::BookStatus,
    repository::Repository,
};

use super::catalog::check_book_id;

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Mark an available book as borrowed
    pub async fn borrow(&self, id: Uuid) -> AppResult<()> {
        self.transition(id, BookStatus::borrow).await?;
        tracing::info!(book_id = %id, "Book borrowed");
        Ok(())
    }

    /// Mark a borrowed book as available again
    pub async fn return_book(&self, id: Uuid) -> AppResult<()> {
        self.transition(id, BookStatus::give_back).await?;
        tracing::info!(book_id = %id, "Book returned");
        Ok(())
    }

    /// Apply `step` to the current state and persist the result with a
    /// conditional write, so concurrent callers cannot both succeed.
    async fn transition<F, E>(&self, id: Uuid, step: F) -> AppResult<()>
    where
        F: Fn(BookStatus) -> Result<BookStatus, E>,
        AppError: From<E>,
    {
        check_book_id(id)?;
        let book = self
            .repository
            .books
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;

        let target = step(book.status())?;
        if self
            .repository
            .books
            .set_borrowed(id, target.is_borrowed())
            .await?
        {
            return Ok(());
        }

        // Someone else moved the book first; report against the state they left
        let current = self
            .repository
            .books
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;
        step(current.status())?;
        Err(AppError::Internal(format!("Book {} state change was not applied", id)))
    }
}
