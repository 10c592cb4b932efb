//! Book catalog service

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{BookFilter, BookInput, BookQuery, NewBook, INVALID_BOOK, INVALID_BOOK_ID},
        Book, BookDetails, BookDto, PageRequest, PagedResult,
    },
    repository::Repository,
};

/// Rejects the nil UUID, which no book can carry
pub(crate) fn check_book_id(id: Uuid) -> AppResult<()> {
    if id.is_nil() {
        return Err(AppError::Validation(INVALID_BOOK_ID.to_string()));
    }
    Ok(())
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search books with filters and pagination
    pub async fn search(&self, query: &BookQuery) -> AppResult<PagedResult<BookDto>> {
        let page = PageRequest::new(query.page, query.page_size)?;
        let filter = BookFilter::from(query);
        let (books, total) = self.repository.books.search(&filter, &page).await?;
        Ok(PagedResult::new(books, total, page).map(BookDto::from))
    }

    pub async fn get(&self, id: Uuid) -> AppResult<BookDto> {
        self.find(id).await.map(BookDto::from)
    }

    /// Load a book row or fail with not-found
    pub(crate) async fn find(&self, id: Uuid) -> AppResult<BookDetails> {
        check_book_id(id)?;
        self.repository
            .books
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    pub async fn create(&self, data: &BookInput) -> AppResult<BookDto> {
        self.validate_input(data).await?;

        let book = NewBook {
            id: Uuid::new_v4(),
            title: data.title.trim().to_string(),
            author_id: data.author_id,
            publisher_id: data.publisher_id,
        };
        let created = self.repository.books.create(&book).await?;
        tracing::info!(book_id = %created.id, title = %created.title, "Book created");
        Ok(created.into())
    }

    /// Replace title, author and publisher of an available book
    pub async fn update(&self, id: Uuid, data: &BookInput) -> AppResult<()> {
        check_book_id(id)?;
        data.validate()
            .map_err(|_| AppError::Validation(INVALID_BOOK.to_string()))?;

        let existing = self.find(id).await?;
        existing.status().ensure_editable()?;
        self.check_references(data).await?;

        let book = Book {
            id,
            title: data.title.trim().to_string(),
            author_id: data.author_id,
            publisher_id: data.publisher_id,
            is_borrowed: false,
        };
        if !self.repository.books.update(&book).await? {
            // borrowed or deleted since it was loaded
            let current = self.find(id).await?;
            current.status().ensure_editable()?;
            return Err(AppError::Internal(format!("Book {} update was not applied", id)));
        }
        tracing::info!(book_id = %id, "Book updated");
        Ok(())
    }

    /// Delete an available book
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let existing = self.find(id).await?;
        existing.status().ensure_deletable()?;

        if !self.repository.books.delete(id).await? {
            let current = self.find(id).await?;
            current.status().ensure_deletable()?;
            return Err(AppError::Internal(format!("Book {} delete was not applied", id)));
        }
        tracing::info!(book_id = %id, title = %existing.title, "Book deleted");
        Ok(())
    }

    async fn validate_input(&self, data: &BookInput) -> AppResult<()> {
        data.validate()
            .map_err(|_| AppError::Validation(INVALID_BOOK.to_string()))?;
        self.check_references(data).await
    }

    async fn check_references(&self, data: &BookInput) -> AppResult<()> {
        if self.repository.authors.get_by_id(data.author_id).await?.is_none() {
            return Err(AppError::Validation(format!(
                "Author {} does not exist.",
                data.author_id
            )));
        }
        if self
            .repository
            .publishers
            .get_by_id(data.publisher_id)
            .await?
            .is_none()
        {
            return Err(AppError::Validation(format!(
                "Publisher {} does not exist.",
                data.publisher_id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockall::predicate::{always, eq};
    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::{
        models::{Author, Publisher},
        repository::{MockAuthorStore, MockBookStore, MockPublisherStore},
    };

    fn details(id: Uuid, is_borrowed: bool) -> BookDetails {
        BookDetails {
            id,
            title: "Emma".to_string(),
            author_id: 2,
            author_name: "Jane Austen".to_string(),
            publisher_id: 2,
            publisher_name: "Public Domain Books".to_string(),
            is_borrowed,
        }
    }

    fn input(title: &str) -> BookInput {
        BookInput {
            title: title.to_string(),
            author_id: 2,
            publisher_id: 2,
        }
    }

    /// Author 2 and publisher 2 exist, nothing else does
    fn references() -> (MockAuthorStore, MockPublisherStore) {
        let mut authors = MockAuthorStore::new();
        authors.expect_get_by_id().returning(|id| {
            Ok((id == 2).then(|| Author {
                id,
                name: "Jane Austen".to_string(),
            }))
        });
        let mut publishers = MockPublisherStore::new();
        publishers.expect_get_by_id().returning(|id| {
            Ok((id == 2).then(|| Publisher {
                id,
                name: "Public Domain Books".to_string(),
            }))
        });
        (authors, publishers)
    }

    fn service(books: MockBookStore) -> CatalogService {
        let (authors, publishers) = references();
        let mut repository = Repository::in_memory();
        repository.authors = Arc::new(authors);
        repository.publishers = Arc::new(publishers);
        repository.books = Arc::new(books);
        CatalogService::new(repository)
    }

    #[tokio::test]
    async fn create_assigns_id_and_trims_title() {
        let mut books = MockBookStore::new();
        books
            .expect_create()
            .withf(|b| b.title == "Emma" && !b.id.is_nil())
            .times(1)
            .returning(|b| Ok(details(b.id, false)));

        let created = assert_ok!(service(books).create(&input("  Emma  ")).await);
        assert_eq!(created.title, "Emma");
        assert!(!created.is_borrowed);
    }

    #[tokio::test]
    async fn create_rejects_blank_title() {
        for title in ["", "    "] {
            let err = assert_err!(service(MockBookStore::new()).create(&input(title)).await);
            assert_eq!(err.message(), INVALID_BOOK);
        }
    }

    #[tokio::test]
    async fn create_rejects_unknown_author() {
        let mut data = input("Emma");
        data.author_id = 42;
        let err = assert_err!(service(MockBookStore::new()).create(&data).await);
        assert!(matches!(err, AppError::Validation(ref m) if m == "Author 42 does not exist."));
    }

    #[tokio::test]
    async fn get_rejects_nil_id_without_touching_the_store() {
        let err = assert_err!(service(MockBookStore::new()).get(Uuid::nil()).await);
        assert_eq!(err.message(), INVALID_BOOK_ID);
    }

    #[tokio::test]
    async fn get_missing_book_is_not_found() {
        let mut books = MockBookStore::new();
        books.expect_get_by_id().returning(|_| Ok(None));
        let err = assert_err!(service(books).get(Uuid::new_v4()).await);
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_refuses_borrowed_book() {
        let id = Uuid::new_v4();
        let mut books = MockBookStore::new();
        books
            .expect_get_by_id()
            .with(eq(id))
            .returning(|id| Ok(Some(details(id, true))));
        books.expect_update().never();

        let err = assert_err!(service(books).update(id, &input("Emma (revised)")).await);
        assert_eq!(err.message(), "Cannot update a borrowed book.");
    }

    #[tokio::test]
    async fn update_writes_available_book() {
        let id = Uuid::new_v4();
        let mut books = MockBookStore::new();
        books
            .expect_get_by_id()
            .returning(|id| Ok(Some(details(id, false))));
        books
            .expect_update()
            .withf(move |b| b.id == id && b.title == "Persuasion" && !b.is_borrowed)
            .times(1)
            .returning(|_| Ok(true));

        assert_ok!(service(books).update(id, &input("Persuasion")).await);
    }

    #[tokio::test]
    async fn update_lost_race_reports_borrowed() {
        let id = Uuid::new_v4();
        let mut books = MockBookStore::new();
        let mut calls = 0;
        books.expect_get_by_id().returning(move |id| {
            calls += 1;
            Ok(Some(details(id, calls > 1)))
        });
        books.expect_update().returning(|_| Ok(false));

        let err = assert_err!(service(books).update(id, &input("Persuasion")).await);
        assert_eq!(err.message(), "Cannot update a borrowed book.");
    }

    #[tokio::test]
    async fn delete_refuses_borrowed_book() {
        let mut books = MockBookStore::new();
        books
            .expect_get_by_id()
            .returning(|id| Ok(Some(details(id, true))));
        books.expect_delete().never();

        let err = assert_err!(service(books).delete(Uuid::new_v4()).await);
        assert!(matches!(err, AppError::BusinessRule(_)));
        assert_eq!(err.message(), "Cannot delete a borrowed book.");
    }

    #[tokio::test]
    async fn delete_removes_available_book() {
        let id = Uuid::new_v4();
        let mut books = MockBookStore::new();
        books
            .expect_get_by_id()
            .returning(|id| Ok(Some(details(id, false))));
        books.expect_delete().with(eq(id)).times(1).returning(|_| Ok(true));

        assert_ok!(service(books).delete(id).await);
    }

    #[tokio::test]
    async fn search_builds_filter_and_page() {
        let mut books = MockBookStore::new();
        books
            .expect_search()
            .withf(|filter, page| {
                filter.author_id == Some(2)
                    && filter.is_borrowed == Some(false)
                    && page.page == 2
                    && page.page_size == 5
            })
            .returning(|_, _| Ok((vec![details(Uuid::new_v4(), false)], 6)));

        let query = BookQuery {
            author_id: Some(2),
            is_borrowed: Some(false),
            page: Some(2),
            page_size: Some(5),
            ..Default::default()
        };
        let page = assert_ok!(service(books).search(&query).await);
        assert_eq!(page.total_count, 6);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].author.name, "Jane Austen");
    }

    #[tokio::test]
    async fn search_rejects_bad_paging() {
        let mut books = MockBookStore::new();
        books.expect_search().with(always(), always()).never();

        let query = BookQuery {
            page: Some(0),
            ..Default::default()
        };
        let err = assert_err!(service(books).search(&query).await);
        assert!(matches!(err, AppError::Validation(_)));
    }
}
