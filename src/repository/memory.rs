//! In-process catalog store.
//!
//! Holds all three tables behind one lock and enforces the same constraints as
//! the PostgreSQL schema: books must reference existing authors/publishers, and
//! referenced authors/publishers cannot be deleted. Listings sort by the
//! lowercased name or title, then id.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AuthorStore, BookStore, PublisherStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        author::AUTHOR_HAS_BOOKS,
        book::{BookFilter, NewBook},
        publisher::PUBLISHER_HAS_BOOKS,
        Author, Book, BookDetails, PageRequest, Publisher,
    },
};

#[derive(Default)]
struct Tables {
    authors: BTreeMap<i32, String>,
    publishers: BTreeMap<i32, String>,
    books: BTreeMap<Uuid, Book>,
    next_author_id: i32,
    next_publisher_id: i32,
}

impl Tables {
    fn details(&self, book: &Book) -> BookDetails {
        BookDetails {
            id: book.id,
            title: book.title.clone(),
            author_id: book.author_id,
            author_name: self.authors.get(&book.author_id).cloned().unwrap_or_default(),
            publisher_id: book.publisher_id,
            publisher_name: self
                .publishers
                .get(&book.publisher_id)
                .cloned()
                .unwrap_or_default(),
            is_borrowed: book.is_borrowed,
        }
    }

    fn check_references(&self, author_id: i32, publisher_id: i32) -> AppResult<()> {
        if !self.authors.contains_key(&author_id) || !self.publishers.contains_key(&publisher_id) {
            return Err(AppError::Validation(
                "Referenced author or publisher does not exist.".to_string(),
            ));
        }
        Ok(())
    }
}

fn name_matches(name: &str, filter: Option<&str>) -> bool {
    filter.map_or(true, |needle| {
        name.to_lowercase().contains(&needle.to_lowercase())
    })
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl AuthorStore for MemoryStore {
    async fn list(&self, name: Option<String>) -> AppResult<Vec<Author>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Author> = tables
            .authors
            .iter()
            .filter(|(_, n)| name_matches(n, name.as_deref()))
            .map(|(id, n)| Author {
                id: *id,
                name: n.clone(),
            })
            .collect();
        rows.sort_by_cached_key(|a| (a.name.to_lowercase(), a.id));
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Author>> {
        let tables = self.tables.read().await;
        Ok(tables.authors.get(&id).map(|name| Author {
            id,
            name: name.clone(),
        }))
    }

    async fn create(&self, name: &str) -> AppResult<Author> {
        let mut tables = self.tables.write().await;
        tables.next_author_id += 1;
        let id = tables.next_author_id;
        tables.authors.insert(id, name.to_string());
        Ok(Author {
            id,
            name: name.to_string(),
        })
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.tables.read().await.authors.len() as i64)
    }

    async fn has_books(&self, id: i32) -> AppResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.books.values().any(|b| b.author_id == id))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.books.values().any(|b| b.author_id == id) {
            return Err(AppError::BusinessRule(AUTHOR_HAS_BOOKS.to_string()));
        }
        Ok(tables.authors.remove(&id).is_some())
    }
}

#[async_trait]
impl PublisherStore for MemoryStore {
    async fn list(&self, name: Option<String>) -> AppResult<Vec<Publisher>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Publisher> = tables
            .publishers
            .iter()
            .filter(|(_, n)| name_matches(n, name.as_deref()))
            .map(|(id, n)| Publisher {
                id: *id,
                name: n.clone(),
            })
            .collect();
        rows.sort_by_cached_key(|p| (p.name.to_lowercase(), p.id));
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Publisher>> {
        let tables = self.tables.read().await;
        Ok(tables.publishers.get(&id).map(|name| Publisher {
            id,
            name: name.clone(),
        }))
    }

    async fn create(&self, name: &str) -> AppResult<Publisher> {
        let mut tables = self.tables.write().await;
        tables.next_publisher_id += 1;
        let id = tables.next_publisher_id;
        tables.publishers.insert(id, name.to_string());
        Ok(Publisher {
            id,
            name: name.to_string(),
        })
    }

    async fn has_books(&self, id: i32) -> AppResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.books.values().any(|b| b.publisher_id == id))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.books.values().any(|b| b.publisher_id == id) {
            return Err(AppError::BusinessRule(PUBLISHER_HAS_BOOKS.to_string()));
        }
        Ok(tables.publishers.remove(&id).is_some())
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn search(
        &self,
        filter: &BookFilter,
        page: &PageRequest,
    ) -> AppResult<(Vec<BookDetails>, i64)> {
        let tables = self.tables.read().await;
        let mut matches: Vec<&Book> = tables.books.values().filter(|b| filter.matches(b)).collect();
        matches.sort_by_cached_key(|b| (b.title.to_lowercase(), b.id));

        let total = matches.len() as i64;
        let items = matches
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit()).unwrap_or(0))
            .map(|b| tables.details(b))
            .collect();
        Ok((items, total))
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<BookDetails>> {
        let tables = self.tables.read().await;
        Ok(tables.books.get(&id).map(|b| tables.details(b)))
    }

    async fn create(&self, book: &NewBook) -> AppResult<BookDetails> {
        let mut tables = self.tables.write().await;
        tables.check_references(book.author_id, book.publisher_id)?;
        if tables.books.contains_key(&book.id) {
            return Err(AppError::Internal(format!("Duplicate book id {}", book.id)));
        }
        let row = Book {
            id: book.id,
            title: book.title.clone(),
            author_id: book.author_id,
            publisher_id: book.publisher_id,
            is_borrowed: false,
        };
        let details = tables.details(&row);
        tables.books.insert(row.id, row);
        Ok(details)
    }

    async fn update(&self, book: &Book) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        tables.check_references(book.author_id, book.publisher_id)?;
        match tables.books.get_mut(&book.id) {
            Some(existing) if !existing.is_borrowed => {
                existing.title = book.title.clone();
                existing.author_id = book.author_id;
                existing.publisher_id = book.publisher_id;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_borrowed(&self, id: Uuid, borrowed: bool) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.books.get_mut(&id) {
            Some(existing) if existing.is_borrowed != borrowed => {
                existing.is_borrowed = borrowed;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let deletable = tables.books.get(&id).map_or(false, |b| !b.is_borrowed);
        if deletable {
            tables.books.remove(&id);
        }
        Ok(deletable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with_book(title: &str) -> (MemoryStore, Uuid, i32, i32) {
        let store = MemoryStore::default();
        let author = AuthorStore::create(&store, "Jane Austen").await.unwrap();
        let publisher = PublisherStore::create(&store, "Public Domain Books")
            .await
            .unwrap();
        let id = Uuid::new_v4();
        BookStore::create(
            &store,
            &NewBook {
                id,
                title: title.to_string(),
                author_id: author.id,
                publisher_id: publisher.id,
            },
        )
        .await
        .unwrap();
        (store, id, author.id, publisher.id)
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially() {
        let store = MemoryStore::default();
        let first = AuthorStore::create(&store, "A").await.unwrap();
        let second = AuthorStore::create(&store, "B").await.unwrap();
        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(AuthorStore::count(&store).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn book_requires_existing_references() {
        let store = MemoryStore::default();
        let err = BookStore::create(
            &store,
            &NewBook {
                id: Uuid::new_v4(),
                title: "Orphan".to_string(),
                author_id: 1,
                publisher_id: 1,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn referenced_author_cannot_be_deleted() {
        let (store, book_id, author_id, publisher_id) = store_with_book("Emma").await;
        let err = AuthorStore::delete(&store, author_id).await.unwrap_err();
        assert_eq!(err.message(), AUTHOR_HAS_BOOKS);
        let err = PublisherStore::delete(&store, publisher_id).await.unwrap_err();
        assert_eq!(err.message(), PUBLISHER_HAS_BOOKS);

        assert!(BookStore::delete(&store, book_id).await.unwrap());
        assert!(AuthorStore::delete(&store, author_id).await.unwrap());
        assert!(!AuthorStore::delete(&store, author_id).await.unwrap());
    }

    #[tokio::test]
    async fn set_borrowed_is_conditional() {
        let (store, id, _, _) = store_with_book("Emma").await;
        assert!(store.set_borrowed(id, true).await.unwrap());
        assert!(!store.set_borrowed(id, true).await.unwrap());
        assert!(!BookStore::delete(&store, id).await.unwrap());
        assert!(store.set_borrowed(id, false).await.unwrap());
        assert!(!store.set_borrowed(id, false).await.unwrap());
        assert!(!store.set_borrowed(Uuid::new_v4(), true).await.unwrap());
    }

    #[tokio::test]
    async fn search_filters_and_pages_by_title() {
        let (store, _, author_id, publisher_id) = store_with_book("Emma").await;
        for title in ["Persuasion", "Sense and Sensibility", "Pride and Prejudice"] {
            BookStore::create(
                &store,
                &NewBook {
                    id: Uuid::new_v4(),
                    title: title.to_string(),
                    author_id,
                    publisher_id,
                },
            )
            .await
            .unwrap();
        }

        let page = PageRequest::new(Some(2), Some(3)).unwrap();
        let (items, total) = store.search(&BookFilter::default(), &page).await.unwrap();
        assert_eq!(total, 4);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Sense and Sensibility");

        let filter = BookFilter {
            title: Some("and".to_string()),
            ..Default::default()
        };
        let (items, total) = store.search(&filter, &PageRequest::default()).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(items[0].title, "Pride and Prejudice");
        assert_eq!(items[0].author_name, "Jane Austen");
    }

    #[tokio::test]
    async fn ordering_ignores_case() {
        let store = MemoryStore::default();
        for name in ["zed", "Anna", "bob", "Zoe"] {
            PublisherStore::create(&store, name).await.unwrap();
        }
        let names: Vec<String> = PublisherStore::list(&store, None)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Anna", "bob", "zed", "Zoe"]);
    }

    #[tokio::test]
    async fn book_titles_sort_case_insensitively() {
        let (store, _, author_id, publisher_id) = store_with_book("emma").await;
        for title in ["Persuasion", "Emma Revisited", "animal farm"] {
            BookStore::create(
                &store,
                &NewBook {
                    id: Uuid::new_v4(),
                    title: title.to_string(),
                    author_id,
                    publisher_id,
                },
            )
            .await
            .unwrap();
        }
        let (items, _) = store
            .search(&BookFilter::default(), &PageRequest::default())
            .await
            .unwrap();
        let titles: Vec<&str> = items.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["animal farm", "emma", "Emma Revisited", "Persuasion"]);
    }

    #[tokio::test]
    async fn list_filters_by_name() {
        let store = MemoryStore::default();
        for name in ["George Orwell", "Mary Shelley", "Jane Austen"] {
            AuthorStore::create(&store, name).await.unwrap();
        }
        let all = AuthorStore::list(&store, None).await.unwrap();
        assert_eq!(all[0].name, "George Orwell");
        assert_eq!(all[2].name, "Mary Shelley");

        let some = AuthorStore::list(&store, Some("SHEL".to_string())).await.unwrap();
        assert_eq!(some.len(), 1);
        assert_eq!(some[0].name, "Mary Shelley");
    }
}
