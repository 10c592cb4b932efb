//! PostgreSQL repository tests
//!
//! Run against a scratch database: DATABASE_URL=postgres://... cargo test --test postgres_repository
//! Without DATABASE_URL every test returns early.

use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use library_manager::{
    models::{
        book::{BookFilter, NewBook},
        Book, PageRequest,
    },
    repository::Repository,
    AppError,
};

async fn repository() -> Option<Repository> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping PostgreSQL tests");
        return None;
    };
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    Some(Repository::new(pool))
}

/// Creates an author and publisher named after `marker`, so tests sharing a
/// database never see each other's rows.
async fn references(repository: &Repository, marker: &str) -> (i32, i32) {
    let author = repository
        .authors
        .create(&format!("Author {marker}"))
        .await
        .unwrap();
    let publisher = repository
        .publishers
        .create(&format!("Publisher {marker}"))
        .await
        .unwrap();
    (author.id, publisher.id)
}

async fn add_book(repository: &Repository, title: &str, author_id: i32, publisher_id: i32) -> Uuid {
    let id = Uuid::new_v4();
    repository
        .books
        .create(&NewBook {
            id,
            title: title.to_string(),
            author_id,
            publisher_id,
        })
        .await
        .unwrap();
    id
}

async fn cleanup(repository: &Repository, books: &[Uuid], author_id: i32, publisher_id: i32) {
    for id in books {
        repository.books.set_borrowed(*id, false).await.unwrap();
        repository.books.delete(*id).await.unwrap();
    }
    repository.authors.delete(author_id).await.unwrap();
    repository.publishers.delete(publisher_id).await.unwrap();
}

fn marker() -> String {
    Uuid::new_v4().simple().to_string()
}

#[tokio::test]
async fn test_borrow_flag_writes_are_conditional() {
    let Some(repository) = repository().await else {
        return;
    };
    let (author_id, publisher_id) = references(&repository, &marker()).await;
    let id = add_book(&repository, "Emma", author_id, publisher_id).await;

    assert!(repository.books.set_borrowed(id, true).await.unwrap());
    assert!(!repository.books.set_borrowed(id, true).await.unwrap());
    assert!(repository.books.get_by_id(id).await.unwrap().unwrap().is_borrowed);

    // borrowed books are neither updated nor deleted
    let edit = Book {
        id,
        title: "Emma (annotated)".to_string(),
        author_id,
        publisher_id,
        is_borrowed: false,
    };
    assert!(!repository.books.update(&edit).await.unwrap());
    assert!(!repository.books.delete(id).await.unwrap());

    assert!(repository.books.set_borrowed(id, false).await.unwrap());
    assert!(!repository.books.set_borrowed(id, false).await.unwrap());
    assert!(repository.books.update(&edit).await.unwrap());
    assert_eq!(
        repository.books.get_by_id(id).await.unwrap().unwrap().title,
        "Emma (annotated)"
    );
    assert!(!repository.books.set_borrowed(Uuid::new_v4(), true).await.unwrap());

    cleanup(&repository, &[id], author_id, publisher_id).await;
}

#[tokio::test]
async fn test_foreign_keys_map_to_domain_errors() {
    let Some(repository) = repository().await else {
        return;
    };
    let (author_id, publisher_id) = references(&repository, &marker()).await;

    let err = repository
        .books
        .create(&NewBook {
            id: Uuid::new_v4(),
            title: "Orphan".to_string(),
            author_id: -1,
            publisher_id,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let id = add_book(&repository, "Persuasion", author_id, publisher_id).await;
    assert!(repository.authors.has_books(author_id).await.unwrap());
    assert!(repository.publishers.has_books(publisher_id).await.unwrap());

    let err = repository.authors.delete(author_id).await.unwrap_err();
    assert_eq!(err.message(), "Cannot delete an author with associated books.");
    let err = repository.publishers.delete(publisher_id).await.unwrap_err();
    assert_eq!(err.message(), "Cannot delete a publisher with associated books.");

    let moved = Book {
        id,
        title: "Persuasion".to_string(),
        author_id,
        publisher_id: -1,
        is_borrowed: false,
    };
    let err = repository.books.update(&moved).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    cleanup(&repository, &[id], author_id, publisher_id).await;
    assert!(repository.authors.get_by_id(author_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_search_filters_and_pages() {
    let Some(repository) = repository().await else {
        return;
    };
    let marker = marker();
    let (author_id, publisher_id) = references(&repository, &marker).await;

    let mut ids = Vec::new();
    for title in ["Sense and Sensibility", "Emma", "Pride and Prejudice", "100% Austen"] {
        ids.push(add_book(&repository, &format!("{title} {marker}"), author_id, publisher_id).await);
    }
    repository.books.set_borrowed(ids[1], true).await.unwrap();

    let by_author = BookFilter {
        author_id: Some(author_id),
        ..Default::default()
    };
    let page = PageRequest::new(Some(1), Some(2)).unwrap();
    let (items, total) = repository.books.search(&by_author, &page).await.unwrap();
    assert_eq!(total, 4);
    assert_eq!(items.len(), 2);
    assert!(items[0].title.starts_with("100% Austen"));
    assert!(items[1].title.starts_with("Emma"));
    assert_eq!(items[0].author_name, format!("Author {marker}"));
    assert_eq!(items[0].publisher_name, format!("Publisher {marker}"));

    let page = PageRequest::new(Some(2), Some(2)).unwrap();
    let (items, _) = repository.books.search(&by_author, &page).await.unwrap();
    assert!(items[0].title.starts_with("Pride and Prejudice"));

    let available = BookFilter {
        is_borrowed: Some(false),
        ..by_author.clone()
    };
    let (_, total) = repository
        .books
        .search(&available, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(total, 3);

    let titled = BookFilter {
        title: Some(format!("AND SENSIBILITY {marker}")),
        ..by_author.clone()
    };
    let (items, total) = repository
        .books
        .search(&titled, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert!(items[0].title.starts_with("Sense and Sensibility"));

    // wildcards in the filter match literally
    let percent = BookFilter {
        title: Some("0% a".to_string()),
        ..by_author.clone()
    };
    let (_, total) = repository
        .books
        .search(&percent, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(total, 1);
    let underscore = BookFilter {
        title: Some("_".to_string()),
        ..by_author
    };
    let (_, total) = repository
        .books
        .search(&underscore, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(total, 0);

    let authors = repository
        .authors
        .list(Some(marker.to_uppercase()))
        .await
        .unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].id, author_id);

    cleanup(&repository, &ids, author_id, publisher_id).await;
}
