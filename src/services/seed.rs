//! Demo catalog loaded on first start

use uuid::{uuid, Uuid};

use crate::{error::AppResult, models::book::NewBook, repository::Repository};

const AUTHORS: [&str; 5] = [
    "Fernando Pessoa",
    "Jane Austen",
    "George Orwell",
    "Fyodor Dostoevsky",
    "Mary Shelley",
];

const PUBLISHERS: [&str; 3] = ["Classic Literature Press", "Public Domain Books", "Demo Publisher"];

/// (id, title, author index, publisher index, borrowed)
const BOOKS: [(Uuid, &str, usize, usize, bool); 15] = [
    (uuid!("b1d8b2dd-2d77-4b42-9dc6-7f4c1ec4c001"), "The Book of Disquiet", 0, 0, false),
    (uuid!("b1d8b2dd-2d77-4b42-9dc6-7f4c1ec4c002"), "Mensagem", 0, 0, false),
    (uuid!("b1d8b2dd-2d77-4b42-9dc6-7f4c1ec4c003"), "Selected Poems", 0, 2, false),
    (uuid!("b1d8b2dd-2d77-4b42-9dc6-7f4c1ec4c004"), "Pride and Prejudice", 1, 1, false),
    (uuid!("b1d8b2dd-2d77-4b42-9dc6-7f4c1ec4c005"), "Sense and Sensibility", 1, 1, false),
    (uuid!("b1d8b2dd-2d77-4b42-9dc6-7f4c1ec4c006"), "Emma", 1, 1, false),
    (uuid!("b1d8b2dd-2d77-4b42-9dc6-7f4c1ec4c007"), "Persuasion", 1, 1, false),
    (uuid!("b1d8b2dd-2d77-4b42-9dc6-7f4c1ec4c008"), "1984", 2, 0, true),
    (uuid!("b1d8b2dd-2d77-4b42-9dc6-7f4c1ec4c009"), "Animal Farm", 2, 0, false),
    (uuid!("b1d8b2dd-2d77-4b42-9dc6-7f4c1ec4c00a"), "Homage to Catalonia", 2, 0, false),
    (uuid!("b1d8b2dd-2d77-4b42-9dc6-7f4c1ec4c00b"), "Crime and Punishment", 3, 2, true),
    (uuid!("b1d8b2dd-2d77-4b42-9dc6-7f4c1ec4c00c"), "The Brothers Karamazov", 3, 2, false),
    (uuid!("b1d8b2dd-2d77-4b42-9dc6-7f4c1ec4c00d"), "Notes from Underground", 3, 2, false),
    (uuid!("b1d8b2dd-2d77-4b42-9dc6-7f4c1ec4c00e"), "Frankenstein", 4, 1, false),
    (uuid!("b1d8b2dd-2d77-4b42-9dc6-7f4c1ec4c00f"), "The Last Man", 4, 1, false),
];

/// Load the demo catalog unless authors already exist.
/// Returns whether anything was written.
pub async fn seed_demo_catalog(repository: &Repository) -> AppResult<bool> {
    if repository.authors.count().await? > 0 {
        tracing::debug!("Catalog already populated, skipping demo data");
        return Ok(false);
    }

    let mut author_ids = Vec::with_capacity(AUTHORS.len());
    for name in AUTHORS {
        author_ids.push(repository.authors.create(name).await?.id);
    }

    let mut publisher_ids = Vec::with_capacity(PUBLISHERS.len());
    for name in PUBLISHERS {
        publisher_ids.push(repository.publishers.create(name).await?.id);
    }

    for (id, title, author, publisher, borrowed) in BOOKS {
        repository
            .books
            .create(&NewBook {
                id,
                title: title.to_string(),
                author_id: author_ids[author],
                publisher_id: publisher_ids[publisher],
            })
            .await?;
        if borrowed {
            repository.books.set_borrowed(id, true).await?;
        }
    }

    tracing::info!(
        authors = AUTHORS.len(),
        publishers = PUBLISHERS.len(),
        books = BOOKS.len(),
        "Demo catalog loaded"
    );
    Ok(true)
}
