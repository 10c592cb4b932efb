//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, health, publishers};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Manager API",
        version = "1.0.0",
        description = "Book catalog and loan tracking REST API",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/api", description = "Library API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::delete_author,
        // Publishers
        publishers::list_publishers,
        publishers::get_publisher,
        publishers::create_publisher,
        publishers::delete_publisher,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        books::borrow_book,
        books::return_book,
    ),
    components(
        schemas(
            crate::models::AuthorDto,
            crate::models::author::CreateAuthor,
            crate::models::PublisherDto,
            crate::models::publisher::CreatePublisher,
            crate::models::BookDto,
            crate::models::book::BookInput,
            crate::models::paging::BookPage,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "authors", description = "Author management"),
        (name = "publishers", description = "Publisher management"),
        (name = "books", description = "Book catalog"),
        (name = "loans", description = "Borrowing and returning books")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
