//! Book catalog and loan API endpoints

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book::{BookInput, BookQuery},
        paging::BookPage,
        BookDto,
    },
    AppState,
};

use super::{JsonBody, PathParam, QueryParams};

/// Search books with filters and pagination
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "One page of books ordered by title", body = BookPage),
        (status = 400, description = "Invalid paging parameters", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<BookQuery>,
) -> AppResult<Json<BookPage>> {
    let page = state.services.catalog.search(&query).await?;
    Ok(Json(page))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book with author and publisher", body = BookDto),
        (status = 400, description = "Invalid book id", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<BookDto>> {
    let book = state.services.catalog.get(id).await?;
    Ok(Json(book))
}

/// Add a book to the catalog
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = BookDto),
        (status = 400, description = "Invalid book data or unknown author/publisher", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    JsonBody(data): JsonBody<BookInput>,
) -> AppResult<impl IntoResponse> {
    let book = state.services.catalog.create(&data).await?;
    let location = format!("/api/books/{}", book.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(book)))
}

/// Update an available book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = Uuid, Path, description = "Book ID")),
    request_body = BookInput,
    responses(
        (status = 204, description = "Book updated"),
        (status = 400, description = "Invalid data or book is borrowed", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    JsonBody(data): JsonBody<BookInput>,
) -> AppResult<StatusCode> {
    state.services.catalog.update(id, &data).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete an available book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 400, description = "Book is borrowed", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/books/{id}/borrow",
    tag = "loans",
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book borrowed"),
        (status = 400, description = "Book is already borrowed", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn borrow_book(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<StatusCode> {
    state.services.loans.borrow(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/books/{id}/return",
    tag = "loans",
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book returned"),
        (status = 400, description = "Book is not borrowed", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<StatusCode> {
    state.services.loans.return_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
