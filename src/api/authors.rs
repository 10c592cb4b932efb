//! Author API endpoints

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        author::{AuthorQuery, CreateAuthor},
        AuthorDto,
    },
    AppState,
};

use super::{JsonBody, PathParam, QueryParams};

/// List authors
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(AuthorQuery),
    responses(
        (status = 200, description = "Authors ordered by name", body = Vec<AuthorDto>)
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<AuthorQuery>,
) -> AppResult<Json<Vec<AuthorDto>>> {
    let authors = state.services.authors.list(query.name.as_deref()).await?;
    Ok(Json(authors))
}

/// Get author by ID
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author", body = AuthorDto),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<AuthorDto>> {
    let author = state.services.authors.get(id).await?;
    Ok(Json(author))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = AuthorDto),
        (status = 400, description = "Invalid author data", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    JsonBody(data): JsonBody<CreateAuthor>,
) -> AppResult<impl IntoResponse> {
    let author = state.services.authors.create(&data).await?;
    let location = format!("/api/authors/{}", author.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(author)))
}

/// Delete an author without books
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 400, description = "Author still has books", body = crate::error::ErrorResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> AppResult<StatusCode> {
    state.services.authors.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
