//! Publisher API endpoints

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        publisher::{CreatePublisher, PublisherQuery},
        PublisherDto,
    },
    AppState,
};

use super::{JsonBody, PathParam, QueryParams};

#[utoipa::path(
    get,
    path = "/publishers",
    tag = "publishers",
    params(PublisherQuery),
    responses(
        (status = 200, description = "Publishers ordered by name", body = Vec<PublisherDto>)
    )
)]
pub async fn list_publishers(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PublisherQuery>,
) -> AppResult<Json<Vec<PublisherDto>>> {
    let publishers = state.services.publishers.list(query.name.as_deref()).await?;
    Ok(Json(publishers))
}

#[utoipa::path(
    get,
    path = "/publishers/{id}",
    tag = "publishers",
    params(("id" = i32, Path, description = "Publisher ID")),
    responses(
        (status = 200, description = "Publisher", body = PublisherDto),
        (status = 404, description = "Publisher not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_publisher(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<PublisherDto>> {
    let publisher = state.services.publishers.get(id).await?;
    Ok(Json(publisher))
}

#[utoipa::path(
    post,
    path = "/publishers",
    tag = "publishers",
    request_body = CreatePublisher,
    responses(
        (status = 201, description = "Publisher created", body = PublisherDto),
        (status = 400, description = "Invalid publisher data", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_publisher(
    State(state): State<AppState>,
    JsonBody(data): JsonBody<CreatePublisher>,
) -> AppResult<impl IntoResponse> {
    let publisher = state.services.publishers.create(&data).await?;
    let location = format!("/api/publishers/{}", publisher.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(publisher)))
}

#[utoipa::path(
    delete,
    path = "/publishers/{id}",
    tag = "publishers",
    params(("id" = i32, Path, description = "Publisher ID")),
    responses(
        (status = 204, description = "Publisher deleted"),
        (status = 400, description = "Publisher still has books", body = crate::error::ErrorResponse),
        (status = 404, description = "Publisher not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_publisher(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> AppResult<StatusCode> {
    state.services.publishers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
