// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Movie endpoints.
//!
//! Reads are public (a presented token is still validated); writes live
//! under `/v1/admin` and require a principal.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::{Auth, OptionalAuth};
use crate::error::ApiError;
use crate::models::{MovieEnvelope, MovieInput, MoviesEnvelope, OkResponse};
use crate::state::AppState;

/// List every movie.
#[utoipa::path(
    get,
    path = "/v1/movies",
    tag = "Movies",
    responses(
        (status = 200, description = "All movies", body = MoviesEnvelope),
        (status = 403, description = "A token was presented but rejected")
    )
)]
pub async fn list_movies(
    OptionalAuth(principal): OptionalAuth,
    State(state): State<AppState>,
) -> Result<Json<MoviesEnvelope>, ApiError> {
    let movies = state.movies.list().await?;
    tracing::debug!(
        user_id = principal.map(|p| p.user_id),
        count = movies.len(),
        "listed movies"
    );
    Ok(Json(MoviesEnvelope { movies }))
}

/// Fetch one movie.
#[utoipa::path(
    get,
    path = "/v1/movies/{id}",
    tag = "Movies",
    params(("id" = i64, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "The movie", body = MovieEnvelope),
        (status = 404, description = "No such movie")
    )
)]
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MovieEnvelope>, ApiError> {
    let movie = state.movies.get(id).await?;
    Ok(Json(MovieEnvelope { movie }))
}

/// Add a movie.
#[utoipa::path(
    post,
    path = "/v1/admin/movies",
    tag = "Movies",
    security(("bearer" = [])),
    request_body = MovieInput,
    responses(
        (status = 201, description = "Created", body = MovieEnvelope),
        (status = 401, description = "Missing or malformed Authorization header"),
        (status = 403, description = "Token rejected"),
        (status = 422, description = "Invalid movie")
    )
)]
pub async fn create_movie(
    Auth(principal): Auth,
    State(state): State<AppState>,
    Json(input): Json<MovieInput>,
) -> Result<(StatusCode, Json<MovieEnvelope>), ApiError> {
    input.validate().map_err(ApiError::unprocessable)?;

    let movie = state.movies.create(input).await?;
    tracing::info!(user_id = principal.user_id, movie_id = movie.id, "movie created");
    Ok((StatusCode::CREATED, Json(MovieEnvelope { movie })))
}

/// Replace a movie.
#[utoipa::path(
    put,
    path = "/v1/admin/movies/{id}",
    tag = "Movies",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Movie ID")),
    request_body = MovieInput,
    responses(
        (status = 200, description = "Updated", body = MovieEnvelope),
        (status = 401, description = "Missing or malformed Authorization header"),
        (status = 403, description = "Token rejected"),
        (status = 404, description = "No such movie"),
        (status = 422, description = "Invalid movie")
    )
)]
pub async fn update_movie(
    Auth(principal): Auth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<MovieInput>,
) -> Result<Json<MovieEnvelope>, ApiError> {
    input.validate().map_err(ApiError::unprocessable)?;

    let movie = state.movies.update(id, input).await?;
    tracing::info!(user_id = principal.user_id, movie_id = id, "movie updated");
    Ok(Json(MovieEnvelope { movie }))
}

/// Remove a movie.
#[utoipa::path(
    delete,
    path = "/v1/admin/movies/{id}",
    tag = "Movies",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Deleted", body = OkResponse),
        (status = 401, description = "Missing or malformed Authorization header"),
        (status = 403, description = "Token rejected"),
        (status = 404, description = "No such movie")
    )
)]
pub async fn delete_movie(
    Auth(principal): Auth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OkResponse>, ApiError> {
    state.movies.delete(id).await?;
    tracing::info!(user_id = principal.user_id, movie_id = id, "movie deleted");
    Ok(Json(OkResponse { ok: true }))
}
