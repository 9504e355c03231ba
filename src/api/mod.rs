// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, options, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::{RequestBodyTimeoutLayer, TimeoutLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{authenticate, AuthGate, AuthenticatedPrincipal},
    cors,
    models::{AppStatus, Movie, MovieEnvelope, MovieInput, MoviesEnvelope, OkResponse},
    server::ServerTimeouts,
    state::AppState,
};

pub mod health;
pub mod movies;

/// Build the full application.
///
/// Layer order, outermost first: request id, trace, CORS, write timeout,
/// read timeout. Auth is a route layer on each movie group, so it runs
/// inside CORS and only for matched routes. Pre-flight `OPTIONS` handlers
/// are added after the route layer and never see it.
pub fn router(state: AppState, timeouts: ServerTimeouts) -> Router {
    let public_movies = Router::new()
        .route("/movies", get(movies::list_movies))
        .route("/movies/{id}", get(movies::get_movie))
        .route_layer(from_fn_with_state(
            AuthGate::optional(state.auth_config.clone()),
            authenticate,
        ))
        .route("/movies", options(cors::preflight))
        .route("/movies/{id}", options(cors::preflight));

    let admin_movies = Router::new()
        .route("/movies", post(movies::create_movie))
        .route(
            "/movies/{id}",
            put(movies::update_movie).delete(movies::delete_movie),
        )
        .route_layer(from_fn_with_state(
            AuthGate::required(state.auth_config.clone()),
            authenticate,
        ))
        .route("/movies", options(cors::preflight))
        .route("/movies/{id}", options(cors::preflight));

    let v1_routes = Router::new()
        .merge(public_movies)
        .nest("/admin", admin_movies);

    let app = Router::new()
        .route("/status", get(health::status))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/v1", v1_routes)
        .with_state(state);

    Router::new()
        .merge(app)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors::layer())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    timeouts.write,
                ))
                .layer(RequestBodyTimeoutLayer::new(timeouts.read)),
        )
}

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::status,
        health::liveness,
        health::readiness,
        movies::list_movies,
        movies::get_movie,
        movies::create_movie,
        movies::update_movie,
        movies::delete_movie
    ),
    components(
        schemas(
            Movie,
            MovieInput,
            MovieEnvelope,
            MoviesEnvelope,
            OkResponse,
            AppStatus,
            AuthenticatedPrincipal
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "Movies", description = "Movie catalogue"),
        (name = "Health", description = "Status and probes")
    )
)]
struct ApiDoc;
