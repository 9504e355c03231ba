// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Permissive cross-origin headers.
//!
//! Unlike `tower_http::cors::CorsLayer`, this never inspects the request:
//! both headers go on every response, rejections included. Pre-flight
//! `OPTIONS` requests are answered by [`preflight`], mounted per route
//! outside the auth middleware.

use axum::{
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderValue, StatusCode,
    },
    response::IntoResponse,
};
use tower::layer::util::Stack;
use tower_http::set_header::SetResponseHeaderLayer;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_HEADERS: &str = "Content-Type,Authorization";
pub const ALLOW_METHODS: &str = "GET,POST,PUT,DELETE,OPTIONS";

pub type CorsLayer = Stack<SetResponseHeaderLayer<HeaderValue>, SetResponseHeaderLayer<HeaderValue>>;

/// Layer that sets `Access-Control-Allow-Origin` and
/// `Access-Control-Allow-Headers`, overriding anything the inner service set.
pub fn layer() -> CorsLayer {
    Stack::new(
        SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ),
        SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOW_ORIGIN),
        ),
    )
}

/// Pre-flight answer: `204 No Content` plus the allowed methods. The origin
/// and header grants come from [`layer`].
pub async fn preflight() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::Request,
        routing::{get, options},
        Router,
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn headers_are_set_without_origin() {
        let app = Router::new().route("/", get(|| async { "ok" })).layer(layer());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            response.headers()[ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type,Authorization"
        );
    }

    #[tokio::test]
    async fn headers_are_set_on_errors() {
        let app = Router::new()
            .route("/", get(|| async { (StatusCode::FORBIDDEN, "no") }))
            .layer(layer());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn preflight_is_no_content_with_cors_grants() {
        let app = Router::new()
            .route("/", options(preflight))
            .layer(layer());

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_METHODS], ALLOW_METHODS);
    }
}
