// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Why a token failed cryptographic verification or claim decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// Token is not a three-part JWS compact serialization with a readable header
    #[error("token is malformed")]
    Malformed,
    /// Header names an algorithm outside the HMAC family
    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),
    /// HMAC does not match the shared secret
    #[error("token signature is invalid")]
    InvalidSignature,
    /// Signature is valid but the payload is not a usable claim set
    #[error("token claims are invalid: {0}")]
    InvalidClaims(String),
}

/// Rejections produced by the bearer-token pipeline.
///
/// The first failing check wins; none of these are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Header is absent, empty, not visible ASCII, or not two space-separated parts
    #[error("invalid auth header")]
    InvalidAuthHeader,
    /// Header has two parts but the scheme is not `Bearer`
    #[error("unauthorized - no bearer token")]
    MissingBearerScheme,
    /// Signature or decoding failure
    #[error("unauthorized - failed HMAC check")]
    VerificationFailure(#[source] VerificationError),
    /// Token is outside its `nbf`..`exp` window
    #[error("unauthorized - token expired")]
    TokenExpired,
    /// Audience set does not contain this service
    #[error("unauthorized - invalid audience")]
    InvalidAudience,
    /// Issuer is not this service
    #[error("unauthorized - invalid issuer")]
    InvalidIssuer,
    /// Subject is not a base-10 64-bit integer
    #[error("unauthorized - no user ID")]
    MissingUserId,
    /// A handler asked for a principal that the middleware never attached
    #[error("authentication required")]
    Unauthenticated,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: bool,
    message: String,
    error_code: &'static str,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::MissingBearerScheme => "missing_bearer_scheme",
            AuthError::VerificationFailure(_) => "verification_failure",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidAudience => "invalid_audience",
            AuthError::InvalidIssuer => "invalid_issuer",
            AuthError::MissingUserId => "missing_user_id",
            AuthError::Unauthenticated => "unauthenticated",
        }
    }

    /// Get the HTTP status code for this error.
    ///
    /// Header problems keep the default 401; anything past the header
    /// (a token was presented but refused) is 403.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidAuthHeader
            | AuthError::MissingBearerScheme
            | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::VerificationFailure(_)
            | AuthError::TokenExpired
            | AuthError::InvalidAudience
            | AuthError::InvalidIssuer
            | AuthError::MissingUserId => StatusCode::FORBIDDEN,
        }
    }
}

impl From<VerificationError> for AuthError {
    fn from(err: VerificationError) -> Self {
        AuthError::VerificationFailure(err)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: true,
            message: self.to_string(),
            error_code: self.error_code(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn invalid_header_returns_401_envelope() {
        let response = AuthError::InvalidAuthHeader.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error"], true);
        assert_eq!(body["message"], "invalid auth header");
        assert_eq!(body["error_code"], "invalid_auth_header");
    }

    #[test]
    fn token_rejections_are_forbidden() {
        let rejections = [
            AuthError::VerificationFailure(VerificationError::InvalidSignature),
            AuthError::TokenExpired,
            AuthError::InvalidAudience,
            AuthError::InvalidIssuer,
            AuthError::MissingUserId,
        ];
        for err in rejections {
            assert_eq!(err.status_code(), StatusCode::FORBIDDEN, "{err:?}");
        }
        assert_eq!(
            AuthError::MissingBearerScheme.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn verification_detail_stays_out_of_the_message() {
        let err: AuthError = VerificationError::InvalidClaims("sub: invalid type".into()).into();
        assert_eq!(err.to_string(), "unauthorized - failed HMAC check");
        assert_eq!(err.error_code(), "verification_failure");
    }
}
