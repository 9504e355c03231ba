// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Mount it per route group with `from_fn_with_state`:
//!
//! ```rust,ignore
//! let admin = Router::new()
//!     .route("/movies", post(create_movie))
//!     .route_layer(axum::middleware::from_fn_with_state(
//!         AuthGate::required(auth_config.clone()),
//!         authenticate,
//!     ));
//! ```
//!
//! Checks run in a fixed order and the first failure is returned:
//! header shape, scheme, signature, validity window, audience, issuer,
//! subject.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, VARY},
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};

use super::verifier::verify;
use super::{AuthError, AuthenticatedPrincipal};

/// Expected issuer and audience when none are configured.
pub const DEFAULT_SERVICE_DOMAIN: &str = "mydomain.com";

/// Authentication configuration.
///
/// Built once at startup and shared read-only by every request.
#[derive(Clone)]
pub struct AuthConfig {
    /// Shared HMAC secret
    secret: Vec<u8>,
    /// Expected `iss`
    pub issuer: String,
    /// Value that must appear in `aud`
    pub audience: String,
    /// Clock skew tolerance applied to `exp` and `nbf`
    pub leeway: Duration,
}

impl AuthConfig {
    /// Create a new auth configuration with no clock skew tolerance.
    pub fn new(
        secret: impl Into<Vec<u8>>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            leeway: Duration::zero(),
        }
    }

    /// Set the clock skew tolerance.
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("leeway", &self.leeway)
            .finish()
    }
}

/// Middleware state: the shared config plus the route group's access policy.
#[derive(Debug, Clone)]
pub struct AuthGate {
    config: Arc<AuthConfig>,
    requires_auth: bool,
}

impl AuthGate {
    pub fn new(config: Arc<AuthConfig>, requires_auth: bool) -> Self {
        Self {
            config,
            requires_auth,
        }
    }

    /// Every request must present a valid token.
    pub fn required(config: Arc<AuthConfig>) -> Self {
        Self::new(config, true)
    }

    /// Requests without a token pass through anonymously; a presented token
    /// must still be valid.
    pub fn optional(config: Arc<AuthConfig>) -> Self {
        Self::new(config, false)
    }

    pub fn requires_auth(&self) -> bool {
        self.requires_auth
    }

    /// Decide whether a request with these headers may proceed.
    ///
    /// `Ok(None)` means anonymous access on a route that allows it.
    pub fn admit(
        &self,
        headers: &HeaderMap,
        now: DateTime<Utc>,
    ) -> Result<Option<AuthenticatedPrincipal>, AuthError> {
        let header = match headers.get(AUTHORIZATION) {
            Some(value) => value.to_str().map_err(|_| AuthError::InvalidAuthHeader)?,
            None => "",
        };

        if header.is_empty() && !self.requires_auth {
            return Ok(None);
        }

        let token = bearer_token(header)?;
        authorize(token, &self.config, now).map(Some)
    }
}

/// Split `Bearer <token>` on single spaces.
///
/// Exactly two parts are required, so doubled spaces, trailing spaces and
/// an empty header are all rejected as malformed.
pub fn bearer_token(header: &str) -> Result<&str, AuthError> {
    let mut parts = header.split(' ');
    let (Some(scheme), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(AuthError::InvalidAuthHeader);
    };

    if scheme != "Bearer" {
        return Err(AuthError::MissingBearerScheme);
    }

    Ok(token)
}

/// Verify `token` and run the claim checks in order.
pub fn authorize(
    token: &str,
    config: &AuthConfig,
    now: DateTime<Utc>,
) -> Result<AuthenticatedPrincipal, AuthError> {
    let claims = verify(token, config.secret())?;

    if !claims.valid_at(now, config.leeway) {
        return Err(AuthError::TokenExpired);
    }

    if !claims.accepts_audience(&config.audience) {
        return Err(AuthError::InvalidAudience);
    }

    if claims.issuer != config.issuer {
        return Err(AuthError::InvalidIssuer);
    }

    let user_id = claims.user_id().ok_or(AuthError::MissingUserId)?;

    Ok(AuthenticatedPrincipal { user_id })
}

/// Authentication middleware function.
///
/// On success the [`AuthenticatedPrincipal`] is inserted into the request
/// extensions. Every response leaving this layer carries
/// `Vary: Authorization`.
pub async fn authenticate(
    State(gate): State<AuthGate>,
    mut request: Request,
    next: Next,
) -> Response {
    let mut response = match gate.admit(request.headers(), Utc::now()) {
        Ok(Some(principal)) => {
            tracing::debug!(user_id = principal.user_id, "valid user");
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Ok(None) => next.run(request).await,
        Err(err) => {
            tracing::info!(
                error_code = err.error_code(),
                path = %request.uri().path(),
                "rejected bearer token"
            );
            err.into_response()
        }
    };

    response
        .headers_mut()
        .append(VARY, HeaderValue::from_static("Authorization"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::VerificationError;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &[u8] = b"middleware-secret";

    fn config() -> Arc<AuthConfig> {
        Arc::new(AuthConfig::new(SECRET, "mydomain.com", "mydomain.com"))
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn valid_claims() -> serde_json::Value {
        json!({
            "sub": "42",
            "iss": "mydomain.com",
            "aud": ["mydomain.com"],
            "nbf": 1_699_990_000_i64,
            "exp": 1_700_010_000_i64,
        })
    }

    fn token(claims: &serde_json::Value) -> String {
        encode(&Header::default(), claims, &EncodingKey::from_secret(SECRET)).unwrap()
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn auth_config_debug_redacts_secret() {
        let rendered = format!("{:?}", config());
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("middleware-secret"));
    }

    #[test]
    fn bearer_token_requires_exactly_two_parts() {
        assert_eq!(bearer_token("Bearer abc"), Ok("abc"));
        for header in ["", "Bearer", "weird-format-no-bearer", "Bearer  abc", "Bearer abc ", "Bearer a b"] {
            assert_eq!(bearer_token(header), Err(AuthError::InvalidAuthHeader), "{header:?}");
        }
    }

    #[test]
    fn bearer_token_scheme_is_case_sensitive() {
        assert_eq!(bearer_token("Basic xyz"), Err(AuthError::MissingBearerScheme));
        assert_eq!(bearer_token("bearer xyz"), Err(AuthError::MissingBearerScheme));
    }

    #[test]
    fn authorize_accepts_valid_token() {
        let principal = authorize(&token(&valid_claims()), &config(), now()).unwrap();
        assert_eq!(principal.user_id, 42);
    }

    #[test]
    fn signature_is_checked_before_claims() {
        // Everything about this token is wrong; only the signature failure is reported.
        let forged = encode(
            &Header::default(),
            &json!({ "sub": "x", "iss": "evil", "aud": "evil", "exp": 1 }),
            &EncodingKey::from_secret(b"other"),
        )
        .unwrap();
        assert_eq!(
            authorize(&forged, &config(), now()),
            Err(AuthError::VerificationFailure(VerificationError::InvalidSignature))
        );
    }

    #[test]
    fn expiry_is_checked_before_audience_and_issuer() {
        let mut claims = valid_claims();
        claims["exp"] = json!(1_600_000_000_i64);
        claims["aud"] = json!("elsewhere");
        claims["iss"] = json!("elsewhere");
        assert_eq!(
            authorize(&token(&claims), &config(), now()),
            Err(AuthError::TokenExpired)
        );
    }

    #[test]
    fn not_yet_valid_is_reported_as_expired() {
        let mut claims = valid_claims();
        claims["nbf"] = json!(1_800_000_000_i64);
        assert_eq!(
            authorize(&token(&claims), &config(), now()),
            Err(AuthError::TokenExpired)
        );
    }

    #[test]
    fn audience_is_checked_before_issuer() {
        let mut claims = valid_claims();
        claims["aud"] = json!(["elsewhere"]);
        claims["iss"] = json!("elsewhere");
        assert_eq!(
            authorize(&token(&claims), &config(), now()),
            Err(AuthError::InvalidAudience)
        );
    }

    #[test]
    fn missing_audience_is_rejected() {
        let mut claims = valid_claims();
        claims.as_object_mut().unwrap().remove("aud");
        assert_eq!(
            authorize(&token(&claims), &config(), now()),
            Err(AuthError::InvalidAudience)
        );
    }

    #[test]
    fn issuer_must_match_exactly() {
        let mut claims = valid_claims();
        claims["iss"] = json!("mydomain.com.evil");
        assert_eq!(
            authorize(&token(&claims), &config(), now()),
            Err(AuthError::InvalidIssuer)
        );
    }

    #[test]
    fn non_numeric_subject_is_missing_user_id() {
        let mut claims = valid_claims();
        claims["sub"] = json!("user_42");
        assert_eq!(
            authorize(&token(&claims), &config(), now()),
            Err(AuthError::MissingUserId)
        );
    }

    #[test]
    fn leeway_admits_recently_expired_token() {
        let mut claims = valid_claims();
        claims["exp"] = json!(1_699_999_990_i64);
        let strict = config();
        let lenient = AuthConfig::new(SECRET, "mydomain.com", "mydomain.com")
            .with_leeway(Duration::seconds(30));

        assert_eq!(authorize(&token(&claims), &strict, now()), Err(AuthError::TokenExpired));
        assert!(authorize(&token(&claims), &lenient, now()).is_ok());
    }

    #[test]
    fn required_gate_rejects_missing_header() {
        let gate = AuthGate::required(config());
        assert_eq!(gate.admit(&HeaderMap::new(), now()), Err(AuthError::InvalidAuthHeader));
        assert_eq!(gate.admit(&headers(""), now()), Err(AuthError::InvalidAuthHeader));
    }

    #[test]
    fn optional_gate_admits_anonymous() {
        let gate = AuthGate::optional(config());
        assert_eq!(gate.admit(&HeaderMap::new(), now()), Ok(None));
        assert_eq!(gate.admit(&headers(""), now()), Ok(None));
    }

    #[test]
    fn optional_gate_still_validates_presented_tokens() {
        let gate = AuthGate::optional(config());
        assert_eq!(
            gate.admit(&headers("Basic xyz"), now()),
            Err(AuthError::MissingBearerScheme)
        );

        let bearer = format!("Bearer {}", token(&valid_claims()));
        assert_eq!(
            gate.admit(&headers(&bearer), now()),
            Ok(Some(AuthenticatedPrincipal { user_id: 42 }))
        );
    }

    #[test]
    fn opaque_header_bytes_are_invalid() {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap());
        let gate = AuthGate::required(config());
        assert_eq!(gate.admit(&map, now()), Err(AuthError::InvalidAuthHeader));
    }
}
