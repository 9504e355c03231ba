// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated principal representation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::VerificationError;

/// `aud` may be a single string or an array of strings (RFC 7519 §4.1.3).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AudienceClaim {
    One(String),
    Many(Vec<String>),
}

/// Claim set as it appears on the wire.
///
/// Only the registered claims this service reads are declared; anything
/// else in the payload is ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct RawClaims {
    #[serde(default)]
    sub: String,
    #[serde(default)]
    iss: String,
    #[serde(default)]
    aud: Option<AudienceClaim>,
    /// NumericDate values may carry a fractional part
    #[serde(default)]
    exp: Option<f64>,
    #[serde(default)]
    nbf: Option<f64>,
    #[serde(default)]
    iat: Option<f64>,
}

/// Verified claims carried by a bearer token.
///
/// Produced only by [`super::verifier::verify`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (principal identifier, decimal)
    pub subject: String,
    /// Issuer
    pub issuer: String,
    /// Intended recipients
    pub audience: Vec<String>,
    /// Expiration; `None` means unbounded
    pub expires_at: Option<DateTime<Utc>>,
    /// Not before; `None` means valid immediately
    pub not_before: Option<DateTime<Utc>>,
    pub issued_at: Option<DateTime<Utc>>,
}

fn numeric_date(name: &str, value: Option<f64>) -> Result<Option<DateTime<Utc>>, VerificationError> {
    let Some(secs) = value else {
        return Ok(None);
    };
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9) as u32;
    // Float-to-int casts saturate; from_timestamp rejects anything chrono cannot hold.
    DateTime::from_timestamp(whole as i64, nanos)
        .map(Some)
        .ok_or_else(|| VerificationError::InvalidClaims(format!("{name} is out of range")))
}

impl TryFrom<RawClaims> for Claims {
    type Error = VerificationError;

    fn try_from(raw: RawClaims) -> Result<Self, Self::Error> {
        let audience = match raw.aud {
            Some(AudienceClaim::One(aud)) => vec![aud],
            Some(AudienceClaim::Many(aud)) => aud,
            None => Vec::new(),
        };

        Ok(Self {
            subject: raw.sub,
            issuer: raw.iss,
            audience,
            expires_at: numeric_date("exp", raw.exp)?,
            not_before: numeric_date("nbf", raw.nbf)?,
            issued_at: numeric_date("iat", raw.iat)?,
        })
    }
}

impl Claims {
    /// Check `not_before <= now <= expires_at`, widened by `leeway` on both ends.
    pub fn valid_at(&self, now: DateTime<Utc>, leeway: Duration) -> bool {
        if let Some(exp) = self.expires_at {
            if now - leeway > exp {
                return false;
            }
        }
        if let Some(nbf) = self.not_before {
            if now + leeway < nbf {
                return false;
            }
        }
        true
    }

    /// Check whether `audience` is one of the token's intended recipients.
    pub fn accepts_audience(&self, audience: &str) -> bool {
        self.audience.iter().any(|aud| aud == audience)
    }

    /// Parse the subject as a base-10 `i64`.
    pub fn user_id(&self) -> Option<i64> {
        self.subject.parse().ok()
    }
}

/// Identity attached to a request once its token passed every check.
///
/// This is the primary type handlers use to represent the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedPrincipal {
    /// Numeric user ID taken from the `sub` claim
    pub user_id: i64,
}
