// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HMAC token verification.
//!
//! [`verify`] only answers "was this signed with our secret, and does the
//! payload decode". Temporal, audience, issuer and subject checks belong to
//! the middleware so that each failure maps to its own rejection.

use jsonwebtoken::{decode, decode_header, errors::ErrorKind, Algorithm, DecodingKey, Validation};

use super::claims::{Claims, RawClaims};
use super::error::VerificationError;

/// Signing algorithms accepted from the token header.
pub const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Verify `token` against the shared HMAC `secret` and decode its claims.
///
/// The signature is checked before the payload is deserialized, so a forged
/// token never reaches claim decoding.
pub fn verify(token: &str, secret: &[u8]) -> Result<Claims, VerificationError> {
    let header = decode_header(token).map_err(|_| VerificationError::Malformed)?;

    if !ACCEPTED_ALGORITHMS.contains(&header.alg) {
        return Err(VerificationError::UnsupportedAlgorithm(format!(
            "{:?}",
            header.alg
        )));
    }

    // Registered-claim validation is done by the caller, in a fixed order.
    let mut validation = Validation::new(header.alg);
    validation.required_spec_claims.clear();
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;

    let token_data = decode::<RawClaims>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => VerificationError::InvalidSignature,
            ErrorKind::InvalidAlgorithm => {
                VerificationError::UnsupportedAlgorithm(format!("{:?}", header.alg))
            }
            ErrorKind::Json(err) => VerificationError::InvalidClaims(err.to_string()),
            _ => VerificationError::Malformed,
        })?;

    Claims::try_from(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &[u8] = b"test-secret";

    fn sign(alg: Algorithm, claims: &serde_json::Value, secret: &[u8]) -> String {
        encode(&Header::new(alg), claims, &EncodingKey::from_secret(secret)).unwrap()
    }

    fn sample() -> serde_json::Value {
        json!({
            "sub": "42",
            "iss": "mydomain.com",
            "aud": ["mydomain.com"],
            "exp": 4_102_444_800_i64,
            "nbf": 1_600_000_000_i64,
        })
    }

    #[test]
    fn verifies_every_hmac_algorithm() {
        for alg in ACCEPTED_ALGORITHMS {
            let claims = verify(&sign(alg, &sample(), SECRET), SECRET).unwrap();
            assert_eq!(claims.subject, "42");
            assert_eq!(claims.issuer, "mydomain.com");
            assert_eq!(claims.audience, vec!["mydomain.com"]);
            assert_eq!(claims.expires_at.unwrap().timestamp(), 4_102_444_800);
            assert_eq!(claims.not_before.unwrap().timestamp(), 1_600_000_000);
        }
    }

    #[test]
    fn foreign_secret_is_invalid_signature() {
        let token = sign(Algorithm::HS256, &sample(), b"someone-elses-secret");
        assert_eq!(verify(&token, SECRET), Err(VerificationError::InvalidSignature));
    }

    #[test]
    fn tampered_payload_is_invalid_signature() {
        let token = sign(Algorithm::HS256, &sample(), SECRET);
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = URL_SAFE_NO_PAD.encode(br#"{"sub":"1","iss":"mydomain.com"}"#);
        parts[1] = &forged;
        assert_eq!(
            verify(&parts.join("."), SECRET),
            Err(VerificationError::InvalidSignature)
        );
    }

    #[test]
    fn garbage_is_malformed() {
        for token in ["", "not-a-jwt", "a.b", "!!!.???.***"] {
            assert_eq!(verify(token, SECRET), Err(VerificationError::Malformed), "{token:?}");
        }
    }

    #[test]
    fn non_hmac_header_is_rejected() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"42"}"#);
        let token = format!("{header}.{payload}.c2lnbmF0dXJl");
        assert!(matches!(
            verify(&token, SECRET),
            Err(VerificationError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn unsigned_header_is_malformed() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
        let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"42"}"#);
        let token = format!("{header}.{payload}.");
        assert_eq!(verify(&token, SECRET), Err(VerificationError::Malformed));
    }

    #[test]
    fn signed_payload_with_wrong_types_is_invalid_claims() {
        let token = sign(Algorithm::HS256, &json!({ "sub": { "id": 42 } }), SECRET);
        assert!(matches!(
            verify(&token, SECRET),
            Err(VerificationError::InvalidClaims(_))
        ));
    }

    #[test]
    fn expired_token_still_verifies() {
        let mut claims = sample();
        claims["exp"] = json!(1_000);
        let verified = verify(&sign(Algorithm::HS256, &claims, SECRET), SECRET).unwrap();
        assert_eq!(verified.expires_at.unwrap().timestamp(), 1_000);
    }

    #[test]
    fn verification_is_idempotent() {
        let token = sign(Algorithm::HS512, &sample(), SECRET);
        assert_eq!(verify(&token, SECRET).unwrap(), verify(&token, SECRET).unwrap());
    }
}
