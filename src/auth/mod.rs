// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer-token authentication for the movies API.
//!
//! ## Auth Flow
//!
//! 1. The client sends `Authorization: Bearer <JWT>`
//! 2. The middleware:
//!    - Checks the header shape and the `Bearer` scheme
//!    - Verifies the HMAC signature with the shared secret
//!    - Checks `nbf`/`exp`, then audience, then issuer
//!    - Parses `sub` as the numeric `user_id`
//! 3. Handlers read the result through the `Auth` / `OptionalAuth` extractors
//!
//! ## Security
//!
//! - Only HS256, HS384 and HS512 are accepted
//! - The shared secret, issuer and audience are fixed at startup
//! - Routes opt into anonymous access explicitly (`AuthGate::optional`)

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod verifier;

pub use claims::{AuthenticatedPrincipal, Claims};
pub use error::{AuthError, VerificationError};
pub use extractor::{Auth, OptionalAuth};
pub use middleware::{authenticate, AuthConfig, AuthGate};
pub use verifier::verify;
