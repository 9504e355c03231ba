// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Movies API - bearer-token guarded resource service
//!
//! Every request passes through CORS header injection, then (on movie
//! routes) the HMAC bearer-token middleware, then the handler.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and router composition (Axum)
//! - `auth` - Token verification, middleware and extractors
//! - `config` - Command-line flags and environment variables
//! - `cors` - Cross-origin response headers and pre-flight answers
//! - `error` - API error responses
//! - `logging` - Tracing subscriber setup
//! - `models` - Movie records and response envelopes
//! - `server` - Listener, timeouts and graceful shutdown
//! - `state` - Shared application state
//! - `store` - Movie storage (in-memory and Postgres)

pub mod api;
pub mod auth;
pub mod config;
pub mod cors;
pub mod error;
pub mod logging;
pub mod models;
pub mod server;
pub mod state;
pub mod store;
