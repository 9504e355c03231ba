// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Every setting can be given as a command-line flag or an environment
//! variable. Configuration is loaded once at startup and never changes.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `4000` |
//! | `APP_ENV` | `development` or `production` | `development` |
//! | `DATABASE_URL` | Postgres connection string | Required for production |
//! | `JWT_SECRET` | Shared HMAC secret for bearer tokens | Required |
//! | `AUTH_ISSUER` | Expected JWT issuer claim | `mydomain.com` |
//! | `AUTH_AUDIENCE` | Expected JWT audience claim | `mydomain.com` |
//! | `AUTH_LEEWAY_SECONDS` | Clock skew tolerance for `exp`/`nbf` | `0` |
//! | `IDLE_TIMEOUT_SECS` | Keep-alive idle limit | `60` |
//! | `READ_TIMEOUT_SECS` | Request body read limit | `10` |
//! | `WRITE_TIMEOUT_SECS` | Response deadline | `30` |
//! | `DB_TIMEOUT_SECS` | Startup connect + ping limit | `5` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use thiserror::Error;

use crate::auth::middleware::DEFAULT_SERVICE_DOMAIN;
use crate::auth::AuthConfig;
use crate::server::ServerTimeouts;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const APP_ENV_ENV: &str = "APP_ENV";
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
/// Must match the secret used wherever tokens are issued.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const AUTH_ISSUER_ENV: &str = "AUTH_ISSUER";
pub const AUTH_AUDIENCE_ENV: &str = "AUTH_AUDIENCE";
pub const AUTH_LEEWAY_ENV: &str = "AUTH_LEEWAY_SECONDS";
pub const IDLE_TIMEOUT_ENV: &str = "IDLE_TIMEOUT_SECS";
pub const READ_TIMEOUT_ENV: &str = "READ_TIMEOUT_SECS";
pub const WRITE_TIMEOUT_ENV: &str = "WRITE_TIMEOUT_SECS";
pub const DB_TIMEOUT_ENV: &str = "DB_TIMEOUT_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppEnv::Development => "development",
            AppEnv::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, AppEnv::Production)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Clone, Parser)]
#[command(name = "movies-api", version, about = "Movies API guarded by HMAC bearer tokens")]
pub struct Config {
    /// Address to bind
    #[arg(long, env = HOST_ENV, default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Server port to listen on
    #[arg(long, env = PORT_ENV, default_value_t = 4000)]
    pub port: u16,

    /// Application environment
    #[arg(long = "env", env = APP_ENV_ENV, value_enum, default_value_t = AppEnv::Development)]
    pub app_env: AppEnv,

    /// Postgres connection string; omitted means an in-memory store
    #[arg(long, env = DATABASE_URL_ENV, hide_env_values = true)]
    pub dsn: Option<String>,

    /// Shared HMAC secret used to verify bearer tokens
    #[arg(long, env = JWT_SECRET_ENV, hide_env_values = true)]
    pub jwt_secret: String,

    /// Expected token issuer
    #[arg(long, env = AUTH_ISSUER_ENV, default_value = DEFAULT_SERVICE_DOMAIN)]
    pub auth_issuer: String,

    /// Audience this service must find in every token
    #[arg(long, env = AUTH_AUDIENCE_ENV, default_value = DEFAULT_SERVICE_DOMAIN)]
    pub auth_audience: String,

    #[arg(long, env = AUTH_LEEWAY_ENV, default_value_t = 0)]
    pub auth_leeway_seconds: u32,

    #[arg(long, env = IDLE_TIMEOUT_ENV, default_value_t = 60)]
    pub idle_timeout_secs: u64,

    #[arg(long, env = READ_TIMEOUT_ENV, default_value_t = 10)]
    pub read_timeout_secs: u64,

    #[arg(long, env = WRITE_TIMEOUT_ENV, default_value_t = 30)]
    pub write_timeout_secs: u64,

    #[arg(long, env = DB_TIMEOUT_ENV, default_value_t = 5)]
    pub db_timeout_secs: u64,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr())
            .field("app_env", &self.app_env)
            .field("dsn", &self.dsn.as_ref().map(|_| "<redacted>"))
            .field("auth_issuer", &self.auth_issuer)
            .field("auth_audience", &self.auth_audience)
            .field("auth_leeway_seconds", &self.auth_leeway_seconds)
            .field("timeouts", &self.timeouts())
            .field("log_format", &self.log_format)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Parse flags and environment, then validate. Exits on parse errors.
    pub fn load() -> Result<Self, ConfigError> {
        Self::parse().validate()
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::Invalid(JWT_SECRET_ENV));
        }
        if self.app_env.is_production() && self.dsn.is_none() {
            return Err(ConfigError::Missing(DATABASE_URL_ENV));
        }
        if self.idle_timeout_secs == 0 || self.read_timeout_secs == 0 || self.write_timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeouts must be positive"));
        }
        Ok(self)
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig::new(
            self.jwt_secret.as_bytes(),
            self.auth_issuer.as_str(),
            self.auth_audience.as_str(),
        )
        .with_leeway(chrono::Duration::seconds(i64::from(self.auth_leeway_seconds)))
    }

    pub fn timeouts(&self) -> ServerTimeouts {
        ServerTimeouts {
            idle: Duration::from_secs(self.idle_timeout_secs),
            read: Duration::from_secs(self.read_timeout_secs),
            write: Duration::from_secs(self.write_timeout_secs),
        }
    }

    pub fn db_timeout(&self) -> Duration {
        Duration::from_secs(self.db_timeout_secs)
    }
}
