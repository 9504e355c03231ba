// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{process::ExitCode, sync::Arc};

use movies_api::{
    api::router,
    config::Config,
    logging,
    server,
    state::AppState,
    store::{postgres::PgMovieStore, InMemoryMovieStore, MovieStore},
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    logging::init(config.log_format);
    tracing::info!(?config, "configuration loaded");

    // Initialize the movie store (fatal if the database is unreachable)
    let movies: Arc<dyn MovieStore> = match config.dsn.as_deref() {
        Some(dsn) => match PgMovieStore::connect(dsn, config.db_timeout()).await {
            Ok(store) => {
                tracing::info!("database connection pool established");
                Arc::new(store)
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot reach database");
                return ExitCode::FAILURE;
            }
        },
        None => {
            tracing::warn!("no DATABASE_URL configured, using in-memory movie store");
            Arc::new(InMemoryMovieStore::new())
        }
    };

    let state = AppState::new(movies, config.auth_config()).with_environment(config.app_env);
    let app = router(state, config.timeouts());

    if let Err(e) = server::serve(config.addr(), app, config.timeouts()).await {
        tracing::error!(error = %e, "server failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
