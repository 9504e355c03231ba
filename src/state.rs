// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::AuthConfig;
use crate::config::AppEnv;
use crate::store::{InMemoryMovieStore, MovieStore};

#[derive(Clone)]
pub struct AppState {
    pub movies: Arc<dyn MovieStore>,
    pub auth_config: Arc<AuthConfig>,
    pub environment: AppEnv,
}

impl AppState {
    pub fn new(movies: Arc<dyn MovieStore>, auth_config: AuthConfig) -> Self {
        Self {
            movies,
            auth_config: Arc::new(auth_config),
            environment: AppEnv::Development,
        }
    }

    pub fn with_environment(mut self, environment: AppEnv) -> Self {
        self.environment = environment;
        self
    }

    /// In-memory state for tests and local runs.
    pub fn in_memory(auth_config: AuthConfig) -> Self {
        Self::new(Arc::new(InMemoryMovieStore::new()), auth_config)
    }
}
