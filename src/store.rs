// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Movie storage.
//!
//! Handlers only see [`MovieStore`]. Development and tests run on
//! [`InMemoryMovieStore`]; deployments with a DSN use
//! [`postgres::PgMovieStore`].

pub mod postgres;

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::{Movie, MovieInput};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("movie not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// CRUD over movie records plus a liveness probe.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Confirm the backing store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// All movies, ordered by id.
    async fn list(&self) -> Result<Vec<Movie>, StoreError>;

    async fn get(&self, id: i64) -> Result<Movie, StoreError>;

    async fn create(&self, input: MovieInput) -> Result<Movie, StoreError>;

    /// Replace every writable field of an existing movie.
    async fn update(&self, id: i64, input: MovieInput) -> Result<Movie, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}

#[derive(Default)]
struct Inner {
    movies: BTreeMap<i64, Movie>,
    last_id: i64,
}

/// Process-local store. Ids are never reused.
#[derive(Default)]
pub struct InMemoryMovieStore {
    inner: RwLock<Inner>,
}

impl InMemoryMovieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MovieStore for InMemoryMovieStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Movie>, StoreError> {
        Ok(self.inner.read().await.movies.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Movie, StoreError> {
        self.inner
            .read()
            .await
            .movies
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, input: MovieInput) -> Result<Movie, StoreError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let id = inner.last_id;
        let now = Utc::now();
        let movie = input.into_movie(id, now, now);
        inner.movies.insert(id, movie.clone());
        Ok(movie)
    }

    async fn update(&self, id: i64, input: MovieInput) -> Result<Movie, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(existing) = inner.movies.get_mut(&id) else {
            return Err(StoreError::NotFound);
        };
        *existing = input.into_movie(id, existing.created_at, Utc::now());
        Ok(existing.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        if self.inner.write().await.movies.remove(&id).is_some() {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}
