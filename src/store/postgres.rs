// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Postgres-backed movie store.
//!
//! Expects a `movies` table:
//!
//! ```sql
//! CREATE TABLE movies (
//!     id           BIGSERIAL PRIMARY KEY,
//!     title        TEXT NOT NULL,
//!     description  TEXT NOT NULL DEFAULT '',
//!     year         INTEGER NOT NULL,
//!     release_date DATE NOT NULL,
//!     runtime      INTEGER NOT NULL,
//!     rating       INTEGER NOT NULL,
//!     mpaa_rating  TEXT NOT NULL DEFAULT '',
//!     created_at   TIMESTAMPTZ NOT NULL DEFAULT now(),
//!     updated_at   TIMESTAMPTZ NOT NULL DEFAULT now()
//! );
//! ```

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use super::{MovieStore, StoreError};
use crate::models::{Movie, MovieInput};

const MOVIE_COLUMNS: &str = "id, title, description, year, release_date, runtime, rating, mpaa_rating, created_at, updated_at";

pub struct PgMovieStore {
    pool: PgPool,
}

impl PgMovieStore {
    /// Open a pool and ping it. Both steps share `timeout`.
    pub async fn connect(dsn: &str, timeout: Duration) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(timeout)
            .connect(dsn)
            .await?;

        let store = Self { pool };
        store.ping().await?;
        Ok(store)
    }
}

#[async_trait]
impl MovieStore for PgMovieStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Movie>, StoreError> {
        let rows = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get(&self, id: i64) -> Result<Movie, StoreError> {
        sqlx::query_as::<_, Movie>(&format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, input: MovieInput) -> Result<Movie, StoreError> {
        let row = sqlx::query_as::<_, Movie>(&format!(
            r#"
            INSERT INTO movies (title, description, year, release_date, runtime, rating, mpaa_rating)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {MOVIE_COLUMNS}
            "#
        ))
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.year)
        .bind(input.release_date)
        .bind(input.runtime)
        .bind(input.rating)
        .bind(&input.mpaa_rating)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: i64, input: MovieInput) -> Result<Movie, StoreError> {
        sqlx::query_as::<_, Movie>(&format!(
            r#"
            UPDATE movies
            SET title = $2, description = $3, year = $4, release_date = $5,
                runtime = $6, rating = $7, mpaa_rating = $8, updated_at = now()
            WHERE id = $1
            RETURNING {MOVIE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.year)
        .bind(input.release_date)
        .bind(input.runtime)
        .bind(input.rating)
        .bind(&input.mpaa_rating)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
