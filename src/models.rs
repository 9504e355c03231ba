// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API. All types derive `Serialize` and `ToSchema` for JSON
//! handling and OpenAPI documentation.
//!
//! ## Model Categories
//!
//! - **Movies**: catalogue records and write requests
//! - **Envelopes**: the `{"movie": ...}` / `{"movies": [...]}` wrappers
//! - **Status**: service metadata returned by `/status`

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Movie Models
// =============================================================================

/// A movie in the catalogue.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, sqlx::FromRow)]
pub struct Movie {
    /// Unique identifier assigned by the store.
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Release year.
    pub year: i32,
    pub release_date: NaiveDate,
    /// Running time in minutes.
    pub runtime: i32,
    /// Rating from 1 to 5.
    pub rating: i32,
    /// MPAA certificate (e.g. `PG-13`).
    pub mpaa_rating: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or replacing a movie.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MovieInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub year: i32,
    pub release_date: NaiveDate,
    pub runtime: i32,
    pub rating: i32,
    #[serde(default)]
    pub mpaa_rating: String,
}

impl MovieInput {
    /// Check the fields a client can get wrong.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title must not be blank".to_string());
        }
        if self.runtime < 0 {
            return Err("runtime must not be negative".to_string());
        }
        if !(0..=5).contains(&self.rating) {
            return Err("rating must be between 0 and 5".to_string());
        }
        Ok(())
    }

    /// Materialize a stored record.
    pub fn into_movie(self, id: i64, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Movie {
        Movie {
            id,
            title: self.title,
            description: self.description,
            year: self.year,
            release_date: self.release_date,
            runtime: self.runtime,
            rating: self.rating,
            mpaa_rating: self.mpaa_rating,
            created_at,
            updated_at,
        }
    }
}

// =============================================================================
// Envelopes
// =============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct MovieEnvelope {
    pub movie: Movie,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MoviesEnvelope {
    pub movies: Vec<Movie>,
}

/// Acknowledgement for writes that return no record.
#[derive(Debug, Serialize, ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

// =============================================================================
// Status
// =============================================================================

/// Service metadata.
#[derive(Debug, Serialize, ToSchema)]
pub struct AppStatus {
    pub status: String,
    pub environment: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> MovieInput {
        MovieInput {
            title: "The Godfather".to_string(),
            description: "Crime drama".to_string(),
            year: 1972,
            release_date: NaiveDate::from_ymd_opt(1972, 3, 24).unwrap(),
            runtime: 175,
            rating: 5,
            mpaa_rating: "R".to_string(),
        }
    }

    #[test]
    fn validate_accepts_complete_input() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_title_and_bad_numbers() {
        let mut blank = input();
        blank.title = "   ".to_string();
        assert!(blank.validate().is_err());

        let mut negative = input();
        negative.runtime = -1;
        assert!(negative.validate().is_err());

        let mut rating = input();
        rating.rating = 6;
        assert!(rating.validate().is_err());
    }

    #[test]
    fn movie_input_defaults_optional_text() {
        let json = r#"{"title":"Jaws","year":1975,"release_date":"1975-06-20","runtime":124,"rating":4}"#;
        let parsed: MovieInput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.description, "");
        assert_eq!(parsed.mpaa_rating, "");
    }

    #[test]
    fn envelope_wraps_movie() {
        let now = Utc::now();
        let body = serde_json::to_value(MovieEnvelope {
            movie: input().into_movie(7, now, now),
        })
        .unwrap();
        assert_eq!(body["movie"]["id"], 7);
        assert_eq!(body["movie"]["release_date"], "1972-03-24");
    }
}
