//! Trait definition and types for metadata providers.
//!
//! This module defines the [`MetadataProvider`] trait the resolver queries,
//! along with the shared data types returned by provider searches.

use async_trait::async_trait;
use kourai_common::Result;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Search results
// ---------------------------------------------------------------------------

/// A single movie or series returned from a catalog search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Catalog identifier.
    pub id: u64,
    /// Movie title or series name.
    pub title: String,
    /// Release or first-air year, if known.
    pub year: Option<u16>,
    /// ISO-3166-1 origin country codes (series searches only).
    pub countries: Vec<String>,
    /// Catalog popularity score.
    pub popularity: Option<f64>,
}

impl Candidate {
    /// Convenience constructor used by providers and tests.
    pub fn new(id: u64, title: impl Into<String>, year: Option<u16>) -> Self {
        Self {
            id,
            title: title.into(),
            year,
            countries: Vec::new(),
            popularity: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Episodes
// ---------------------------------------------------------------------------

/// Details of a single episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeDetails {
    /// Episode title.
    pub name: String,
    /// Synopsis.
    pub overview: Option<String>,
    /// Air date as `YYYY-MM-DD`.
    pub air_date: Option<String>,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Async trait the metadata resolver queries.
///
/// Searches return the first page of results in provider order; an empty
/// result set is an [`Error::NotFound`](kourai_common::Error::NotFound).
/// Providers are shared across tasks behind an `Arc`.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Short, lowercase identifier for this provider (e.g. `"tmdb"`).
    fn name(&self) -> &'static str;

    /// Search for movies matching `title`, optionally constrained by `year`.
    async fn search_movies(&self, title: &str, year: Option<u16>) -> Result<Vec<Candidate>>;

    /// Search for TV series matching `title`, optionally constrained by the
    /// year the series first aired.
    async fn search_tv(&self, title: &str, year: Option<u16>) -> Result<Vec<Candidate>>;

    /// Fetch details of one episode of the series `series_id`.
    async fn episode_details(
        &self,
        series_id: u64,
        season: u32,
        episode: u32,
    ) -> Result<EpisodeDetails>;
}
