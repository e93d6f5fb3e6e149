//! TMDB (The Movie Database) metadata provider.
//!
//! Implements [`MetadataProvider`] by querying the TMDB v3 REST API.
//!
//! Features:
//! - Every request waits on a shared [`RequestLimiter`].
//! - HTTP 429 is returned as [`Error::RateLimited`] without retrying.
//! - Only the first page of search results is read.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use kourai_common::{Error, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::metadata::limiter::RequestLimiter;
use crate::metadata::provider::{Candidate, EpisodeDetails, MetadataProvider};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Public TMDB v3 endpoint.
pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_RATE: u32 = 40;

// ---------------------------------------------------------------------------
// TMDB API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse<T> {
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieSearchResult {
    id: u64,
    title: Option<String>,
    release_date: Option<String>,
    popularity: Option<f64>,
    #[serde(default)]
    origin_country: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbTvSearchResult {
    id: u64,
    name: Option<String>,
    first_air_date: Option<String>,
    popularity: Option<f64>,
    #[serde(default)]
    origin_country: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbEpisodeDetail {
    name: Option<String>,
    overview: Option<String>,
    air_date: Option<String>,
    runtime: Option<u32>,
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

/// TMDB metadata provider.
///
/// # Examples
///
/// ```no_run
/// use kourai::metadata::providers::TmdbProvider;
///
/// let provider = TmdbProvider::builder("your-api-key").language("en-US").build()?;
/// # Ok::<(), kourai_common::Error>(())
/// ```
pub struct TmdbProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    language: Option<String>,
    include_adult: bool,
    limiter: Arc<RequestLimiter>,
}

impl TmdbProvider {
    /// Start building a provider for `api_key`.
    pub fn builder(api_key: impl Into<String>) -> TmdbProviderBuilder {
        TmdbProviderBuilder::new(api_key)
    }

    /// The limiter this provider draws from.
    pub fn limiter(&self) -> &Arc<RequestLimiter> {
        &self.limiter
    }

    /// Execute a rate-limited GET and decode the JSON body.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        extra_params: &[(&str, &str)],
    ) -> Result<T> {
        self.limiter.acquire().await;

        let url = format!("{}{path}", self.base_url);
        let mut params: Vec<(&str, &str)> = vec![("api_key", self.api_key.as_str())];
        if let Some(language) = &self.language {
            params.push(("language", language.as_str()));
        }
        params.extend_from_slice(extra_params);

        debug!(url = %url, "TMDB request");
        let resp = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::transport(format!("TMDB request failed: {e}")))?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::status(status.as_u16(), body));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| Error::transport(format!("TMDB response read failed: {e}")))?;
        serde_json::from_str(&body).map_err(|e| Error::malformed(format!("TMDB {path}: {e}")))
    }
}

/// Extract a four-digit year from a date string like `"2023-04-15"`.
fn parse_year(date: Option<&str>) -> Option<u16> {
    date.and_then(|d| d.get(..4)).and_then(|y| y.parse::<u16>().ok())
}

fn not_found_if_empty(
    results: Vec<Candidate>,
    what: &str,
    query: &str,
) -> Result<Vec<Candidate>> {
    if results.is_empty() {
        Err(Error::not_found(format!("no {what} matching \"{query}\"")))
    } else {
        Ok(results)
    }
}

#[async_trait]
impl MetadataProvider for TmdbProvider {
    fn name(&self) -> &'static str {
        "tmdb"
    }

    async fn search_movies(&self, title: &str, year: Option<u16>) -> Result<Vec<Candidate>> {
        let include_adult = self.include_adult.to_string();
        let mut params = vec![("query", title), ("include_adult", include_adult.as_str())];
        let year_str = year.map(|y| y.to_string());
        if let Some(ref y) = year_str {
            params.push(("year", y.as_str()));
        }

        let body: TmdbSearchResponse<TmdbMovieSearchResult> =
            self.get("/search/movie", &params).await?;

        let results = body
            .results
            .into_iter()
            .map(|r| Candidate {
                id: r.id,
                year: parse_year(r.release_date.as_deref()),
                title: r.title.unwrap_or_default(),
                countries: r.origin_country,
                popularity: r.popularity,
            })
            .collect();
        not_found_if_empty(results, "movies", title)
    }

    async fn search_tv(&self, title: &str, year: Option<u16>) -> Result<Vec<Candidate>> {
        let mut params = vec![("query", title)];
        let year_str = year.map(|y| y.to_string());
        if let Some(ref y) = year_str {
            params.push(("first_air_date_year", y.as_str()));
        }

        let body: TmdbSearchResponse<TmdbTvSearchResult> = self.get("/search/tv", &params).await?;

        let results = body
            .results
            .into_iter()
            .map(|r| Candidate {
                id: r.id,
                year: parse_year(r.first_air_date.as_deref()),
                title: r.name.unwrap_or_default(),
                countries: r.origin_country,
                popularity: r.popularity,
            })
            .collect();
        not_found_if_empty(results, "series", title)
    }

    async fn episode_details(
        &self,
        series_id: u64,
        season: u32,
        episode: u32,
    ) -> Result<EpisodeDetails> {
        let path = format!("/tv/{series_id}/season/{season}/episode/{episode}");
        let detail: TmdbEpisodeDetail = self.get(&path, &[]).await?;
        let name = detail
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| Error::not_found(format!("no title for {path}")))?;

        Ok(EpisodeDetails {
            name,
            overview: detail.overview,
            air_date: detail.air_date,
            runtime: detail.runtime,
        })
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for [`TmdbProvider`].
#[derive(Debug)]
pub struct TmdbProviderBuilder {
    api_key: String,
    base_url: String,
    language: Option<String>,
    include_adult: bool,
    timeout: Duration,
    limiter: Option<Arc<RequestLimiter>>,
}

impl TmdbProviderBuilder {
    fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: TMDB_BASE_URL.to_string(),
            language: None,
            include_adult: true,
            timeout: DEFAULT_TIMEOUT,
            limiter: None,
        }
    }

    /// Override the API root (for tests or a proxy).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// ISO-639-1 language tag sent with every request, e.g. `en-US`.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Whether movie searches include adult titles.
    ///
    /// Default: true
    pub fn include_adult(mut self, include: bool) -> Self {
        self.include_adult = include;
        self
    }

    /// Per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Share an existing limiter instead of creating one.
    pub fn limiter(mut self, limiter: Arc<RequestLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Build the provider.
    pub fn build(self) -> Result<TmdbProvider> {
        if self.api_key.trim().is_empty() {
            return Err(Error::invalid_input("TMDB API key is empty"));
        }
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| Error::internal(format!("failed to build HTTP client: {e}")))?;
        let limiter = match self.limiter {
            Some(limiter) => limiter,
            None => Arc::new(RequestLimiter::try_new(DEFAULT_RATE, DEFAULT_RATE)?),
        };

        Ok(TmdbProvider {
            client,
            base_url: self.base_url,
            api_key: self.api_key,
            language: self.language,
            include_adult: self.include_adult,
            limiter,
        })
    }
}
