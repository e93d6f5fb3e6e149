use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::metadata::matching::Narrowing;
use crate::metadata::providers::tmdb::TMDB_BASE_URL;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub library: LibraryConfig,

    #[serde(default)]
    pub tmdb: TmdbConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Library root links are created under. Required for `link`.
    #[serde(default)]
    pub destination: Option<PathBuf>,

    #[serde(default = "default_sources")]
    pub sources: Vec<PathBuf>,

    /// File extensions considered, without the dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Regexes matched against file and directory names; `glob:` prefix for
    /// shell globs. The sample-file exclusion is always added.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Only files modified after this date (`YYYY-MM-DD`, `M/D`, `M-D`).
    #[serde(default)]
    pub modified_after: Option<String>,

    /// Only files modified before this date.
    #[serde(default)]
    pub modified_before: Option<String>,

    /// Leave parsed titles in their original case.
    #[serde(default)]
    pub keep_title_case: bool,

    #[serde(default)]
    pub exclude_movies: bool,

    #[serde(default)]
    pub exclude_tv: bool,

    /// ISO-3166-1 origin countries to skip (case-insensitive).
    #[serde(default)]
    pub exclude_countries: Vec<String>,
}

fn default_sources() -> Vec<PathBuf> {
    vec![PathBuf::from("./")]
}

fn default_extensions() -> Vec<String> {
    kourai_common::paths::DEFAULT_VIDEO_EXTENSIONS
        .iter()
        .map(|e| e.to_string())
        .collect()
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            destination: None,
            sources: default_sources(),
            extensions: default_extensions(),
            exclude: Vec::new(),
            modified_after: None,
            modified_before: None,
            keep_title_case: false,
            exclude_movies: false,
            exclude_tv: false,
            exclude_countries: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// API key; falls back to the `TMDB_API_KEY` environment variable.
    /// Without a key, titles are not looked up.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Response language, e.g. `en-US`.
    #[serde(default)]
    pub language: Option<String>,

    /// Sustained request rate shared by all lookups (default: 40)
    #[serde(default = "default_rate")]
    pub requests_per_second: u32,

    /// Requests allowed back to back before the rate applies (default: 40)
    #[serde(default = "default_rate")]
    pub burst: u32,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_true")]
    pub include_adult: bool,
}

fn default_base_url() -> String {
    TMDB_BASE_URL.to_string()
}
fn default_rate() -> u32 {
    40
}
fn default_timeout() -> u64 {
    30
}
fn default_true() -> bool {
    true
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            language: None,
            requests_per_second: default_rate(),
            burst: default_rate(),
            timeout_secs: default_timeout(),
            include_adult: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Files and entities processed at once (default: 4 per CPU)
    #[serde(default)]
    pub concurrency: Option<usize>,

    /// How titles are shortened when a search finds nothing.
    #[serde(default)]
    pub narrowing: Narrowing,
}
