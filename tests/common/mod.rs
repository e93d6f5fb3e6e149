//! Shared helpers for integration tests.
//!
//! Provides [`MediaTree`] for building throwaway source directories and a
//! few builders for TMDB-shaped JSON bodies served by a wiremock server.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use kourai::metadata::providers::TmdbProvider;
use kourai::metadata::RequestLimiter;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::MockServer;

/// A temporary directory of media files, each holding its own relative path.
pub struct MediaTree {
    dir: TempDir,
}

impl MediaTree {
    /// Create a tree containing `files` (relative paths).
    pub fn new(files: &[&str]) -> Self {
        let tree = Self {
            dir: TempDir::new().unwrap(),
        };
        for file in files {
            tree.add(file);
        }
        tree
    }

    pub fn add(&self, rel: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, rel.as_bytes()).unwrap();
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// A TMDB provider pointed at `server`, with a limiter loose enough that
/// tests never wait on it.
pub fn tmdb_provider(server: &MockServer) -> TmdbProvider {
    TmdbProvider::builder("test-key")
        .base_url(server.uri())
        .limiter(Arc::new(RequestLimiter::try_new(1000, 1000).unwrap()))
        .build()
        .unwrap()
}

pub fn movie(id: u64, title: &str, release_date: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "release_date": release_date,
        "popularity": 10.0,
        "vote_average": 7.0,
        "vote_count": 100
    })
}

pub fn series(id: u64, name: &str, first_air_date: &str, countries: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "first_air_date": first_air_date,
        "origin_country": countries,
        "popularity": 10.0
    })
}

pub fn page(results: Vec<Value>) -> Value {
    let total = results.len();
    json!({
        "page": 1,
        "results": results,
        "total_pages": 1,
        "total_results": total
    })
}
