//! Entity enrichment against a metadata provider.
//!
//! The resolver replaces a classified entity's parsed title with the
//! catalog's canonical one and records the catalog id and origin countries.
//! Lookups go through a shared [`LookupCache`] keyed by the raw parsed
//! title, so each distinct title reaches the network at most once per run
//! (barring concurrent first lookups, which are not de-duplicated).

use std::sync::Arc;

use kourai_common::{Error, Result};
use kourai_parser::{Episode, MediaEntity, MediaKind, Movie};
use tracing::{debug, warn};

use super::cache::{LookupCache, LookupResult};
use super::matching::{self, Narrowing};
use super::provider::{Candidate, MetadataProvider};

/// Enriches entities with catalog data.
#[derive(Clone)]
pub struct Resolver {
    provider: Arc<dyn MetadataProvider>,
    cache: Arc<LookupCache>,
    narrowing: Narrowing,
}

impl Resolver {
    /// Create a resolver with a fresh cache and the default narrowing.
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self {
            provider,
            cache: Arc::new(LookupCache::new()),
            narrowing: Narrowing::default(),
        }
    }

    /// Use an existing cache.
    pub fn with_cache(mut self, cache: Arc<LookupCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Use a different narrowing strategy.
    pub fn with_narrowing(mut self, narrowing: Narrowing) -> Self {
        self.narrowing = narrowing;
        self
    }

    /// The lookup cache.
    pub fn cache(&self) -> &Arc<LookupCache> {
        &self.cache
    }

    /// Enrich `entity`, logging instead of returning failures.
    ///
    /// Returns `true` when the entity was enriched. On failure the entity
    /// keeps its parsed fields.
    pub async fn enrich(&self, entity: &mut MediaEntity) -> bool {
        match self.resolve(entity).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    path = %entity.source_path().display(),
                    title = entity.title(),
                    transient = e.is_transient(),
                    error = %e,
                    "Metadata lookup failed, keeping parsed title"
                );
                false
            }
        }
    }

    /// Enrich `entity` from the catalog.
    ///
    /// # Errors
    ///
    /// Returns the provider error when no query produced a match, or when
    /// any request failed. For episodes a failed series lookup skips the
    /// episode lookup; a failed episode lookup leaves the series data in
    /// place.
    pub async fn resolve(&self, entity: &mut MediaEntity) -> Result<()> {
        match entity {
            MediaEntity::Movie(movie) => self.resolve_movie(movie).await,
            MediaEntity::Episode(episode) => self.resolve_episode(episode).await,
        }
    }

    async fn resolve_movie(&self, movie: &mut Movie) -> Result<()> {
        let found = self.lookup(MediaKind::Movie, &movie.title, movie.year).await?;

        movie.title = found.title;
        movie.external_id = Some(found.id);
        movie.countries = found.countries;
        if movie.year.is_none() {
            movie.year = found.year;
        }
        Ok(())
    }

    async fn resolve_episode(&self, episode: &mut Episode) -> Result<()> {
        let series = self
            .lookup(MediaKind::Episode, &episode.series, episode.year)
            .await?;

        episode.series = series.title;
        episode.series_id = Some(series.id);
        episode.countries = series.countries;

        let details = self
            .provider
            .episode_details(series.id, episode.season, episode.episode)
            .await?;
        episode.title = Some(details.name);
        Ok(())
    }

    /// Cached lookup of a movie or series by its raw parsed title.
    async fn lookup(&self, kind: MediaKind, title: &str, year: Option<u16>) -> Result<LookupResult> {
        if let Some(hit) = self.cache.get(kind, title) {
            debug!(%kind, title, "Lookup cache hit");
            return Ok(hit);
        }

        let queries = self.narrowing.queries(title);
        if queries.is_empty() {
            return Err(Error::invalid_input("cannot look up an empty title"));
        }

        let mut last_err = None;
        for query in &queries {
            let searched = match kind {
                MediaKind::Movie => self.provider.search_movies(query, year).await,
                MediaKind::Episode => self.provider.search_tv(query, year).await,
            };
            let candidates = match searched {
                Ok(candidates) => candidates,
                Err(e) if e.is_not_found() => {
                    debug!(%kind, query = query.as_str(), "No results, narrowing");
                    last_err = Some(e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let Some(chosen) = matching::select(title, year, &candidates) else {
                continue;
            };
            debug!(%kind, query = query.as_str(), id = chosen.id, title = chosen.title.as_str(), "Matched");
            return Ok(self.cache.insert(kind, title, to_result(chosen)));
        }

        Err(last_err.unwrap_or_else(|| Error::not_found(title.to_string())))
    }
}

fn to_result(candidate: &Candidate) -> LookupResult {
    LookupResult {
        title: candidate.title.clone(),
        id: candidate.id,
        countries: candidate.countries.clone(),
        year: candidate.year,
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("provider", &self.provider.name())
            .field("cached", &self.cache.len())
            .field("narrowing", &self.narrowing)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::provider::EpisodeDetails;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Provider answering from fixed tables and recording queries.
    #[derive(Default)]
    struct FakeProvider {
        movies: Vec<(&'static str, Vec<Candidate>)>,
        series: Vec<(&'static str, Vec<Candidate>)>,
        episode_title: Option<&'static str>,
        queries: Mutex<Vec<String>>,
    }

    fn lookup_table(table: &[(&'static str, Vec<Candidate>)], query: &str) -> Result<Vec<Candidate>> {
        table
            .iter()
            .find(|(q, _)| *q == query)
            .map(|(_, c)| c.clone())
            .ok_or_else(|| Error::not_found(query))
    }

    #[async_trait]
    impl MetadataProvider for FakeProvider {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn search_movies(&self, title: &str, _year: Option<u16>) -> Result<Vec<Candidate>> {
            self.queries.lock().push(title.to_string());
            lookup_table(&self.movies, title)
        }

        async fn search_tv(&self, title: &str, _year: Option<u16>) -> Result<Vec<Candidate>> {
            self.queries.lock().push(title.to_string());
            lookup_table(&self.series, title)
        }

        async fn episode_details(&self, _: u64, _: u32, _: u32) -> Result<EpisodeDetails> {
            self.episode_title
                .map(|name| EpisodeDetails {
                    name: name.to_string(),
                    overview: None,
                    air_date: None,
                    runtime: None,
                })
                .ok_or(Error::RateLimited)
        }
    }

    fn movie(title: &str, year: Option<u16>) -> MediaEntity {
        MediaEntity::Movie(Movie::new("/in/x.mkv", title, year))
    }

    #[tokio::test]
    async fn test_movie_narrows_until_found() {
        let provider = Arc::new(FakeProvider {
            movies: vec![("Foo Bar", vec![Candidate::new(5, "Foo Bar!", Some(2001))])],
            ..Default::default()
        });
        let resolver = Resolver::new(provider.clone());

        let mut entity = movie("Foo Bar Extended Cut", None);
        resolver.resolve(&mut entity).await.unwrap();

        let MediaEntity::Movie(m) = &entity else { unreachable!() };
        assert_eq!(m.title, "Foo Bar!");
        assert_eq!(m.external_id, Some(5));
        assert_eq!(m.year, Some(2001));
        assert_eq!(
            *provider.queries.lock(),
            vec!["Foo Bar Extended Cut", "Foo Bar Extended", "Foo Bar"]
        );
    }

    #[tokio::test]
    async fn test_parsed_year_is_kept() {
        let provider = Arc::new(FakeProvider {
            movies: vec![("Foobar", vec![Candidate::new(1, "Foobar", Some(2000))])],
            ..Default::default()
        });
        let resolver = Resolver::new(provider);
        let mut entity = movie("Foobar", Some(1999));
        resolver.resolve(&mut entity).await.unwrap();
        let MediaEntity::Movie(m) = &entity else { unreachable!() };
        assert_eq!(m.year, Some(1999));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_provider() {
        let provider = Arc::new(FakeProvider {
            movies: vec![("Foobar", vec![Candidate::new(1, "Foobar", Some(1999))])],
            ..Default::default()
        });
        let resolver = Resolver::new(provider.clone());

        for _ in 0..3 {
            let mut entity = movie("Foobar", Some(1999));
            resolver.resolve(&mut entity).await.unwrap();
        }
        assert_eq!(provider.queries.lock().len(), 1);
        assert_eq!(resolver.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_not_found_leaves_entity() {
        let resolver = Resolver::new(Arc::new(FakeProvider::default()));
        let mut entity = movie("Nothing Here", Some(1999));
        assert!(!resolver.enrich(&mut entity).await);
        let MediaEntity::Movie(m) = &entity else { unreachable!() };
        assert_eq!(m.title, "Nothing Here");
        assert_eq!(m.external_id, None);
    }

    #[tokio::test]
    async fn test_episode_enrichment() {
        let mut show = Candidate::new(9, "Clobberin' Time", Some(2010));
        show.countries = vec!["US".into()];
        let provider = Arc::new(FakeProvider {
            series: vec![("Clobberin Time", vec![show])],
            episode_title: Some("Let's Go"),
            ..Default::default()
        });
        let resolver = Resolver::new(provider);

        let mut entity = MediaEntity::Episode(Episode::new(
            "/in/clobberin.time.s01e01.mkv",
            "Clobberin Time",
            "s01e01",
            1,
            vec![1],
        ));
        resolver.resolve(&mut entity).await.unwrap();
        let MediaEntity::Episode(ep) = &entity else { unreachable!() };
        assert_eq!(ep.series, "Clobberin' Time");
        assert_eq!(ep.series_id, Some(9));
        assert_eq!(ep.title.as_deref(), Some("Let's Go"));
        assert_eq!(ep.countries, vec!["US".to_string()]);
    }

    #[tokio::test]
    async fn test_episode_detail_failure_keeps_series() {
        let provider = Arc::new(FakeProvider {
            series: vec![("Show", vec![Candidate::new(3, "The Show", None)])],
            episode_title: None,
            ..Default::default()
        });
        let resolver = Resolver::new(provider);
        let mut entity =
            MediaEntity::Episode(Episode::new("/in/show.s01e01.mkv", "Show", "s01e01", 1, vec![1]));
        let err = resolver.resolve(&mut entity).await.unwrap_err();
        assert!(matches!(err, Error::RateLimited));
        let MediaEntity::Episode(ep) = &entity else { unreachable!() };
        assert_eq!(ep.series, "The Show");
        assert_eq!(ep.title, None);
    }
}
