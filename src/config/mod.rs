mod types;

pub use types::*;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Utc};
use kourai_parser::config::ClassifierConfig;
use kourai_parser::{Classifier, MediaKind};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::metadata::providers::TmdbProvider;
use crate::metadata::{RequestLimiter, Resolver};
use crate::pipeline::LinkOptions;
use crate::scanner::{CountryFilter, ExtensionFilter, ModifiedFilter, PatternFilter};

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./kourai.toml",
        "~/.config/kourai/config.toml",
        "/etc/kourai/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.tmdb.requests_per_second == 0 {
        anyhow::bail!("tmdb.requests_per_second cannot be 0");
    }
    if config.tmdb.burst == 0 {
        anyhow::bail!("tmdb.burst cannot be 0");
    }
    if config.pipeline.concurrency == Some(0) {
        anyhow::bail!("pipeline.concurrency cannot be 0");
    }

    for pattern in &config.library.exclude {
        PatternFilter::new([pattern])?;
    }
    for date in [&config.library.modified_after, &config.library.modified_before]
        .into_iter()
        .flatten()
    {
        parse_date(date)?;
    }

    Ok(())
}

/// Parse a date bound into midnight UTC of that day.
///
/// Accepts `YYYY-MM-DD`, or a month and day (`M/D`, `M-D`, `MM/DD`) in the
/// current year.
pub fn parse_date(value: &str) -> Result<SystemTime> {
    let value = value.trim();
    let date = match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => date,
        Err(_) => {
            let (month, day) = value
                .split_once(['/', '-'])
                .with_context(|| format!("Unrecognized date: {value:?}"))?;
            let month: u32 = month
                .parse()
                .with_context(|| format!("Bad month in date {value:?}"))?;
            let day: u32 = day
                .parse()
                .with_context(|| format!("Bad day in date {value:?}"))?;
            NaiveDate::from_ymd_opt(Utc::now().year(), month, day)
                .with_context(|| format!("No such day: {value:?}"))?
        }
    };
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .with_context(|| format!("No midnight on {date}"))?
        .and_utc();
    Ok(SystemTime::from(midnight))
}

impl Config {
    /// The configured API key, or the one from the environment.
    pub fn api_key(&self) -> Option<String> {
        self.tmdb
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new(
            ClassifierConfig::builder()
                .title_case(!self.library.keep_title_case)
                .build(),
        )
    }

    /// Build the options for a link run.
    ///
    /// Fails when no destination is configured.
    pub fn link_options(&self) -> Result<LinkOptions> {
        let library = &self.library;
        let destination = library
            .destination
            .clone()
            .context("No destination configured (set library.destination or pass --dest)")?;

        let mut options = LinkOptions::new(destination, library.sources.clone())
            .with_classifier(self.classifier())
            .with_file_filter(ExtensionFilter::new(&library.extensions));

        if !library.exclude.is_empty() {
            options = options.with_file_filter(PatternFilter::new(&library.exclude)?);
        }

        let after = library.modified_after.as_deref().map(parse_date).transpose()?;
        let before = library.modified_before.as_deref().map(parse_date).transpose()?;
        let modified = ModifiedFilter::new(after, before);
        if !modified.is_unbounded() {
            options = options.with_file_filter(modified);
        }

        let countries = CountryFilter::new(&library.exclude_countries);
        if !countries.is_empty() {
            options = options.with_media_filter(countries);
        }
        if library.exclude_movies {
            options = options.exclude_kind(MediaKind::Movie);
        }
        if library.exclude_tv {
            options = options.exclude_kind(MediaKind::Episode);
        }
        if let Some(concurrency) = self.pipeline.concurrency {
            options = options.with_concurrency(concurrency);
        }

        Ok(options)
    }

    /// Build the TMDB provider. Fails without an API key.
    pub fn provider(&self) -> Result<TmdbProvider> {
        let key = self
            .api_key()
            .with_context(|| format!("No TMDB API key (set tmdb.api_key or {API_KEY_ENV})"))?;
        let tmdb = &self.tmdb;
        let limiter = RequestLimiter::try_new(tmdb.requests_per_second, tmdb.burst)?;

        let mut builder = TmdbProvider::builder(key)
            .base_url(&tmdb.base_url)
            .include_adult(tmdb.include_adult)
            .timeout(Duration::from_secs(tmdb.timeout_secs))
            .limiter(Arc::new(limiter));
        if let Some(language) = &tmdb.language {
            builder = builder.language(language);
        }
        Ok(builder.build()?)
    }

    /// The resolver for a link run, or `None` when no API key is available.
    pub fn resolver(&self) -> Result<Option<Resolver>> {
        if self.api_key().is_none() {
            tracing::info!("No TMDB API key, titles will not be looked up");
            return Ok(None);
        }
        let provider = self.provider()?;
        Ok(Some(
            Resolver::new(Arc::new(provider)).with_narrowing(self.pipeline.narrowing),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Narrowing;
    use chrono::{DateTime, TimeZone};

    fn utc(t: SystemTime) -> DateTime<Utc> {
        DateTime::<Utc>::from(t)
    }

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.library.extensions, vec!["avi", "mkv", "mp4"]);
        assert_eq!(config.library.sources, vec![std::path::PathBuf::from("./")]);
        assert_eq!(config.tmdb.requests_per_second, 40);
        assert!(config.tmdb.include_adult);
        assert_eq!(config.pipeline.narrowing, Narrowing::TrimTrailing);
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            [library]
            destination = "/library"
            sources = ["/downloads", "/archive"]
            exclude = ["^excluded-dir$", "glob:*.part"]
            modified_after = "2023-01-31"
            exclude_tv = true
            exclude_countries = ["GB"]

            [tmdb]
            api_key = "abc"
            language = "en-US"
            burst = 10

            [pipeline]
            concurrency = 8
            narrowing = "drop_last_word"
            "#,
        )
        .unwrap();
        validate_config(&config).unwrap();

        assert_eq!(config.tmdb.burst, 10);
        assert_eq!(config.pipeline.narrowing, Narrowing::DropLastWord);

        let options = config.link_options().unwrap();
        assert_eq!(options.destination, std::path::PathBuf::from("/library"));
        assert_eq!(options.sources.len(), 2);
        // sample, extensions, patterns, modified time
        assert_eq!(options.file_filters.len(), 4);
        assert_eq!(options.media_filters.len(), 1);
        assert!(options.exclude_kinds.contains(&MediaKind::Episode));
        assert_eq!(options.concurrency, 8);

        assert!(config.resolver().unwrap().is_some());
    }

    #[test]
    fn test_missing_destination() {
        let err = Config::default().link_options().unwrap_err();
        assert!(err.to_string().contains("No destination"));
    }

    #[test]
    fn test_zero_rate_rejected() {
        let config: Config = toml::from_str("[tmdb]\nrequests_per_second = 0").unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_bad_pattern_rejected() {
        let config: Config = toml::from_str("[library]\nexclude = [\"(\"]").unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        let full = utc(parse_date("2023-04-15").unwrap());
        assert_eq!(full, Utc.with_ymd_and_hms(2023, 4, 15, 0, 0, 0).unwrap());

        let year = Utc::now().year();
        for input in ["4/5", "4-5", "04/05"] {
            let parsed = utc(parse_date(input).unwrap());
            assert_eq!(parsed, Utc.with_ymd_and_hms(year, 4, 5, 0, 0, 0).unwrap(), "{input}");
        }

        assert!(parse_date("13/40").is_err());
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("kourai.toml");
        std::fs::write(&path, "[library]\ndestination = \"/lib\"\nkeep_title_case = true\n").unwrap();

        let config = load_config_or_default(Some(path.as_path())).unwrap();
        assert!(!config.classifier().config().title_case);
        assert!(load_config(&dir.path().join("missing.toml")).is_err());
    }
}
