//! Classifier configuration.

use chrono::Datelike;

/// Earliest year accepted as a movie release year.
pub const MIN_MOVIE_YEAR: u16 = 1888;

/// Configuration for the classifier.
///
/// Use the builder pattern to create a configuration:
///
/// ```
/// use kourai_parser::config::ClassifierConfig;
///
/// let config = ClassifierConfig::builder()
///     .title_case(false)
///     .build();
/// assert!(!config.title_case);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassifierConfig {
    /// Upper-case the first letter of every word in extracted titles.
    /// Default: true
    pub title_case: bool,

    /// Lowest year accepted as a movie release year.
    /// Default: 1888
    pub min_movie_year: u16,

    /// Highest year accepted as a movie release year.
    /// Default: next calendar year
    pub max_movie_year: u16,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            title_case: true,
            min_movie_year: MIN_MOVIE_YEAR,
            max_movie_year: default_max_movie_year(),
        }
    }
}

fn default_max_movie_year() -> u16 {
    let next = chrono::Local::now().year() + 1;
    u16::try_from(next).unwrap_or(u16::MAX)
}

impl ClassifierConfig {
    /// Create a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration builder.
    pub fn builder() -> ClassifierConfigBuilder {
        ClassifierConfigBuilder::default()
    }

    /// Whether `year` is a plausible movie release year.
    pub fn is_movie_year(&self, year: u16) -> bool {
        (self.min_movie_year..=self.max_movie_year).contains(&year)
    }
}

/// Builder for `ClassifierConfig`.
#[derive(Debug, Clone, Default)]
pub struct ClassifierConfigBuilder {
    title_case: Option<bool>,
    min_movie_year: Option<u16>,
    max_movie_year: Option<u16>,
}

impl ClassifierConfigBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether titles are title-cased.
    ///
    /// Default: true
    pub fn title_case(mut self, enabled: bool) -> Self {
        self.title_case = Some(enabled);
        self
    }

    /// Set the earliest accepted movie year.
    pub fn min_movie_year(mut self, year: u16) -> Self {
        self.min_movie_year = Some(year);
        self
    }

    /// Set the latest accepted movie year.
    pub fn max_movie_year(mut self, year: u16) -> Self {
        self.max_movie_year = Some(year);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ClassifierConfig {
        let defaults = ClassifierConfig::default();
        ClassifierConfig {
            title_case: self.title_case.unwrap_or(defaults.title_case),
            min_movie_year: self.min_movie_year.unwrap_or(defaults.min_movie_year),
            max_movie_year: self.max_movie_year.unwrap_or(defaults.max_movie_year),
        }
    }
}
