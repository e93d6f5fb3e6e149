//! # kourai-parser
//!
//! Classifies media file paths into movies and TV episodes, and maps them to
//! a Plex-style library layout.
//!
//! Classification is purely lexical: no I/O is performed. The file stem is
//! scanned for an episode marker (`S01E02`, `s00e10e11e12`), year and date
//! markers, and release-tag sentinels (`2160p`, `WEB-DL`, `UNRATED`, ...);
//! titles are the text between those markers.
//!
//! ## Quick Start
//!
//! ```
//! use kourai_parser::{classify, MediaEntity};
//!
//! let entity = classify("/downloads/Foobar.1999.2160p.WEB-DL.mkv").unwrap();
//! let MediaEntity::Movie(movie) = &entity else { unreachable!() };
//! assert_eq!(movie.title, "Foobar");
//! assert_eq!(movie.year, Some(1999));
//! assert_eq!(
//!     entity.target_relative_path().to_str(),
//!     Some("movies/Foobar (1999)/Foobar.1999.2160p.WEB-DL.mkv")
//! );
//! ```
//!
//! ## Configurable Classification
//!
//! ```
//! use kourai_parser::{Classifier, MediaEntity};
//! use kourai_parser::config::ClassifierConfig;
//!
//! let classifier = Classifier::new(ClassifierConfig::builder().title_case(false).build());
//! let entity = classifier.classify("clobberin.time.s01e01.lets.go.mkv").unwrap();
//! let MediaEntity::Episode(ep) = entity else { unreachable!() };
//! assert_eq!(ep.series, "clobberin time");
//! ```

pub mod config;
pub mod lexer;
pub mod model;
pub mod output;

mod parser;

pub use model::{ClassifyError, Episode, MediaEntity, MediaKind, Movie};
pub use parser::normalize as normalize_title;

use std::path::Path;

use config::ClassifierConfig;

/// Classify a path with default settings.
///
/// See [`Classifier`] for configurable classification.
pub fn classify(path: impl AsRef<Path>) -> Result<MediaEntity, ClassifyError> {
    Classifier::default().classify(path)
}

/// A configurable path classifier.
///
/// Classification is a pure function of the path and the configuration, so a
/// single `Classifier` can be shared freely between tasks.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    /// Create a classifier with the given configuration.
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::InvalidFileName`] when the path has no usable
    /// file name, and [`ClassifyError::Unclassifiable`] when it is neither an
    /// episode nor a movie with both a title and a year.
    pub fn classify(&self, path: impl AsRef<Path>) -> Result<MediaEntity, ClassifyError> {
        parser::classify_with_config(path.as_ref(), &self.config)
    }
}
