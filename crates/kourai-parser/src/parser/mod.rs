//! Path classification.
//!
//! The file stem is tokenized with the Logos lexer and scanned for markers.
//! An episode marker makes the file an [`Episode`](crate::Episode); otherwise
//! the stem, and then the parent directory name, are searched for a movie
//! title and year.

mod episode;
mod markers;
mod movie;
mod title;

pub use title::normalize;

use std::path::Path;

use crate::config::ClassifierConfig;
use crate::lexer::Lexer;
use crate::model::{ClassifyError, MediaEntity, Movie};
use markers::Markers;

/// Classify the file at `path` using `config`.
pub fn classify_with_config(
    path: &Path,
    config: &ClassifierConfig,
) -> Result<MediaEntity, ClassifyError> {
    let invalid = || ClassifyError::InvalidFileName {
        path: path.to_path_buf(),
    };
    let stem = path.file_stem().ok_or_else(invalid)?;
    let stem = stem.to_str().ok_or_else(invalid)?;

    let lexer = Lexer::new(stem);
    let markers = Markers::scan(&lexer);

    if let Some((id, span)) = markers.episode {
        let episode = episode::extract(path, stem, &markers, id, span, config);
        return Ok(MediaEntity::Episode(episode));
    }

    classify_movie(path, stem, config)
}

fn classify_movie(
    path: &Path,
    stem: &str,
    config: &ClassifierConfig,
) -> Result<MediaEntity, ClassifyError> {
    let mut parts = movie::extract(stem, config);

    if !parts.is_complete() {
        let dir = path
            .parent()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str());
        if let Some(dir) = dir {
            let from_dir = movie::extract(dir, config);
            parts = if from_dir.is_complete() {
                from_dir
            } else {
                parts.or(from_dir)
            };
        }
    }

    match (parts.title, parts.year) {
        (Some(title), Some(year)) => Ok(MediaEntity::Movie(Movie::new(path, title, Some(year)))),
        _ => Err(ClassifyError::Unclassifiable {
            path: path.to_path_buf(),
        }),
    }
}
