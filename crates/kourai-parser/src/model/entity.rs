//! Movie and episode entities.

use std::path::{Path, PathBuf};

use super::MediaKind;
use crate::output::{LayoutFormat, PlexLayout};

/// A movie identified from its path.
///
/// The source path is fixed at construction; every other field may be
/// rewritten once by a metadata resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Movie {
    /// Title, normalized by the classifier or canonical after resolution.
    pub title: String,
    /// Release year, if one was parsed or resolved.
    pub year: Option<u16>,
    /// Catalog id, set after resolution.
    pub external_id: Option<u64>,
    /// ISO-3166-1 origin country codes, set after resolution.
    pub countries: Vec<String>,
    path: PathBuf,
}

impl Movie {
    /// Create a movie for the file at `path`.
    pub fn new(path: impl Into<PathBuf>, title: impl Into<String>, year: Option<u16>) -> Self {
        Self {
            title: title.into(),
            year,
            external_id: None,
            countries: Vec::new(),
            path: path.into(),
        }
    }

    /// Path of the source file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A TV episode identified from its path.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Episode {
    /// Series title.
    pub series: String,
    /// Episode title, when the file name carries one or the catalog knows it.
    pub title: Option<String>,
    /// Episode identifier exactly as it appeared in the file name (e.g. `s01e02e03`).
    pub id: String,
    /// Season number; 0 holds specials.
    pub season: u32,
    /// First episode number in the file.
    pub episode: u32,
    /// Every episode number in the file, in order.
    pub episodes: Vec<u32>,
    /// Series year, if one preceded the episode marker.
    pub year: Option<u16>,
    /// Catalog id of the series, set after resolution.
    pub series_id: Option<u64>,
    /// ISO-3166-1 origin country codes of the series, set after resolution.
    pub countries: Vec<String>,
    path: PathBuf,
}

impl Episode {
    /// Create an episode for the file at `path`.
    ///
    /// `episodes` lists every episode number in the file; the first one
    /// becomes [`Episode::episode`].
    pub fn new(
        path: impl Into<PathBuf>,
        series: impl Into<String>,
        id: impl Into<String>,
        season: u32,
        episodes: Vec<u32>,
    ) -> Self {
        Self {
            series: series.into(),
            title: None,
            id: id.into(),
            season,
            episode: episodes.first().copied().unwrap_or_default(),
            episodes,
            year: None,
            series_id: None,
            countries: Vec::new(),
            path: path.into(),
        }
    }

    /// Path of the source file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file holds more than one episode.
    pub fn is_multi_episode(&self) -> bool {
        self.episodes.len() > 1
    }
}

/// A classified media file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MediaEntity {
    /// A movie.
    Movie(Movie),
    /// A TV episode.
    Episode(Episode),
}

impl MediaEntity {
    /// Path of the source file.
    pub fn source_path(&self) -> &Path {
        match self {
            MediaEntity::Movie(m) => m.path(),
            MediaEntity::Episode(e) => e.path(),
        }
    }

    /// Library path relative to the destination root, following Plex naming.
    ///
    /// ```
    /// use kourai_parser::{MediaEntity, Movie};
    /// use std::path::Path;
    ///
    /// let movie = MediaEntity::Movie(Movie::new("/in/Foobar.1999.mkv", "Foobar", Some(1999)));
    /// assert_eq!(
    ///     movie.target_relative_path(),
    ///     Path::new("movies/Foobar (1999)/Foobar.1999.mkv")
    /// );
    /// ```
    pub fn target_relative_path(&self) -> PathBuf {
        PlexLayout.target(self)
    }

    /// Movie or episode.
    pub fn kind(&self) -> MediaKind {
        match self {
            MediaEntity::Movie(_) => MediaKind::Movie,
            MediaEntity::Episode(_) => MediaKind::Episode,
        }
    }

    /// Origin countries known for this entity.
    pub fn countries(&self) -> &[String] {
        match self {
            MediaEntity::Movie(m) => &m.countries,
            MediaEntity::Episode(e) => &e.countries,
        }
    }

    /// Movie title or series title.
    pub fn title(&self) -> &str {
        match self {
            MediaEntity::Movie(m) => &m.title,
            MediaEntity::Episode(e) => &e.series,
        }
    }

    /// Returns `true` if this entity is a movie.
    pub fn is_movie(&self) -> bool {
        matches!(self, MediaEntity::Movie(_))
    }

    /// Returns `true` if this entity is an episode.
    pub fn is_episode(&self) -> bool {
        matches!(self, MediaEntity::Episode(_))
    }
}

impl From<Movie> for MediaEntity {
    fn from(movie: Movie) -> Self {
        MediaEntity::Movie(movie)
    }
}

impl From<Episode> for MediaEntity {
    fn from(episode: Episode) -> Self {
        MediaEntity::Episode(episode)
    }
}
