//! Library layout for classified media.
//!
//! A [`LayoutFormat`] maps a [`MediaEntity`] to a path relative to the
//! library root. [`PlexLayout`] follows the folder and file naming Plex
//! expects:
//!
//! ```
//! use kourai_parser::{classify, output::{LayoutFormat, PlexLayout}};
//! use std::path::Path;
//!
//! let entity = classify("/in/clobberin.time.s01e01.lets.go.mkv").unwrap();
//! assert_eq!(
//!     PlexLayout.target(&entity),
//!     Path::new("tv/Clobberin Time/Season 1/Clobberin Time - S01E01 - Lets Go.mkv")
//! );
//! ```

mod plex;

pub use plex::{episode_label, PlexLayout};

use std::path::PathBuf;

use crate::model::MediaEntity;

/// Maps entities to library-relative paths.
pub trait LayoutFormat {
    /// Relative path at which `entity` should appear in the library.
    ///
    /// Must be a pure function of the entity.
    fn target(&self, entity: &MediaEntity) -> PathBuf;
}
