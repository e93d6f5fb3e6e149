//! Planned hardlinks from a source file into the library.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use kourai_common::Result;
use kourai_parser::MediaEntity;
use tracing::debug;

/// What [`Link::create`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// A new hardlink was made.
    Created,
    /// Something already exists at the target; nothing was touched.
    AlreadyExists,
}

impl fmt::Display for LinkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkOutcome::Created => write!(f, "created"),
            LinkOutcome::AlreadyExists => write!(f, "exists"),
        }
    }
}

/// A source file and the library path it should be linked to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    pub source: PathBuf,
    pub target: PathBuf,
}

impl Link {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Plan the link for `entity` under `destination`. No I/O.
    ///
    /// ```
    /// use kourai::link::Link;
    ///
    /// let entity = kourai_parser::classify("/in/Foobar.1999.2160p.WEB-DL.mkv").unwrap();
    /// let link = Link::plan(&entity, "/library");
    /// assert_eq!(
    ///     link.target.to_str(),
    ///     Some("/library/movies/Foobar (1999)/Foobar.1999.2160p.WEB-DL.mkv")
    /// );
    /// ```
    pub fn plan(entity: &MediaEntity, destination: impl AsRef<Path>) -> Self {
        Self {
            source: entity.source_path().to_path_buf(),
            target: destination.as_ref().join(entity.target_relative_path()),
        }
    }

    /// Whether anything (including a dangling symlink) sits at the target.
    ///
    /// An unreadable target counts as existing.
    pub fn exists(&self) -> bool {
        match std::fs::symlink_metadata(&self.target) {
            Ok(_) => true,
            Err(e) => e.kind() != io::ErrorKind::NotFound,
        }
    }

    /// Create the hardlink, making missing parent directories first.
    ///
    /// Creating a link whose target already exists is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`kourai_common::Error::Io`] when a parent directory or the
    /// link itself cannot be created.
    pub fn create(&self) -> Result<LinkOutcome> {
        if self.exists() {
            debug!(path = %self.target.display(), "Target already exists");
            return Ok(LinkOutcome::AlreadyExists);
        }
        if let Some(parent) = self.target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        match std::fs::hard_link(&self.source, &self.target) {
            Ok(()) => Ok(LinkOutcome::Created),
            // Lost a race with another link to the same target.
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(LinkOutcome::AlreadyExists),
            Err(e) => Err(e.into()),
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.source.display(), self.target.display())
    }
}
