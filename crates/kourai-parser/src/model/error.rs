//! Classification errors.

use std::path::PathBuf;

/// Why a path could not be turned into a [`super::MediaEntity`].
///
/// Classification failures are per file: callers drop the file and move on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    /// The path has no file name component (or it is not valid UTF-8).
    #[error("path has no usable file name: {}", path.display())]
    InvalidFileName {
        /// The offending path.
        path: PathBuf,
    },

    /// No episode marker was found and no (title, year) pair could be
    /// extracted from the file name or its parent directory.
    #[error("no title and year found in {}", path.display())]
    Unclassifiable {
        /// The offending path.
        path: PathBuf,
    },
}
