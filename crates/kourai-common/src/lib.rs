//! Kourai-Common: shared error type and path utilities.
//!
//! - **Error Handling**: the error type returned by catalog lookups and
//!   filesystem operations, and its result alias
//! - **Path Utilities**: the default video extension allow-list and
//!   extension checks
//!
//! # Examples
//!
//! ```
//! use kourai_common::{Error, Result};
//! use kourai_common::paths::has_extension;
//! use std::path::Path;
//!
//! assert!(has_extension(Path::new("movie.MKV"), &["mkv"]));
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("Foobar"))
//! }
//! assert!(example().unwrap_err().is_not_found());
//! ```

pub mod error;
pub mod paths;

pub use error::{Error, Result};
