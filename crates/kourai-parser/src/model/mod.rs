//! Data model types for classified media files.
//!
//! A classified file is a [`MediaEntity`]: either a [`Movie`] or an
//! [`Episode`]. Entities are produced by the classifier, optionally enriched
//! by a metadata resolver, and finally mapped to a library path.

mod entity;
mod error;
mod media_kind;

pub use entity::{Episode, MediaEntity, Movie};
pub use error::ClassifyError;
pub use media_kind::MediaKind;
