//! Kourai - hardlinks movies and TV episodes into a Plex-style library
//!
//! This library crate exposes the discovery, lookup, and linking stages for
//! the `kourai` binary and for integration testing. Classification and
//! naming live in `kourai-parser`.

pub mod config;
pub mod link;
pub mod metadata;
pub mod pipeline;
pub mod scanner;
