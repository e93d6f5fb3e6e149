//! Catalog lookups for classified media.
//!
//! # Module layout
//!
//! - [`provider`] -- Trait definition and shared data types.
//! - [`providers`] -- Concrete provider implementations (TMDB).
//! - [`limiter`] -- Token-bucket limiter shared by every outbound request.
//! - [`cache`] -- Process-lifetime cache of resolved titles.
//! - [`matching`] -- Candidate selection and query narrowing.
//! - [`resolver`] -- Entity enrichment tying the pieces together.

pub mod cache;
pub mod limiter;
pub mod matching;
pub mod provider;
pub mod providers;
pub mod resolver;

pub use cache::{LookupCache, LookupResult};
pub use limiter::RequestLimiter;
pub use matching::Narrowing;
pub use provider::{Candidate, EpisodeDetails, MetadataProvider};
pub use resolver::Resolver;
