//! Series Resolver - Match TV series titles against an online catalog
//!
//! This library resolves human-entered or folder-derived series titles to
//! catalog entries and fetches series metadata with known upstream episode
//! data problems corrected, ready for file-organization logic downstream.
//!
//! Diagnostics are emitted as `tracing` events. The library never installs a
//! subscriber; whichever subscriber the embedding program sets up receives them.

mod cache;
mod catalog;
mod episode_corrector;
mod resolver;
mod title_matcher;
mod title_normalizer;

// Re-export error types
pub use cache::CacheError;
pub use catalog::CatalogError;
pub use episode_corrector::EpisodeCorrectionError;
pub use title_normalizer::TitleMatchError;

pub use cache::CacheStorage;
pub use catalog::{
    CachedCatalogClient, CatalogClient, Episode, FetchOptions, SearchResult, Series,
    TVMAZE_BASE_URL, TvMazeClient,
};
pub use episode_corrector::{
    AMERICAN_DAD_TVDB_ID, EpisodeCorrector, EpisodeKey, QuirkFix, QuirkTable,
    merge_second_season_into_first,
};
pub use resolver::SeriesResolver;
pub use title_matcher::{is_title_match, select_best_id, select_first_matching};
pub use title_normalizer::normalize_title;

use thiserror::Error;

/// Top-level error type for series resolution
#[derive(Debug, Error)]
pub enum ResolverError {
    /// A title passed to matching was empty
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] TitleMatchError),

    /// Episode correction was invoked on data it cannot handle
    #[error("Invalid state: {0}")]
    InvalidState(#[from] EpisodeCorrectionError),

    /// The catalog failed; passed through unchanged
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A thread panicked while holding the catalog
    #[error("Catalog client lock was poisoned")]
    CatalogLockPoisoned,
}
