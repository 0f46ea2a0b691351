/// Data structures and traits for TV series catalog access.
///
/// This module provides structures to represent search results, series and
/// episodes as returned by a metadata catalog, as well as the trait that
/// catalog clients implement.
mod cached;
mod tvmaze;
mod tvmaze_types;

pub use cached::CachedCatalogClient;
pub use tvmaze::{TVMAZE_BASE_URL, TvMazeClient};

use crate::episode_corrector::QuirkTable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while talking to a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Request to the catalog failed
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Failed to parse the catalog's JSON response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The API returned invalid or unexpected data
    #[error("API returned invalid data: {0}")]
    InvalidData(String),
}

/// One candidate returned by a catalog search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Catalog identifier of the series
    pub id: u32,
    /// The series name as the catalog spells it
    pub series_name: String,
}

/// A single episode of a TV series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// The series this episode belongs to
    pub series_id: u32,
    /// The season number this episode belongs to
    pub season_number: u32,
    /// The episode number within the season
    pub episode_number: u32,
    /// Catalog identifier of the season record
    pub season_id: u32,
    /// The episode title, if the catalog knows one
    pub episode_name: Option<String>,
    /// Original air date, if known
    pub first_aired: Option<NaiveDate>,
    /// Plain text summary of the episode
    pub summary: Option<String>,
}

/// Full metadata for one series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    /// Catalog identifier of the series
    pub id: u32,
    /// The name of the series
    pub name: String,
    /// Primary language of the series, if the catalog reports it
    pub language: Option<String>,
    /// Episodes, or `None` if the series was fetched without them
    pub episodes: Option<Vec<Episode>>,
    /// Cast member names (only filled when actors were requested)
    #[serde(default)]
    pub actors: Vec<String>,
    /// Banner image URLs (only filled when banners were requested)
    #[serde(default)]
    pub banners: Vec<String>,
    /// Set once quirk fixes have been applied to the episode list
    #[serde(default)]
    pub corrected: bool,
}

/// What to load alongside the base series record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FetchOptions {
    pub include_episodes: bool,
    pub include_actors: bool,
    pub include_banners: bool,
}

impl FetchOptions {
    /// Options that only request the episode list (or nothing at all).
    pub fn episodes(include_episodes: bool) -> Self {
        Self {
            include_episodes,
            ..Self::default()
        }
    }
}

/// Trait for catalogs that can search for and fetch TV series.
///
/// Implementors are not required to be safe for concurrent use;
/// `SeriesResolver` serializes every call behind its own lock.
pub trait CatalogClient {
    /// Searches the catalog for series matching `title`.
    ///
    /// Results are returned in the catalog's relevance order. An empty list
    /// means nothing was found and is not an error.
    fn search(&self, title: &str) -> Result<Vec<SearchResult>, CatalogError>;

    /// Fetches a series by its catalog identifier.
    ///
    /// Returns `Ok(None)` if the identifier is unknown. Episodes may come back
    /// unordered and may contain duplicates.
    fn fetch_series(
        &self,
        id: u32,
        options: &FetchOptions,
    ) -> Result<Option<Series>, CatalogError>;

    /// Known data quirks of this catalog, keyed by its own series ids.
    fn quirks(&self) -> QuirkTable {
        QuirkTable::default()
    }
}
