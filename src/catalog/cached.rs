//! Cached catalog client implementation
//!
//! This module provides a caching wrapper for catalog clients that
//! automatically stores and retrieves search results and series data
//! from a local cache.

use super::{CatalogClient, CatalogError, FetchOptions, SearchResult, Series};
use crate::cache::CacheStorage;
use crate::episode_corrector::QuirkTable;
use tracing::{debug, warn};

/// A caching wrapper for catalog clients
///
/// This client wraps another catalog client and caches its raw responses
/// to avoid redundant network requests. The cache is persistent across
/// application runs. Cached series are stored exactly as the wrapped
/// client returned them, before any episode correction.
pub struct CachedCatalogClient<C>
where
    C: CatalogClient,
{
    /// The underlying catalog client
    client: C,
    /// Cache storage for search results
    searches: CacheStorage<Vec<SearchResult>>,
    /// Cache storage for series data
    series: CacheStorage<Series>,
}

impl<C> CachedCatalogClient<C>
where
    C: CatalogClient,
{
    /// Creates a new cached catalog client wrapping the given client
    ///
    /// # Arguments
    ///
    /// * `client` - The catalog client to wrap
    /// * `searches` - The cache storage for search results
    /// * `series` - The cache storage for fetched series
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let ttl = Some(Duration::from_secs(24 * 60 * 60));
    /// let cached = CachedCatalogClient::new(
    ///     TvMazeClient::new(),
    ///     CacheStorage::open("searches", ttl)?,
    ///     CacheStorage::open("series", ttl)?,
    /// );
    /// ```
    pub fn new(
        client: C,
        searches: CacheStorage<Vec<SearchResult>>,
        series: CacheStorage<Series>,
    ) -> Self {
        Self {
            client,
            searches,
            series,
        }
    }

    /// Generates a cache key for a series fetch
    ///
    /// Different fetch options are cached separately so that a series
    /// fetched without episodes never satisfies a request that needs them.
    fn series_key(id: u32, options: &FetchOptions) -> String {
        format!(
            "series_{}_e{}_a{}_b{}",
            id,
            u8::from(options.include_episodes),
            u8::from(options.include_actors),
            u8::from(options.include_banners)
        )
    }

    /// Generates a cache key for a search
    ///
    /// The title is hashed verbatim; cache file names only keep ASCII
    /// alphanumerics, so titles must not be sanitized into the key.
    fn search_key(title: &str) -> String {
        format!("search_{}", blake3::hash(title.as_bytes()).to_hex())
    }
}

impl<C> CatalogClient for CachedCatalogClient<C>
where
    C: CatalogClient,
{
    fn search(&self, title: &str) -> Result<Vec<SearchResult>, CatalogError> {
        let cache_key = Self::search_key(title);

        match self.searches.load(&cache_key) {
            Ok(Some(results)) => {
                debug!(title, "Search cache hit");
                return Ok(results);
            }
            Ok(None) => {}
            Err(e) => {
                // Cache failures must not prevent the search
                warn!(error = %e, "Failed to read search cache");
            }
        }

        let results = self.client.search(title)?;

        if let Err(e) = self.searches.store(&cache_key, &results) {
            warn!(error = %e, "Failed to write search cache");
        }

        Ok(results)
    }

    fn fetch_series(
        &self,
        id: u32,
        options: &FetchOptions,
    ) -> Result<Option<Series>, CatalogError> {
        let cache_key = Self::series_key(id, options);

        match self.series.load(&cache_key) {
            Ok(Some(series)) => {
                debug!(series_id = id, "Series cache hit");
                return Ok(Some(series));
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "Failed to read series cache");
            }
        }

        let series = self.client.fetch_series(id, options)?;

        // Unknown ids are not cached
        if let Some(ref series) = series {
            if let Err(e) = self.series.store(&cache_key, series) {
                warn!(error = %e, "Failed to write series cache");
            }
        }

        Ok(series)
    }

    fn quirks(&self) -> QuirkTable {
        self.client.quirks()
    }
}
