//! Series resolution against a catalog
//!
//! `SeriesResolver` owns the catalog client and serializes every access to it.
//! The client is not assumed to be safe for concurrent use, so searches and
//! fetches (including the correction of fetched episodes) run one at a time.

use crate::ResolverError;
use crate::catalog::{CatalogClient, FetchOptions, SearchResult, Series};
use crate::episode_corrector::EpisodeCorrector;
use crate::title_matcher::{select_best_id, select_first_matching};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// Resolves series titles and fetches corrected series data
pub struct SeriesResolver<C>
where
    C: CatalogClient,
{
    /// The catalog client, guarded against concurrent use
    catalog: Mutex<C>,
    /// Corrections applied to every series fetched with episodes
    corrector: EpisodeCorrector,
}

impl<C> SeriesResolver<C>
where
    C: CatalogClient,
{
    /// Creates a resolver using the quirk fixes the catalog declares
    pub fn new(catalog: C) -> Self {
        let corrector = EpisodeCorrector::new(catalog.quirks());
        Self::with_corrector(catalog, corrector)
    }

    /// Creates a resolver with an explicit episode corrector
    pub fn with_corrector(catalog: C, corrector: EpisodeCorrector) -> Self {
        Self {
            catalog: Mutex::new(catalog),
            corrector,
        }
    }

    fn lock_catalog(&self) -> Result<MutexGuard<'_, C>, ResolverError> {
        self.catalog
            .lock()
            .map_err(|_| ResolverError::CatalogLockPoisoned)
    }

    /// Searches the catalog for `title`
    ///
    /// Results keep the catalog's relevance order. An empty title yields no
    /// results without contacting the catalog.
    ///
    /// # Errors
    ///
    /// Catalog failures are passed through unchanged.
    pub fn search(&self, title: &str) -> Result<Vec<SearchResult>, ResolverError> {
        let catalog = self.lock_catalog()?;
        search_locked(&*catalog, title)
    }

    /// Finds the catalog entry whose name matches `title`
    ///
    /// Returns `Ok(None)` if the search yields nothing or no result matches.
    /// Unlike [`SeriesResolver::best_id`] this never falls back to the top
    /// search result.
    pub fn resolve_by_title(&self, title: &str) -> Result<Option<SearchResult>, ResolverError> {
        let catalog = self.lock_catalog()?;

        let results = search_locked(&*catalog, title)?;
        if results.is_empty() {
            return Ok(None);
        }

        Ok(select_first_matching(&results, title)?.cloned())
    }

    /// Returns the id of the best guess for `title`
    ///
    /// That is the first matching result, or the top search result when none
    /// matches. Returns `0` if the search yields nothing.
    pub fn best_id(&self, title: &str) -> Result<u32, ResolverError> {
        let catalog = self.lock_catalog()?;

        let results = search_locked(&*catalog, title)?;
        Ok(select_best_id(&results, title)?)
    }

    /// Fetches a series and corrects its episodes
    ///
    /// Correction only runs when episodes were requested. Returns `Ok(None)`
    /// if the catalog does not know `id`.
    pub fn fetch_and_correct(
        &self,
        id: u32,
        include_episodes: bool,
    ) -> Result<Option<Series>, ResolverError> {
        self.fetch_with(id, &FetchOptions::episodes(include_episodes))
    }

    /// Like [`SeriesResolver::fetch_and_correct`], with full control over what is loaded
    pub fn fetch_with(
        &self,
        id: u32,
        options: &FetchOptions,
    ) -> Result<Option<Series>, ResolverError> {
        // Held until correction is done so no caller sees a half-corrected series
        let catalog = self.lock_catalog()?;

        debug!(operation = "fetch_series", series_id = id, "Fetching series from catalog");
        let Some(mut series) = catalog.fetch_series(id, options)? else {
            info!(series_id = id, "Series not found in catalog");
            return Ok(None);
        };

        if options.include_episodes {
            self.corrector.normalize(&mut series)?;
        }

        Ok(Some(series))
    }
}

fn search_locked<C: CatalogClient>(
    catalog: &C,
    title: &str,
) -> Result<Vec<SearchResult>, ResolverError> {
    if title.trim().is_empty() {
        debug!(operation = "search", title, "Skipping search for empty title");
        return Ok(Vec::new());
    }

    debug!(operation = "search", title, "Searching catalog");
    let results = catalog.search(title)?;
    debug!(
        operation = "search",
        title,
        result_count = results.len(),
        "Search returned possible results"
    );

    Ok(results)
}
