/// TVMaze catalog client implementation.
use super::tvmaze_types::{TvMazeEpisode, TvMazeImage, TvMazeSearchHit, TvMazeShow};
use super::{CatalogClient, CatalogError, Episode, FetchOptions, SearchResult, Series};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::debug;

/// Default endpoint of the public TVMaze API.
pub const TVMAZE_BASE_URL: &str = "https://api.tvmaze.com";

/// Catalog client for the TVMaze API.
///
/// Searches via `/search/shows` and loads series details from
/// `/shows/{id}` with the requested resources embedded.
pub struct TvMazeClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl TvMazeClient {
    /// Creates a new TVMaze client against the public API.
    pub fn new() -> Self {
        Self::with_base_url(TVMAZE_BASE_URL)
    }

    /// Creates a client against a different TVMaze-compatible endpoint.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Issues a GET request and decodes the JSON body.
    ///
    /// Returns `Ok(None)` on HTTP 404.
    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "TVMaze request");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .map_err(|e| CatalogError::RequestError(e.to_string()))?;

        if response.status() == 404 {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(CatalogError::RequestError(format!(
                "HTTP {} {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json()
            .map(Some)
            .map_err(|e| CatalogError::ParseError(e.to_string()))
    }

    /// Converts a TVMaze episode to our internal Episode structure.
    ///
    /// Specials without an episode number are skipped.
    fn convert_episode(
        series_id: u32,
        season_ids: &HashMap<u32, u32>,
        tvmaze_episode: TvMazeEpisode,
    ) -> Option<Episode> {
        let Some(episode_number) = tvmaze_episode.number else {
            debug!(
                series_id,
                season = tvmaze_episode.season,
                "Skipping episode without a number"
            );
            return None;
        };

        Some(Episode {
            series_id,
            season_number: tvmaze_episode.season,
            episode_number,
            season_id: season_ids
                .get(&tvmaze_episode.season)
                .copied()
                .unwrap_or_default(),
            episode_name: tvmaze_episode.name.filter(|n| !n.is_empty()),
            first_aired: tvmaze_episode.airdate.as_deref().and_then(parse_air_date),
            summary: tvmaze_episode
                .summary
                .map(|s| nanohtml2text::html2text(&s).trim().to_string())
                .filter(|s| !s.is_empty()),
        })
    }

    /// Converts TVMaze show data to our internal Series structure.
    fn convert_to_series(tvmaze_show: TvMazeShow, options: &FetchOptions) -> Series {
        let series_id = tvmaze_show.id;
        let embedded = tvmaze_show.embedded.unwrap_or_default();

        let season_ids: HashMap<u32, u32> = embedded
            .seasons
            .iter()
            .map(|season| (season.number, season.id))
            .collect();

        let episodes = if options.include_episodes {
            Some(
                embedded
                    .episodes
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|e| Self::convert_episode(series_id, &season_ids, e))
                    .collect(),
            )
        } else {
            None
        };

        Series {
            id: series_id,
            name: tvmaze_show.name,
            language: tvmaze_show.language,
            episodes,
            actors: embedded.cast.into_iter().map(|c| c.person.name).collect(),
            banners: Vec::new(),
            corrected: false,
        }
    }

    fn fetch_banners(&self, id: u32) -> Result<Vec<String>, CatalogError> {
        let images: Vec<TvMazeImage> = self
            .get_json(&format!("/shows/{}/images", id), &[])?
            .unwrap_or_default();

        Ok(images
            .into_iter()
            .filter(|image| image.kind.as_deref() == Some("banner"))
            .map(|image| image.resolutions.original.url)
            .collect())
    }
}

impl Default for TvMazeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogClient for TvMazeClient {
    fn search(&self, title: &str) -> Result<Vec<SearchResult>, CatalogError> {
        let hits: Vec<TvMazeSearchHit> = self
            .get_json("/search/shows", &[("q", title)])?
            .unwrap_or_default();

        Ok(hits
            .into_iter()
            .map(|hit| SearchResult {
                id: hit.show.id,
                series_name: hit.show.name,
            })
            .collect())
    }

    fn fetch_series(
        &self,
        id: u32,
        options: &FetchOptions,
    ) -> Result<Option<Series>, CatalogError> {
        let mut query = Vec::new();
        if options.include_episodes {
            query.push(("embed[]", "episodes"));
            query.push(("embed[]", "seasons"));
        }
        if options.include_actors {
            query.push(("embed[]", "cast"));
        }

        let Some(tvmaze_show) = self.get_json::<TvMazeShow>(&format!("/shows/{}", id), &query)?
        else {
            return Ok(None);
        };

        if tvmaze_show.id != id {
            return Err(CatalogError::InvalidData(format!(
                "requested show {} but received show {}",
                id, tvmaze_show.id
            )));
        }

        let mut series = Self::convert_to_series(tvmaze_show, options);

        if options.include_banners {
            series.banners = self.fetch_banners(id)?;
        }

        Ok(Some(series))
    }
}

/// Parses a TVMaze air date; empty or malformed dates count as unknown.
fn parse_air_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}
