/// TVMaze API response types for deserialization.
///
/// These structures mirror the JSON response format from the TVMaze API.
use serde::Deserialize;

/// A single hit from the TVMaze search endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeSearchHit {
    /// The matched show
    pub show: TvMazeShowRef,
}

/// The minimal show record embedded in search hits.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeShowRef {
    pub id: u32,
    pub name: String,
}

/// The top-level response from the TVMaze show endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeShow {
    pub id: u32,
    /// The name of the TV show
    pub name: String,
    /// Primary language (may be null)
    pub language: Option<String>,
    /// Embedded resources (like episodes) when requested with ?embed[]=
    #[serde(rename = "_embedded")]
    pub embedded: Option<TvMazeEmbedded>,
}

/// Embedded resources in a TVMaze show response.
#[derive(Debug, Default, Deserialize)]
pub(super) struct TvMazeEmbedded {
    #[serde(default)]
    pub episodes: Option<Vec<TvMazeEpisode>>,
    #[serde(default)]
    pub seasons: Vec<TvMazeSeason>,
    #[serde(default)]
    pub cast: Vec<TvMazeCastCredit>,
}

/// A single episode from the TVMaze API.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeEpisode {
    /// Season number (0 for specials)
    pub season: u32,
    /// Episode number within the season (null for specials)
    pub number: Option<u32>,
    /// Episode title (may be null for episodes without a title)
    pub name: Option<String>,
    /// Air date as YYYY-MM-DD, or an empty string if unknown
    pub airdate: Option<String>,
    /// Episode summary in HTML format (may be null)
    pub summary: Option<String>,
}

/// A season record, used to resolve season ids for episodes.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeSeason {
    pub id: u32,
    pub number: u32,
}

#[derive(Debug, Deserialize)]
pub(super) struct TvMazeCastCredit {
    pub person: TvMazePerson,
}

#[derive(Debug, Deserialize)]
pub(super) struct TvMazePerson {
    pub name: String,
}

/// An entry from the /shows/{id}/images endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeImage {
    /// "poster", "banner", "background", ... (may be null)
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub resolutions: TvMazeResolutions,
}

#[derive(Debug, Deserialize)]
pub(super) struct TvMazeResolutions {
    pub original: TvMazeImageUrl,
}

#[derive(Debug, Deserialize)]
pub(super) struct TvMazeImageUrl {
    pub url: String,
}
