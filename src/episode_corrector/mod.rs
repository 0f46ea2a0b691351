//! Post-fetch correction of catalog episode data
//!
//! A freshly fetched series runs through two passes: the quirk fix registered
//! for its id (if any), then collapsing of duplicated episode records.

mod quirks;

pub use quirks::{AMERICAN_DAD_TVDB_ID, QuirkFix, QuirkTable, merge_second_season_into_first};

use crate::catalog::{Episode, Series};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while correcting episode data
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EpisodeCorrectionError {
    /// The series was fetched without its episode list
    #[error("Series {series_id} has no episode data to correct")]
    MissingEpisodes { series_id: u32 },

    /// A quirk fix needs season 1 episodes that are not there
    #[error("Series {series_id} has no season 1 episodes to merge into")]
    MissingSeasonOne { series_id: u32 },
}

/// Identity of an episode within the catalog
///
/// Two records with the same key describe the same episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EpisodeKey {
    pub series_id: u32,
    pub season_number: u32,
    pub episode_number: u32,
}

impl EpisodeKey {
    pub fn of(episode: &Episode) -> Self {
        Self {
            series_id: episode.series_id,
            season_number: episode.season_number,
            episode_number: episode.episode_number,
        }
    }
}

impl fmt::Display for EpisodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:06}{:03}{:03}",
            self.series_id, self.season_number, self.episode_number
        )
    }
}

/// Applies quirk fixes and removes duplicate episodes
#[derive(Debug, Clone, Default)]
pub struct EpisodeCorrector {
    quirks: QuirkTable,
}

impl EpisodeCorrector {
    pub fn new(quirks: QuirkTable) -> Self {
        Self { quirks }
    }

    /// Corrects the episode list of `series` in place
    ///
    /// The quirk fix for the series runs only once per series value; calling
    /// this again on a corrected series only repeats the duplicate pass, which
    /// leaves the episodes unchanged.
    ///
    /// # Errors
    ///
    /// Returns `MissingEpisodes` if the series was fetched without episodes,
    /// or the error of a quirk fix that cannot be applied.
    pub fn normalize(&self, series: &mut Series) -> Result<(), EpisodeCorrectionError> {
        let series_id = series.id;
        let episodes = series
            .episodes
            .as_mut()
            .ok_or(EpisodeCorrectionError::MissingEpisodes { series_id })?;

        if !series.corrected {
            if let Some(fix) = self.quirks.get(series_id) {
                fix(series_id, episodes)?;
            }
            series.corrected = true;
        }

        let before = episodes.len();
        collapse_duplicates(episodes);

        debug!(
            series_id,
            removed = before - episodes.len(),
            remaining = episodes.len(),
            "Collapsed duplicate episodes"
        );

        Ok(())
    }
}

/// Orders duplicates so that the preferred record comes first
///
/// Later air dates win, then alphabetically later names. Records without an
/// air date or name lose against records that have one.
fn precedence(a: &Episode, b: &Episode) -> Ordering {
    // None < Some, so descending order puts missing values last
    b.first_aired
        .cmp(&a.first_aired)
        .then_with(|| b.episode_name.cmp(&a.episode_name))
}

/// Keeps one record per `EpisodeKey`
///
/// The survivors are returned ordered by season and episode number.
fn collapse_duplicates(episodes: &mut Vec<Episode>) {
    episodes.sort_by(precedence);

    let mut seen = HashSet::new();
    episodes.retain(|episode| {
        let key = EpisodeKey::of(episode);
        let first = seen.insert(key);
        if !first {
            debug!(key = %key, name = ?episode.episode_name, "Dropping duplicate episode");
        }
        first
    });

    episodes.sort_by_key(|e| (e.season_number, e.episode_number));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn episode(
        series_id: u32,
        season_number: u32,
        episode_number: u32,
        name: Option<&str>,
        aired: Option<(i32, u32, u32)>,
    ) -> Episode {
        Episode {
            series_id,
            season_number,
            episode_number,
            season_id: season_number * 10,
            episode_name: name.map(str::to_string),
            first_aired: aired.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            summary: None,
        }
    }

    fn series(id: u32, episodes: Vec<Episode>) -> Series {
        Series {
            id,
            name: "Test".to_string(),
            language: None,
            episodes: Some(episodes),
            actors: Vec::new(),
            banners: Vec::new(),
            corrected: false,
        }
    }

    fn names(series: &Series) -> Vec<Option<&str>> {
        series
            .episodes
            .as_ref()
            .unwrap()
            .iter()
            .map(|e| e.episode_name.as_deref())
            .collect()
    }

    #[test]
    fn test_episode_key_is_zero_padded() {
        let key = EpisodeKey::of(&episode(73141, 2, 7, None, None));
        assert_eq!(key.to_string(), "073141002007");
    }

    #[test]
    fn test_missing_episodes_is_an_error() {
        let mut s = series(1, Vec::new());
        s.episodes = None;
        assert_eq!(
            EpisodeCorrector::default().normalize(&mut s),
            Err(EpisodeCorrectionError::MissingEpisodes { series_id: 1 })
        );
    }

    #[test]
    fn test_later_air_date_wins() {
        let mut s = series(
            1,
            vec![
                episode(1, 1, 1, Some("Old"), Some((2005, 1, 1))),
                episode(1, 1, 1, Some("New"), Some((2005, 6, 1))),
            ],
        );

        EpisodeCorrector::default().normalize(&mut s).unwrap();
        assert_eq!(names(&s), vec![Some("New")]);
    }

    #[test]
    fn test_later_name_wins_on_equal_air_date() {
        let mut s = series(
            1,
            vec![
                episode(1, 1, 1, Some("Zebra"), Some((2005, 1, 1))),
                episode(1, 1, 1, Some("Apple"), Some((2005, 1, 1))),
                episode(1, 1, 1, None, Some((2005, 1, 1))),
            ],
        );

        EpisodeCorrector::default().normalize(&mut s).unwrap();
        assert_eq!(names(&s), vec![Some("Zebra")]);
    }

    #[test]
    fn test_missing_air_date_loses() {
        let mut s = series(
            1,
            vec![
                episode(1, 1, 1, Some("Zebra"), None),
                episode(1, 1, 1, Some("Apple"), Some((1999, 1, 1))),
            ],
        );

        EpisodeCorrector::default().normalize(&mut s).unwrap();
        assert_eq!(names(&s), vec![Some("Apple")]);
    }

    #[test]
    fn test_distinct_episodes_are_kept_in_order() {
        let mut s = series(
            1,
            vec![
                episode(1, 2, 1, Some("S2E1"), None),
                episode(1, 1, 2, Some("S1E2"), None),
                episode(1, 1, 1, Some("S1E1"), None),
                episode(1, 1, 2, Some("S1E2 dup"), None),
            ],
        );

        EpisodeCorrector::default().normalize(&mut s).unwrap();
        assert_eq!(names(&s), vec![Some("S1E1"), Some("S1E2 dup"), Some("S2E1")]);
    }

    #[test]
    fn test_quirk_fix_for_known_series() {
        let id = AMERICAN_DAD_TVDB_ID;
        let mut s = series(
            id,
            vec![
                episode(id, 1, 1, Some("a"), None),
                episode(id, 1, 2, Some("b"), None),
                episode(id, 1, 3, Some("c"), None),
                episode(id, 2, 1, Some("d"), None),
                episode(id, 2, 2, Some("e"), None),
                episode(id, 3, 1, Some("f"), None),
            ],
        );

        EpisodeCorrector::new(QuirkTable::thetvdb())
            .normalize(&mut s)
            .unwrap();

        let episodes = s.episodes.as_ref().unwrap();
        let d = episodes.iter().find(|e| e.episode_name.as_deref() == Some("d")).unwrap();
        let e = episodes.iter().find(|e| e.episode_name.as_deref() == Some("e")).unwrap();
        let f = episodes.iter().find(|e| e.episode_name.as_deref() == Some("f")).unwrap();

        assert_eq!((d.season_number, d.episode_number, d.season_id), (1, 4, 10));
        assert_eq!((e.season_number, e.episode_number, e.season_id), (1, 5, 10));
        assert_eq!((f.season_number, f.episode_number, f.season_id), (2, 1, 30));
        assert!(s.corrected);
    }

    #[test]
    fn test_quirk_fix_ignores_other_series() {
        let mut s = series(
            1,
            vec![episode(1, 1, 1, Some("a"), None), episode(1, 2, 1, Some("b"), None)],
        );

        EpisodeCorrector::new(QuirkTable::thetvdb())
            .normalize(&mut s)
            .unwrap();

        let seasons: Vec<u32> = s
            .episodes
            .unwrap()
            .iter()
            .map(|e| e.season_number)
            .collect();
        assert_eq!(seasons, vec![1, 2]);
    }

    #[test]
    fn test_normalize_twice_is_idempotent() {
        let id = AMERICAN_DAD_TVDB_ID;
        let mut s = series(
            id,
            vec![
                episode(id, 1, 1, Some("a"), Some((2005, 2, 6))),
                episode(id, 2, 1, Some("b"), Some((2005, 5, 1))),
                episode(id, 2, 1, Some("b old"), Some((2005, 4, 1))),
                episode(id, 3, 1, Some("c"), None),
            ],
        );
        let corrector = EpisodeCorrector::new(QuirkTable::thetvdb());

        corrector.normalize(&mut s).unwrap();
        let once = s.clone();
        corrector.normalize(&mut s).unwrap();

        assert_eq!(s, once);
        assert_eq!(names(&s), vec![Some("a"), Some("b"), Some("c")]);
    }
}
