//! Known upstream data quirks and their fixes
//!
//! Each fix is registered under the catalog id of the series it repairs.
//! Catalog ids are only meaningful within one catalog, so every catalog
//! client exposes its own table.

use super::EpisodeCorrectionError;
use crate::catalog::Episode;
use std::collections::HashMap;
use tracing::debug;

/// TheTVDB id of "American Dad!", which reports a spurious season boundary.
pub const AMERICAN_DAD_TVDB_ID: u32 = 73141;

/// A correction applied to the episode list of one specific series.
pub type QuirkFix =
    fn(series_id: u32, episodes: &mut [Episode]) -> Result<(), EpisodeCorrectionError>;

/// Lookup table from series id to the quirk fix for that series.
#[derive(Debug, Clone, Default)]
pub struct QuirkTable {
    fixes: HashMap<u32, QuirkFix>,
}

impl QuirkTable {
    /// Quirks known for TheTVDB series ids.
    pub fn thetvdb() -> Self {
        Self::default().with(AMERICAN_DAD_TVDB_ID, merge_second_season_into_first)
    }

    /// Registers `fix` for `series_id`, replacing any previous fix.
    pub fn with(mut self, series_id: u32, fix: QuirkFix) -> Self {
        self.fixes.insert(series_id, fix);
        self
    }

    /// Returns the fix registered for `series_id`, if any.
    pub fn get(&self, series_id: u32) -> Option<QuirkFix> {
        self.fixes.get(&series_id).copied()
    }
}

/// Folds season 2 into season 1 and shifts every later season down by one
///
/// Season 2 episodes continue season 1's numbering and take over season 1's
/// season id. Requires at least one season 1 episode.
pub fn merge_second_season_into_first(
    series_id: u32,
    episodes: &mut [Episode],
) -> Result<(), EpisodeCorrectionError> {
    let season_one_count = episodes.iter().filter(|e| e.season_number == 1).count();
    let season_one_id = episodes
        .iter()
        .find(|e| e.season_number == 1)
        .map(|e| e.season_id)
        .ok_or(EpisodeCorrectionError::MissingSeasonOne { series_id })?;

    let offset = season_one_count as u32;

    for episode in episodes.iter_mut().filter(|e| e.season_number > 1) {
        if episode.season_number == 2 {
            episode.episode_number += offset;
            episode.season_id = season_one_id;
        }
        episode.season_number -= 1;
    }

    debug!(series_id, season_one_count, "Merged season 2 into season 1");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(season_number: u32, episode_number: u32, season_id: u32) -> Episode {
        Episode {
            series_id: AMERICAN_DAD_TVDB_ID,
            season_number,
            episode_number,
            season_id,
            episode_name: None,
            first_aired: None,
            summary: None,
        }
    }

    #[test]
    fn test_thetvdb_table_contains_american_dad() {
        let table = QuirkTable::thetvdb();
        assert!(table.get(AMERICAN_DAD_TVDB_ID).is_some());
        assert!(table.get(1).is_none());
        assert!(QuirkTable::default().get(AMERICAN_DAD_TVDB_ID).is_none());
    }

    #[test]
    fn test_merge_second_season_into_first() {
        let mut episodes = vec![
            episode(1, 1, 10),
            episode(1, 2, 10),
            episode(1, 3, 10),
            episode(2, 1, 20),
            episode(2, 2, 20),
            episode(3, 1, 30),
            episode(0, 1, 99),
        ];

        merge_second_season_into_first(AMERICAN_DAD_TVDB_ID, &mut episodes).unwrap();

        let keys: Vec<(u32, u32, u32)> = episodes
            .iter()
            .map(|e| (e.season_number, e.episode_number, e.season_id))
            .collect();
        assert_eq!(
            keys,
            vec![
                (1, 1, 10),
                (1, 2, 10),
                (1, 3, 10),
                (1, 4, 10),
                (1, 5, 10),
                (2, 1, 30),
                (0, 1, 99),
            ]
        );
    }

    #[test]
    fn test_merge_requires_season_one() {
        let mut episodes = vec![episode(2, 1, 20)];
        assert_eq!(
            merge_second_season_into_first(AMERICAN_DAD_TVDB_ID, &mut episodes),
            Err(EpisodeCorrectionError::MissingSeasonOne {
                series_id: AMERICAN_DAD_TVDB_ID
            })
        );
        // Nothing was touched
        assert_eq!(episodes[0].season_number, 2);
    }
}
