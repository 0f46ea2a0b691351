//! Title matching against catalog search results
//!
//! Decides whether a title entered by a user (or derived from a folder name)
//! refers to the same series as a catalog entry, and picks a candidate out of
//! a relevance-ordered list of search results.

use crate::catalog::SearchResult;
use crate::title_normalizer::{TitleMatchError, normalize_title};
use tracing::debug;

/// Determines whether two titles refer to the same series
///
/// Titles match if they are equal ignoring case, or if their normalized forms
/// (see [`normalize_title`]) are equal ignoring case.
///
/// # Errors
///
/// Returns `TitleMatchError::EmptyTitle` if either title is empty.
///
/// # Examples
///
/// ```
/// use series_resolver::is_title_match;
///
/// assert!(is_title_match("The Office", "Office").unwrap());
/// assert!(!is_title_match("The Office", "Parks and Recreation").unwrap());
/// ```
pub fn is_title_match(a: &str, b: &str) -> Result<bool, TitleMatchError> {
    if a.is_empty() {
        return Err(TitleMatchError::EmptyTitle { argument: "a" });
    }
    if b.is_empty() {
        return Err(TitleMatchError::EmptyTitle { argument: "b" });
    }

    let matched = a.to_lowercase() == b.to_lowercase()
        || normalize_title(a)?.eq_ignore_ascii_case(&normalize_title(b)?);

    debug!(operation = "is_title_match", a, b, matched, "Compared titles");

    Ok(matched)
}

/// Returns the first search result whose name matches `title`
///
/// Results are scanned in the given order, so the catalog's relevance ranking
/// decides between several matching entries.
///
/// # Errors
///
/// Returns `TitleMatchError::EmptyTitle` if `title` or a result name is empty.
pub fn select_first_matching<'a>(
    results: &'a [SearchResult],
    title: &str,
) -> Result<Option<&'a SearchResult>, TitleMatchError> {
    for result in results {
        if is_title_match(&result.series_name, title)? {
            debug!(title, series_id = result.id, "Search was successful");
            return Ok(Some(result));
        }
    }

    Ok(None)
}

/// Returns the id of the best candidate for `title`
///
/// This is the id of the first matching result or, if nothing matches, the
/// id of the catalog's top result. An empty result list yields `0`.
///
/// # Errors
///
/// Returns `TitleMatchError::EmptyTitle` if `title` or a result name is empty.
pub fn select_best_id(results: &[SearchResult], title: &str) -> Result<u32, TitleMatchError> {
    let Some(first) = results.first() else {
        return Ok(0);
    };

    Ok(select_first_matching(results, title)?
        .unwrap_or(first)
        .id)
}
