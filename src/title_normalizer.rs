//! Title normalization for loose comparison
//!
//! Folds a series title down to its bare ASCII letters so that titles like
//! "The Office" and "Office" or "Grey's Anatomy" and "Greys Anatomy" compare
//! equal. The normalized form is only ever used for equality checks.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Standalone "the"/"and" words plus every character that is not an ASCII letter.
static NOISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)((\s|^)the(\s|$))|((\s|^)and(\s|$))|(?-i:[^a-zA-Z])")
        .expect("noise pattern is a valid regex")
});

/// Errors raised when a title is not usable for matching
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TitleMatchError {
    /// A required title argument was empty
    #[error("Title argument '{argument}' must not be empty")]
    EmptyTitle { argument: &'static str },
}

/// Canonicalizes a title for loose comparison
///
/// Removes the whole words "the" and "and" (case-insensitive, bounded by
/// whitespace or the string edges) and then drops everything that is not an
/// ASCII letter.
///
/// # Errors
///
/// Returns `TitleMatchError::EmptyTitle` if `title` is empty.
///
/// # Examples
///
/// ```
/// use series_resolver::normalize_title;
///
/// assert_eq!(normalize_title("The Office").unwrap(), "Office");
/// assert_eq!(normalize_title("Grey's Anatomy").unwrap(), "GreysAnatomy");
/// ```
pub fn normalize_title(title: &str) -> Result<String, TitleMatchError> {
    if title.is_empty() {
        return Err(TitleMatchError::EmptyTitle { argument: "title" });
    }

    Ok(NOISE_RE.replace_all(title, "").into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_leading_article() {
        assert_eq!(normalize_title("The Office").unwrap(), "Office");
        assert_eq!(normalize_title("the office").unwrap(), "office");
    }

    #[test]
    fn test_strips_and_between_words() {
        assert_eq!(normalize_title("Law and Order").unwrap(), "LawOrder");
        assert_eq!(normalize_title("Law AND Order").unwrap(), "LawOrder");
    }

    #[test]
    fn test_keeps_words_containing_noise() {
        // "the" inside another word is not a standalone word
        assert_eq!(normalize_title("Theodore").unwrap(), "Theodore");
        assert_eq!(normalize_title("Sandman").unwrap(), "Sandman");
        assert_eq!(normalize_title("Bathe").unwrap(), "Bathe");
    }

    #[test]
    fn test_drops_punctuation_and_digits() {
        assert_eq!(normalize_title("Grey's Anatomy").unwrap(), "GreysAnatomy");
        assert_eq!(normalize_title("24").unwrap(), "");
        assert_eq!(normalize_title("CSI: Miami (2002)").unwrap(), "CSIMiami");
    }

    #[test]
    fn test_drops_case_folding_lookalikes() {
        // KELVIN SIGN and LONG S fold to ASCII letters but are not ASCII
        assert_eq!(normalize_title("\u{212A}").unwrap(), "");
        assert_eq!(normalize_title("\u{212A}itchen \u{17F}ink").unwrap(), "itchenink");
    }

    #[test]
    fn test_adjacent_noise_words_share_a_boundary() {
        // The space between "and" and "the" is consumed by the first match
        assert_eq!(normalize_title("Doctor Who and the").unwrap(), "DoctorWhothe");
        assert_eq!(normalize_title("The Big Bang Theory").unwrap(), "BigBangTheory");
    }

    #[test]
    fn test_empty_title_is_rejected() {
        assert_eq!(
            normalize_title(""),
            Err(TitleMatchError::EmptyTitle { argument: "title" })
        );
    }
}
