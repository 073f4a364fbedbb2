//! Allow-list validation for posting search terms.

use once_cell::sync::Lazy;
use regex::Regex;

/// Latin letters, Hangul syllables, digits, whitespace, `-`, `_`, `,`, `/` and the three
/// bracket pairs. Anchored so the whole term must match.
static SEARCH_QUERY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z\x{AC00}-\x{D7A3}0-9\s_,/(){}\[\]-]*$").expect("valid search regex")
});

/// Raised when a search term contains a character outside the allow-list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "search terms may only contain letters, Hangul, digits, whitespace, '-', '_', ',', '/', and (), {{}}, [] brackets"
)]
pub struct InvalidSearchQuery {
    pub query: String,
}

/// A search term that passed [`validate`]. Only constructible through validation, so the
/// gateway never sees an unchecked term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Validate a raw search term. The empty string is accepted.
pub fn validate(raw: &str) -> Result<SearchQuery, InvalidSearchQuery> {
    if SEARCH_QUERY_PATTERN.is_match(raw) {
        Ok(SearchQuery(raw.to_string()))
    } else {
        Err(InvalidSearchQuery {
            query: raw.to_string(),
        })
    }
}
