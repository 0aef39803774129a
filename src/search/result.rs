//! Query results.

use serde::{Deserialize, Serialize};

use crate::document::DocumentId;

/// Returned for a blank query.
pub const EMPTY_QUERY_MESSAGE: &str = "please enter text to search";

/// Returned when no index has been published yet.
pub const NO_INDEX_MESSAGE: &str = "no index available";

/// Prefix of the message for a query without hits. Returned alone when the
/// query could not be evaluated.
pub const NO_MATCHES_MESSAGE: &str = "did not find any matches";

/// One ranked document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: DocumentId,
    pub uri: String,
    pub display_text: String,
    pub score: f32,
}

/// Outcome of a query; hits are ordered by score, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub not_found: bool,
    pub message: String,
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

impl SearchResult {
    fn not_found<S: Into<String>>(message: S) -> Self {
        SearchResult {
            not_found: true,
            message: message.into(),
            hits: Vec::new(),
        }
    }

    /// Result for a blank query.
    pub fn empty_query() -> Self {
        Self::not_found(EMPTY_QUERY_MESSAGE)
    }

    /// Result for a query issued before any index exists.
    pub fn no_index() -> Self {
        Self::not_found(NO_INDEX_MESSAGE)
    }

    /// Result for a query that matched nothing.
    pub fn no_matches(query: &str) -> Self {
        Self::not_found(format!("{NO_MATCHES_MESSAGE} for: {query}"))
    }

    /// Result for a query that failed internally.
    pub fn failed() -> Self {
        Self::not_found(NO_MATCHES_MESSAGE)
    }

    /// Result carrying hits; falls back to [`SearchResult::no_matches`]
    /// when `hits` is empty.
    pub fn found(query: &str, hits: Vec<SearchHit>) -> Self {
        if hits.is_empty() {
            return Self::no_matches(query);
        }

        SearchResult {
            not_found: false,
            message: format!("found {} matches for: {query}", hits.len()),
            hits,
        }
    }

    /// Number of hits.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Whether there are no hits.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(score: f32) -> SearchHit {
        SearchHit {
            id: DocumentId::new_v4(),
            uri: "/pages/a.html".to_string(),
            display_text: "A".to_string(),
            score,
        }
    }

    #[test]
    fn test_messages() {
        assert_eq!(SearchResult::empty_query().message, "please enter text to search");
        assert_eq!(SearchResult::no_index().message, "no index available");
        assert_eq!(
            SearchResult::no_matches("volcano").message,
            "did not find any matches for: volcano"
        );
        assert_eq!(SearchResult::failed().message, "did not find any matches");
    }

    #[test]
    fn test_found() {
        let result = SearchResult::found("fire", vec![hit(2.0), hit(1.0)]);

        assert!(!result.not_found);
        assert_eq!(result.message, "found 2 matches for: fire");
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_found_without_hits() {
        let result = SearchResult::found("fire", Vec::new());

        assert!(result.not_found);
        assert_eq!(result.message, "did not find any matches for: fire");
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(SearchResult::no_index()).unwrap();

        assert_eq!(json["not_found"], true);
        assert_eq!(json["message"], "no index available");
        assert!(json["hits"].as_array().unwrap().is_empty());
    }
}
