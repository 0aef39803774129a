//! Snowball stemmer backed by `rust-stemmers`.
//!
//! The English Snowball algorithm (Porter2) is aggressive:
//! "emergencies", "emergency", "emergent" and "emerge" all reduce to
//! "emerg". See <https://snowballstem.org/algorithms/english/stemmer.html>.
//!
//! Input is expected to be lowercase already.

use rust_stemmers::{Algorithm, Stemmer as RustStemmer};

use crate::analysis::token_filter::stem::Stemmer;

/// Snowball stemming for a fixed language.
pub struct SnowballStemmer {
    inner: RustStemmer,
    name: &'static str,
}

impl SnowballStemmer {
    /// Create an English Snowball stemmer.
    pub fn english() -> Self {
        SnowballStemmer {
            inner: RustStemmer::create(Algorithm::English),
            name: "snowball_english",
        }
    }
}

impl std::fmt::Debug for SnowballStemmer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnowballStemmer")
            .field("name", &self.name)
            .finish()
    }
}

impl Stemmer for SnowballStemmer {
    fn stem(&self, word: &str) -> String {
        self.inner.stem(word).into_owned()
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stem(word: &str) -> String {
        SnowballStemmer::english().stem(word)
    }

    #[test]
    fn test_emergency_family_shares_a_root() {
        let root = stem("emergency");
        assert_eq!(stem("emergencies"), root);
        assert_eq!(stem("emergent"), root);
        assert_eq!(stem("emerge"), root);
    }

    #[test]
    fn test_adverb_matches_adjective() {
        assert_eq!(stem("frequently"), stem("frequent"));
    }

    #[test]
    fn test_verb_forms() {
        let root = stem("include");
        for form in ["included", "includes", "including"] {
            assert_eq!(stem(form), root, "{form}");
        }
    }

    #[test]
    fn test_plural_tubes() {
        assert_eq!(stem("tubes"), stem("tube"));
    }

    #[test]
    fn test_name() {
        assert_eq!(SnowballStemmer::english().name(), "snowball_english");
    }
}
