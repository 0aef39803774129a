//! Fallback titles generated from body text.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::DEFAULT_TITLE_LENGTH;

static LINE_CONTROL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\t\n\r]").expect("line control pattern is valid"));

/// Marker appended to truncated titles.
pub const ELLIPSIS: &str = "...";

/// Builds a title out of the leading characters of a document's text.
///
/// # Examples
///
/// ```
/// use simple_search::extract::TitleGenerator;
///
/// let generator = TitleGenerator::new(10);
/// assert_eq!(generator.generate("  Emergency\tprocedures \n"), "Emergencyp...");
/// assert_eq!(generator.generate("Short"), "Short");
/// assert_eq!(generator.generate(""), "");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleGenerator {
    max_chars: usize,
}

impl TitleGenerator {
    /// Create a generator keeping at most `max_chars` characters.
    pub fn new(max_chars: usize) -> Self {
        TitleGenerator { max_chars }
    }

    /// Maximum number of characters kept before the ellipsis.
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Generate a title from body text.
    ///
    /// Tabs, newlines and carriage returns are removed from the trimmed
    /// text. Text longer than the limit is cut and gets [`ELLIPSIS`];
    /// shorter text is returned as is.
    pub fn generate(&self, body_text: &str) -> String {
        let cleaned = LINE_CONTROL.replace_all(body_text.trim(), "");

        match cleaned.char_indices().nth(self.max_chars) {
            Some((cut, _)) => format!("{}{ELLIPSIS}", &cleaned[..cut]),
            None => cleaned.into_owned(),
        }
    }
}

impl Default for TitleGenerator {
    fn default() -> Self {
        TitleGenerator::new(DEFAULT_TITLE_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_text_is_truncated() {
        let generator = TitleGenerator::default();
        assert_eq!(generator.generate("Hospital liaison notes"), "Hospital l...");
    }

    #[test]
    fn test_exactly_limit_is_verbatim() {
        let generator = TitleGenerator::default();
        assert_eq!(generator.generate("0123456789"), "0123456789");
        assert_eq!(generator.generate("0123456789A"), "0123456789...");
    }

    #[test]
    fn test_control_characters_are_removed_after_trim() {
        let generator = TitleGenerator::default();
        assert_eq!(generator.generate("\n\tab\r\ncd\t\n"), "abcd");
    }

    #[test]
    fn test_inner_spaces_are_kept() {
        let generator = TitleGenerator::default();
        assert_eq!(generator.generate("a b c"), "a b c");
    }

    #[test]
    fn test_multibyte_characters_are_counted_as_chars() {
        let generator = TitleGenerator::new(3);
        assert_eq!(generator.generate("ééééé"), "ééé...");
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(TitleGenerator::default().generate("   "), "");
    }
}
