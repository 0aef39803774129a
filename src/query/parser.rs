//! Query parser for converting query strings to boolean clauses.
//!
//! Supported syntax:
//! - Bare terms: `fire drill` (either may match)
//! - Required and prohibited terms: `+fire -drill`
//! - Conjunctions: `fire AND drill`, `fire OR flood`, `fire NOT drill`
//! - Phrases: `"fire drill"` (every word must occur, in any position)
//!
//! Every word and phrase goes through the index analyzer, so `Fires` and
//! `fire` produce the same clause.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;
use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::error::{Result, SearchError};

/// How a clause takes part in matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occur {
    /// The clause may match; matching raises the score.
    Should,
    /// The clause must match.
    Must,
    /// The clause must not match.
    MustNot,
}

/// One clause: a set of analyzed terms that must all occur in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub occur: Occur,
    pub terms: Vec<String>,
}

impl Clause {
    pub fn new(occur: Occur, terms: Vec<String>) -> Self {
        Clause { occur, terms }
    }

    /// Whether the clause contributes to the score.
    pub fn is_scoring(&self) -> bool {
        self.occur != Occur::MustNot
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.occur {
            Occur::Should => {}
            Occur::Must => f.write_str("+")?,
            Occur::MustNot => f.write_str("-")?,
        }
        if self.terms.len() == 1 {
            f.write_str(&self.terms[0])
        } else {
            write!(f, "\"{}\"", self.terms.join(" "))
        }
    }
}

/// A parsed query: a flat list of clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    clauses: Vec<Clause>,
}

impl ParsedQuery {
    pub fn new(clauses: Vec<Clause>) -> Self {
        ParsedQuery { clauses }
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Whether no clause survived analysis.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Whether the query can match anything at all.
    pub fn has_scoring_clauses(&self) -> bool {
        self.clauses.iter().any(Clause::is_scoring)
    }
}

impl fmt::Display for ParsedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{clause}")?;
        }
        Ok(())
    }
}

/// Parses query strings with the analyzer used at index time.
#[derive(Clone)]
pub struct QueryParser {
    analyzer: Arc<dyn Analyzer>,
}

impl QueryParser {
    /// Create a new query parser.
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        QueryParser { analyzer }
    }

    /// Parse a query string.
    ///
    /// Words that analyze to nothing (punctuation) are dropped. An
    /// unterminated phrase, or two prefix operators in a row (`+-fire`), is
    /// an error.
    pub fn parse(&self, query_str: &str) -> Result<ParsedQuery> {
        let mut clauses: Vec<Clause> = Vec::new();
        let mut parser = QueryStringParser::new(query_str.trim());

        while let Some(token) = parser.next_clause()? {
            if token.conjunction == Conjunction::And {
                if let Some(previous) = clauses.last_mut() {
                    if previous.occur == Occur::Should {
                        previous.occur = Occur::Must;
                    }
                }
            }

            let occur = match (token.prefix, token.conjunction) {
                (Some(occur), _) => occur,
                (None, Conjunction::And) => Occur::Must,
                (None, _) => Occur::Should,
            };

            let terms = self.analyze(&token.text)?;
            if terms.is_empty() {
                continue;
            }

            clauses.push(Clause::new(occur, terms));
        }

        Ok(ParsedQuery::new(clauses))
    }

    fn analyze(&self, text: &str) -> Result<Vec<String>> {
        let mut terms = self.analyzer.analyze_terms(text)?;
        let mut seen = ahash::AHashSet::new();
        terms.retain(|term| seen.insert(term.clone()));
        Ok(terms)
    }
}

impl fmt::Debug for QueryParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryParser")
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conjunction {
    None,
    And,
    Or,
}

/// A raw clause before analysis.
#[derive(Debug)]
struct RawClause {
    conjunction: Conjunction,
    prefix: Option<Occur>,
    text: String,
}

/// Internal parser for splitting query strings.
struct QueryStringParser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> QueryStringParser<'a> {
    fn new(query_str: &'a str) -> Self {
        QueryStringParser {
            chars: query_str.chars().peekable(),
        }
    }

    fn next_clause(&mut self) -> Result<Option<RawClause>> {
        let mut conjunction = Conjunction::None;
        let mut prefix = None;

        loop {
            match self.peek_word() {
                Some("AND") => {
                    self.consume_word("AND");
                    conjunction = Conjunction::And;
                }
                Some("OR") => {
                    self.consume_word("OR");
                    conjunction = Conjunction::Or;
                }
                Some("NOT") => {
                    self.consume_word("NOT");
                    prefix = Some(Occur::MustNot);
                }
                _ => break,
            }
        }

        if self.chars.peek().is_none() {
            return Ok(None);
        }

        match self.chars.peek() {
            Some('+') => {
                self.chars.next();
                if prefix.is_none() {
                    prefix = Some(Occur::Must);
                }
            }
            Some('-') => {
                self.chars.next();
                prefix = Some(Occur::MustNot);
            }
            _ => {}
        }

        if let Some(&op @ ('+' | '-')) = self.chars.peek() {
            return Err(SearchError::query(format!("unexpected '{op}' after an operator")));
        }

        let text = if self.chars.peek() == Some(&'"') {
            self.consume_phrase()?
        } else {
            self.consume_word_text()
        };

        Ok(Some(RawClause {
            conjunction,
            prefix,
            text,
        }))
    }

    fn consume_phrase(&mut self) -> Result<String> {
        // Opening quote
        self.chars.next();

        let mut phrase = String::new();
        for ch in self.chars.by_ref() {
            if ch == '"' {
                return Ok(phrase);
            }
            phrase.push(ch);
        }

        Err(SearchError::query("unterminated phrase"))
    }

    fn consume_word_text(&mut self) -> String {
        let mut word = String::new();

        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() || ch == '"' {
                break;
            }
            word.push(ch);
            self.chars.next();
        }

        word
    }

    fn consume_word(&mut self, expected: &str) {
        for _ in expected.chars() {
            self.chars.next();
        }
        self.skip_whitespace();
    }

    fn peek_word(&mut self) -> Option<&'static str> {
        self.skip_whitespace();

        let upcoming: String = self
            .chars
            .clone()
            .take_while(|c| !c.is_whitespace())
            .collect();
        let followed = self.chars.clone().nth(upcoming.chars().count()).is_some();

        match upcoming.as_str() {
            // A trailing operator is treated as a word.
            "AND" if followed => Some("AND"),
            "OR" if followed => Some("OR"),
            "NOT" if followed => Some("NOT"),
            _ => None,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.chars.next();
            } else {
                break;
            }
        }
    }
}
