//! Wildcard query for pattern matching.
//!
//! Supports `*` (zero or more characters), `?` (exactly one character), and
//! `\*`/`\?` for literal wildcards. Patterns are compiled to a regex once at
//! construction; rewrite seeks the term dictionary to the longest literal
//! prefix of the pattern and tests each term in that run.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use regex::Regex;

use crate::error::{GlaiveError, Result};
use crate::index::IndexReader;
use crate::query::multi_term::DEFAULT_MAX_TERMS;
use crate::query::{MultiTermQuery, Query, boost_suffix, field_prefix};

/// A query that matches documents containing terms that match a wildcard
/// pattern.
#[derive(Debug, Clone)]
pub struct WildcardQuery {
    field: String,
    pattern: String,
    regex: Regex,
    max_terms: usize,
    boost: f32,
}

impl WildcardQuery {
    /// Create a new wildcard query.
    pub fn new<F: Into<String>, P: Into<String>>(field: F, pattern: P) -> Result<Self> {
        let field = field.into();
        let pattern = pattern.into();
        let regex = Self::compile_pattern(&pattern)?;

        Ok(WildcardQuery {
            field,
            pattern,
            regex,
            max_terms: DEFAULT_MAX_TERMS,
            boost: 1.0,
        })
    }

    /// Set the maximum number of terms the rewrite may expand to.
    pub fn with_max_terms(mut self, max_terms: usize) -> Self {
        self.max_terms = max_terms;
        self
    }

    /// Set the boost factor for this query.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the wildcard pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Get the boost factor.
    pub fn boost(&self) -> f32 {
        self.boost
    }

    /// Set the boost factor.
    pub fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    /// Check if a term matches the wildcard pattern.
    pub fn matches(&self, term: &str) -> bool {
        self.regex.is_match(term)
    }

    /// The literal run before the first unescaped wildcard character.
    fn literal_prefix(&self) -> String {
        let mut prefix = String::new();
        let mut chars = self.pattern.chars();
        while let Some(c) = chars.next() {
            match c {
                '*' | '?' => break,
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        prefix.push(escaped);
                    }
                }
                c => prefix.push(c),
            }
        }
        prefix
    }

    /// Rewrite into a bounded multi-term disjunction over matching terms.
    pub fn rewrite(&self, reader: &dyn IndexReader) -> Result<Arc<Query>> {
        let prefix = self.literal_prefix();
        let mut expanded = MultiTermQuery::with_max_terms(&self.field, self.max_terms);
        if let Some(mut terms) = reader.terms(&self.field)? {
            let mut current = terms.seek(&prefix)?;
            while let Some(term) = current {
                if !term.starts_with(&prefix) || expanded.is_full() {
                    break;
                }
                if self.matches(&term) {
                    expanded.add_term(term);
                }
                current = terms.next()?;
            }
        }
        expanded.set_boost(self.boost);
        Ok(Arc::new(Query::MultiTerm(expanded)))
    }

    /// Compile a wildcard pattern into a regex.
    fn compile_pattern(pattern: &str) -> Result<Regex> {
        let mut regex_pattern = String::new();
        regex_pattern.push('^');

        let chars: Vec<char> = pattern.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            match chars[i] {
                '\\' => {
                    if i + 1 < chars.len() {
                        match chars[i + 1] {
                            '*' => {
                                regex_pattern.push_str("\\*");
                                i += 1;
                            }
                            '?' => {
                                regex_pattern.push_str("\\?");
                                i += 1;
                            }
                            c => {
                                regex_pattern.push('\\');
                                regex_pattern.push(c);
                                i += 1;
                            }
                        }
                    } else {
                        regex_pattern.push('\\');
                    }
                }
                '*' => {
                    regex_pattern.push_str(".*");
                }
                '?' => {
                    regex_pattern.push('.');
                }
                '^' | '$' | '.' | '+' | '(' | ')' | '[' | ']' | '{' | '}' | '|' => {
                    regex_pattern.push('\\');
                    regex_pattern.push(chars[i]);
                }
                c => {
                    regex_pattern.push(c);
                }
            }
            i += 1;
        }

        regex_pattern.push('$');

        Regex::new(&regex_pattern)
            .map_err(|e| GlaiveError::invalid_argument(format!("Invalid wildcard pattern: {e}")))
    }

    /// Render in query-string form.
    pub fn to_query_string(&self, default_field: &str) -> String {
        format!(
            "{}{}{}",
            field_prefix(&self.field, default_field),
            self.pattern,
            boost_suffix(self.boost)
        )
    }
}

impl PartialEq for WildcardQuery {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field
            && self.pattern == other.pattern
            && self.max_terms == other.max_terms
            && self.boost == other.boost
    }
}

impl Hash for WildcardQuery {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.field.hash(state);
        self.pattern.hash(state);
        self.max_terms.hash(state);
        self.boost.to_bits().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MemoryIndex;

    #[test]
    fn test_wildcard_pattern_matching() {
        let query = WildcardQuery::new("field", "h?llo*").unwrap();
        assert!(query.matches("hello"));
        assert!(query.matches("hallowed"));
        assert!(!query.matches("hllo"));
    }

    #[test]
    fn test_escaped_wildcards() {
        let query = WildcardQuery::new("field", "hello\\*world").unwrap();
        assert!(query.matches("hello*world"));
        assert!(!query.matches("helloworld"));
    }

    #[test]
    fn test_literal_prefix() {
        assert_eq!(
            WildcardQuery::new("f", "abc*d").unwrap().literal_prefix(),
            "abc"
        );
        assert_eq!(WildcardQuery::new("f", "?bc").unwrap().literal_prefix(), "");
        assert_eq!(
            WildcardQuery::new("f", "a\\*b*").unwrap().literal_prefix(),
            "a*b"
        );
    }

    #[test]
    fn test_wildcard_rewrite() {
        let mut index = MemoryIndex::new();
        index.add_terms(0, "field", &["cat", "cart", "cast", "dog"]);

        let query = WildcardQuery::new("field", "ca?t").unwrap();
        let rewritten = query.rewrite(&index).unwrap();
        match &*rewritten {
            Query::MultiTerm(mtq) => {
                let terms: Vec<&str> = mtq.terms().iter().map(|t| t.term.as_str()).collect();
                assert_eq!(terms, vec!["cart", "cast"]);
            }
            other => panic!("expected multi-term query, got {other:?}"),
        }
    }
}
