//! Single-term query.

use std::hash::{Hash, Hasher};

use crate::query::{boost_suffix, field_prefix};

/// A query that matches documents containing one exact term.
#[derive(Debug, Clone, PartialEq)]
pub struct TermQuery {
    field: String,
    term: String,
    boost: f32,
}

impl TermQuery {
    /// Create a new term query.
    pub fn new<F: Into<String>, T: Into<String>>(field: F, term: T) -> Self {
        TermQuery {
            field: field.into(),
            term: term.into(),
            boost: 1.0,
        }
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

    /// Get the term text.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Get the boost factor.
    pub fn boost(&self) -> f32 {
        self.boost
    }

    /// Set the boost factor.
    pub fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    /// Render in query-string form.
    pub fn to_query_string(&self, default_field: &str) -> String {
        format!(
            "{}{}{}",
            field_prefix(&self.field, default_field),
            self.term,
            boost_suffix(self.boost)
        )
    }
}

impl Hash for TermQuery {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.field.hash(state);
        self.term.hash(state);
        self.boost.to_bits().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_query_creation() {
        let query = TermQuery::new("content", "hello").with_boost(1.5);

        assert_eq!(query.field(), "content");
        assert_eq!(query.term(), "hello");
        assert_eq!(query.boost(), 1.5);
    }

    #[test]
    fn test_term_query_string() {
        let query = TermQuery::new("title", "rust");
        assert_eq!(query.to_query_string("content"), "title:rust");
        assert_eq!(query.to_query_string("title"), "rust");

        let boosted = TermQuery::new("title", "rust").with_boost(2.0);
        assert_eq!(boosted.to_query_string("content"), "title:rust^2");
    }

    #[test]
    fn test_term_query_eq() {
        let a = TermQuery::new("f", "t");
        let b = TermQuery::new("f", "t");
        let c = TermQuery::new("f", "t").with_boost(2.0);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
