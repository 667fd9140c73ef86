//! Prefix query.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::Result;
use crate::index::IndexReader;
use crate::query::multi_term::DEFAULT_MAX_TERMS;
use crate::query::{MultiTermQuery, Query, boost_suffix, field_prefix};

/// A query that matches every term sharing a literal prefix.
///
/// Rewrite seeks the term dictionary to the prefix and scans forward;
/// dictionary order guarantees the matching terms form a contiguous run, so
/// the scan stops at the first term that no longer shares the prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixQuery {
    field: String,
    prefix: String,
    max_terms: usize,
    boost: f32,
}

impl PrefixQuery {
    /// Create a new prefix query with the default expansion cap.
    pub fn new<F: Into<String>, P: Into<String>>(field: F, prefix: P) -> Self {
        PrefixQuery {
            field: field.into(),
            prefix: prefix.into(),
            max_terms: DEFAULT_MAX_TERMS,
            boost: 1.0,
        }
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

    /// Get the prefix text.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Get the boost factor.
    pub fn boost(&self) -> f32 {
        self.boost
    }

    /// Set the boost factor.
    pub fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    /// Rewrite into a bounded multi-term disjunction over the prefix run.
    ///
    /// An unknown field produces an empty disjunction, which matches
    /// nothing. The original boost carries over onto the produced query.
    pub fn rewrite(&self, reader: &dyn IndexReader) -> Result<Arc<Query>> {
        let mut expanded = MultiTermQuery::with_max_terms(&self.field, self.max_terms);
        if let Some(mut terms) = reader.terms(&self.field)? {
            let mut current = terms.seek(&self.prefix)?;
            while let Some(term) = current {
                if !term.starts_with(&self.prefix) || expanded.is_full() {
                    break;
                }
                expanded.add_term(term);
                current = terms.next()?;
            }
        }
        expanded.set_boost(self.boost);
        Ok(Arc::new(Query::MultiTerm(expanded)))
    }

    /// Render in query-string form.
    pub fn to_query_string(&self, default_field: &str) -> String {
        format!(
            "{}{}*{}",
            field_prefix(&self.field, default_field),
            self.prefix,
            boost_suffix(self.boost)
        )
    }
}

impl Hash for PrefixQuery {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.field.hash(state);
        self.prefix.hash(state);
        self.max_terms.hash(state);
        self.boost.to_bits().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MemoryIndex;

    fn reader() -> MemoryIndex {
        let mut index = MemoryIndex::new();
        index.add_terms(0, "field", &["ab", "b"]);
        index.add_terms(1, "field", &["abc"]);
        index.add_terms(2, "field", &["abd"]);
        index
    }

    #[test]
    fn test_prefix_expands_contiguous_run() {
        let reader = reader();
        let query = PrefixQuery::new("field", "ab");

        let rewritten = query.rewrite(&reader).unwrap();
        match &*rewritten {
            Query::MultiTerm(mtq) => {
                let terms: Vec<&str> = mtq.terms().iter().map(|t| t.term.as_str()).collect();
                assert_eq!(terms, vec!["ab", "abc", "abd"]);
            }
            other => panic!("expected multi-term query, got {other:?}"),
        }
    }

    #[test]
    fn test_prefix_preserves_boost() {
        let reader = reader();
        let query = PrefixQuery::new("field", "ab").with_boost(2.5);

        let rewritten = query.rewrite(&reader).unwrap();
        assert_eq!(rewritten.boost(), 2.5);
    }

    #[test]
    fn test_prefix_respects_term_cap() {
        let reader = reader();
        let query = PrefixQuery::new("field", "ab").with_max_terms(2);

        let rewritten = query.rewrite(&reader).unwrap();
        match &*rewritten {
            Query::MultiTerm(mtq) => assert_eq!(mtq.len(), 2),
            other => panic!("expected multi-term query, got {other:?}"),
        }
    }

    #[test]
    fn test_prefix_on_unknown_field_matches_nothing() {
        let reader = reader();
        let query = PrefixQuery::new("missing", "ab");

        let rewritten = query.rewrite(&reader).unwrap();
        match &*rewritten {
            Query::MultiTerm(mtq) => assert!(mtq.is_empty()),
            other => panic!("expected multi-term query, got {other:?}"),
        }
    }
}
