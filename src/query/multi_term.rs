//! Bounded multi-term disjunction.
//!
//! The primitive form that prefix, wildcard and fuzzy queries rewrite into:
//! an explicit set of terms in one field, each carrying its own boost, with
//! a hard cap on the term count. When the cap is reached, adding a term with
//! a higher boost than the current minimum evicts that minimum; lower-boost
//! terms are discarded.

use std::hash::{Hash, Hasher};

use crate::query::{boost_suffix, field_prefix};

/// Default structural cap on expanded term counts.
pub const DEFAULT_MAX_TERMS: usize = 512;

/// One expanded term with its boost.
#[derive(Debug, Clone, PartialEq)]
pub struct BoostedTerm {
    /// The term text.
    pub term: String,
    /// Boost contributed by this term's matches.
    pub boost: f32,
}

impl Hash for BoostedTerm {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.term.hash(state);
        self.boost.to_bits().hash(state);
    }
}

/// A disjunction over an explicit, bounded set of terms.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiTermQuery {
    field: String,
    terms: Vec<BoostedTerm>,
    max_terms: usize,
    boost: f32,
}

impl MultiTermQuery {
    /// Create a new multi-term query with the default term cap.
    pub fn new<F: Into<String>>(field: F) -> Self {
        Self::with_max_terms(field, DEFAULT_MAX_TERMS)
    }

    /// Create a new multi-term query with an explicit term cap.
    pub fn with_max_terms<F: Into<String>>(field: F, max_terms: usize) -> Self {
        MultiTermQuery {
            field: field.into(),
            terms: Vec::new(),
            max_terms,
            boost: 1.0,
        }
    }

    /// Set the boost factor for this query.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Add a term with the default boost of 1.0.
    pub fn add_term<T: Into<String>>(&mut self, term: T) {
        self.add_term_boost(term, 1.0);
    }

    /// Add a term with its own boost, honoring the term cap.
    pub fn add_term_boost<T: Into<String>>(&mut self, term: T, boost: f32) {
        if self.terms.len() < self.max_terms {
            self.terms.push(BoostedTerm {
                term: term.into(),
                boost,
            });
            return;
        }
        // At capacity: evict the lowest-boost entry only for a better one.
        let min_at = self
            .terms
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.boost.total_cmp(&b.boost))
            .map(|(i, _)| i);
        if let Some(i) = min_at
            && boost > self.terms[i].boost
        {
            self.terms[i] = BoostedTerm {
                term: term.into(),
                boost,
            };
        }
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the expanded terms.
    pub fn terms(&self) -> &[BoostedTerm] {
        &self.terms
    }

    /// Number of expanded terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Check whether no terms were expanded.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Check whether the term cap has been reached.
    pub fn is_full(&self) -> bool {
        self.terms.len() >= self.max_terms
    }

    /// Get the term cap.
    pub fn max_terms(&self) -> usize {
        self.max_terms
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
        let terms: Vec<&str> = self.terms.iter().map(|t| t.term.as_str()).collect();
        format!(
            "{}\"{}\"{}",
            field_prefix(&self.field, default_field),
            terms.join("|"),
            boost_suffix(self.boost)
        )
    }
}

impl Hash for MultiTermQuery {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.field.hash(state);
        self.terms.hash(state);
        self.max_terms.hash(state);
        self.boost.to_bits().hash(state);
    }
}
