//! Phrase query.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::query::{Query, TermQuery, boost_suffix, field_prefix};

/// A query that matches an ordered sequence of terms in one field.
///
/// Positional scoring belongs to the search-execution collaborator; at this
/// layer a phrase is primitive except for two degenerate shapes handled by
/// rewrite: an empty phrase is eliminated and a single-term phrase becomes a
/// plain term query.
#[derive(Debug, Clone, PartialEq)]
pub struct PhraseQuery {
    field: String,
    terms: Vec<String>,
    slop: u32,
    boost: f32,
}

impl PhraseQuery {
    /// Create a new phrase query with zero slop.
    pub fn new<F: Into<String>>(field: F, terms: Vec<String>) -> Self {
        PhraseQuery {
            field: field.into(),
            terms,
            slop: 0,
            boost: 1.0,
        }
    }

    /// Set the slop (number of position moves tolerated between terms).
    pub fn with_slop(mut self, slop: u32) -> Self {
        self.slop = slop;
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

    /// Get the phrase terms.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Get the slop.
    pub fn slop(&self) -> u32 {
        self.slop
    }

    /// Get the boost factor.
    pub fn boost(&self) -> f32 {
        self.boost
    }

    /// Set the boost factor.
    pub fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    /// Rewrite degenerate phrases; multi-term phrases are already primitive.
    pub fn rewrite(&self) -> Option<Arc<Query>> {
        match self.terms.len() {
            0 => None,
            1 => Some(Arc::new(Query::Term(
                TermQuery::new(&self.field, &self.terms[0]).with_boost(self.boost),
            ))),
            _ => Some(Arc::new(Query::Phrase(self.clone()))),
        }
    }

    /// Render in query-string form.
    pub fn to_query_string(&self, default_field: &str) -> String {
        let slop = if self.slop > 0 {
            format!("~{}", self.slop)
        } else {
            String::new()
        };
        format!(
            "{}\"{}\"{}{}",
            field_prefix(&self.field, default_field),
            self.terms.join(" "),
            slop,
            boost_suffix(self.boost)
        )
    }
}

impl Hash for PhraseQuery {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.field.hash(state);
        self.terms.hash(state);
        self.slop.hash(state);
        self.boost.to_bits().hash(state);
    }
}
