//! Match-all query.

use std::hash::{Hash, Hasher};

use crate::query::boost_suffix;

/// A query that matches every document in the index.
///
/// Besides direct use, boolean rewrite synthesizes one of these when a lone
/// MUST_NOT clause survives: an exclusion needs a positive universe to
/// subtract from.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchAllQuery {
    boost: f32,
}

impl Default for MatchAllQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchAllQuery {
    /// Create a new match-all query.
    pub fn new() -> Self {
        MatchAllQuery { boost: 1.0 }
    }

    /// Set the boost factor for this query.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
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
    pub fn to_query_string(&self, _default_field: &str) -> String {
        format!("*{}", boost_suffix(self.boost))
    }
}

impl Hash for MatchAllQuery {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.boost.to_bits().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_all_query_string() {
        assert_eq!(MatchAllQuery::new().to_query_string("content"), "*");
        assert_eq!(
            MatchAllQuery::new().with_boost(2.0).to_query_string("content"),
            "*^2"
        );
    }
}
