//! Constant-score query.

use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use crate::query::{Query, boost_suffix};
use crate::search::filter::Filter;

/// A query that matches every document accepted by a filter, scoring each
/// match with the query boost.
///
/// Range rewrites produce these. The wrapped "original" query is kept as a
/// weak reference so match explanation can reach it without creating a
/// retain cycle; it plays no part in equality or hashing.
#[derive(Debug, Clone)]
pub struct ConstantScoreQuery {
    filter: Filter,
    original: Option<Weak<Query>>,
    boost: f32,
}

impl ConstantScoreQuery {
    /// Create a new constant-score query over a filter.
    pub fn new(filter: Filter) -> Self {
        ConstantScoreQuery {
            filter,
            original: None,
            boost: 1.0,
        }
    }

    /// Retain a non-owning reference to the query this one was rewritten
    /// from.
    pub fn with_original(mut self, original: &Arc<Query>) -> Self {
        self.original = Some(Arc::downgrade(original));
        self
    }

    /// Set the boost factor for this query.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Get the filter.
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Get the original query, if it is still alive.
    pub fn original(&self) -> Option<Arc<Query>> {
        self.original.as_ref().and_then(Weak::upgrade)
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
        format!(
            "ConstantScore({}){}",
            self.filter.describe(),
            boost_suffix(self.boost)
        )
    }
}

impl PartialEq for ConstantScoreQuery {
    fn eq(&self, other: &Self) -> bool {
        self.filter == other.filter && self.boost == other.boost
    }
}

impl Hash for ConstantScoreQuery {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.filter.hash(state);
        self.boost.to_bits().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::filter::RangeFilter;

    fn filter() -> Filter {
        Filter::Range(
            RangeFilter::new("num", Some("2".into()), Some("6".into()), true, true).unwrap(),
        )
    }

    #[test]
    fn test_equality_ignores_original() {
        let plain = ConstantScoreQuery::new(filter());
        let original = Arc::new(Query::MatchAll(crate::query::MatchAllQuery::new()));
        let with_ref = ConstantScoreQuery::new(filter()).with_original(&original);

        assert_eq!(plain, with_ref);
    }

    #[test]
    fn test_original_is_non_owning() {
        let original = Arc::new(Query::MatchAll(crate::query::MatchAllQuery::new()));
        let query = ConstantScoreQuery::new(filter()).with_original(&original);

        assert!(query.original().is_some());
        drop(original);
        assert!(query.original().is_none());
    }

    #[test]
    fn test_query_string() {
        let query = ConstantScoreQuery::new(filter()).with_boost(2.0);
        assert_eq!(
            query.to_query_string("content"),
            "ConstantScore(num:[2 6])^2"
        );
    }
}
