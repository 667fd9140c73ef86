//! Range queries.
//!
//! Both variants rewrite into a constant-score query wrapping the matching
//! filter; the actual dictionary scan happens when the filter's bitset is
//! computed. Bound validation happens at query construction.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::Result;
use crate::query::{ConstantScoreQuery, Query, boost_suffix};
use crate::search::filter::{Filter, RangeFilter, TypedRangeFilter};

/// A query matching documents whose field terms fall in a lexical range.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeQuery {
    filter: RangeFilter,
    boost: f32,
}

impl RangeQuery {
    /// Create a new range query. Bounds are validated up front.
    pub fn new<F: Into<String>>(
        field: F,
        lower: Option<String>,
        upper: Option<String>,
        include_lower: bool,
        include_upper: bool,
    ) -> Result<Self> {
        Ok(RangeQuery {
            filter: RangeFilter::new(field, lower, upper, include_lower, include_upper)?,
            boost: 1.0,
        })
    }

    /// Set the boost factor for this query.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        self.filter.field()
    }

    /// Get the boost factor.
    pub fn boost(&self) -> f32 {
        self.boost
    }

    /// Set the boost factor.
    pub fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    /// Rewrite into a constant-score query over the range filter, retaining
    /// a weak back-reference to the original query for match explanation.
    pub fn rewrite(&self, original: &Arc<Query>) -> Arc<Query> {
        Arc::new(Query::ConstantScore(
            ConstantScoreQuery::new(Filter::Range(self.filter.clone()))
                .with_original(original)
                .with_boost(self.boost),
        ))
    }

    /// Render in query-string form.
    pub fn to_query_string(&self, _default_field: &str) -> String {
        format!("{}{}", self.filter.describe(), boost_suffix(self.boost))
    }
}

impl Hash for RangeQuery {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.filter.hash(state);
        self.boost.to_bits().hash(state);
    }
}

/// A range query that interprets bounds and terms numerically when every
/// given bound parses as a number, falling back to the lexical range scan
/// otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedRangeQuery {
    filter: TypedRangeFilter,
    boost: f32,
}

impl TypedRangeQuery {
    /// Create a new typed range query. Bounds are validated up front,
    /// numerically when both parse.
    pub fn new<F: Into<String>>(
        field: F,
        lower: Option<String>,
        upper: Option<String>,
        include_lower: bool,
        include_upper: bool,
    ) -> Result<Self> {
        Ok(TypedRangeQuery {
            filter: TypedRangeFilter::new(field, lower, upper, include_lower, include_upper)?,
            boost: 1.0,
        })
    }

    /// Set the boost factor for this query.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        self.filter.field()
    }

    /// Get the boost factor.
    pub fn boost(&self) -> f32 {
        self.boost
    }

    /// Set the boost factor.
    pub fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    /// Rewrite into a constant-score query over the typed range filter.
    pub fn rewrite(&self, original: &Arc<Query>) -> Arc<Query> {
        Arc::new(Query::ConstantScore(
            ConstantScoreQuery::new(Filter::TypedRange(self.filter.clone()))
                .with_original(original)
                .with_boost(self.boost),
        ))
    }

    /// Render in query-string form.
    pub fn to_query_string(&self, _default_field: &str) -> String {
        format!("{}{}", self.filter.describe(), boost_suffix(self.boost))
    }
}

impl Hash for TypedRangeQuery {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.filter.hash(state);
        self.boost.to_bits().hash(state);
    }
}
