//! Query model and rewrite semantics.
//!
//! Queries form a tree of shared [`Arc`] nodes. [`Query::rewrite`] lowers
//! composite queries (fuzzy, prefix, wildcard, range, boolean) into
//! primitive, directly scorable form against a specific reader; rewriting
//! produces new query objects and may eliminate a query entirely, which is
//! signalled with `None` and means "match nothing" for the caller.

pub mod boolean;
pub mod constant_score;
pub mod fuzzy;
pub mod match_all;
pub mod multi_term;
pub mod phrase;
pub mod prefix;
pub mod range;
pub mod span;
pub mod term;
pub mod wildcard;

pub use self::boolean::{BooleanClause, BooleanQuery, Occur};
pub use self::constant_score::ConstantScoreQuery;
pub use self::fuzzy::FuzzyQuery;
pub use self::match_all::MatchAllQuery;
pub use self::multi_term::MultiTermQuery;
pub use self::phrase::PhraseQuery;
pub use self::prefix::PrefixQuery;
pub use self::range::{RangeQuery, TypedRangeQuery};
pub use self::span::{SpanQuery, SpanQueryWrapper};
pub use self::term::TermQuery;
pub use self::wildcard::WildcardQuery;

use std::sync::Arc;

use crate::error::Result;
use crate::index::IndexReader;

/// A search query.
///
/// The variant set is closed, so execution layers can match exhaustively.
/// Sub-queries are held behind `Arc` and may be referenced from multiple
/// containing queries.
#[derive(Debug, Clone, PartialEq, Hash)]
pub enum Query {
    /// Exact single-term match.
    Term(TermQuery),
    /// Combination of clauses with MUST/SHOULD/MUST_NOT semantics.
    Boolean(BooleanQuery),
    /// Ordered term sequence with slop.
    Phrase(PhraseQuery),
    /// Bounded disjunction over explicit terms with per-term boosts.
    MultiTerm(MultiTermQuery),
    /// Approximate match within a minimum-similarity threshold.
    Fuzzy(FuzzyQuery),
    /// All terms sharing a literal prefix.
    Prefix(PrefixQuery),
    /// Terms matching a `*`/`?` pattern.
    Wildcard(WildcardQuery),
    /// Lexical term range.
    Range(RangeQuery),
    /// Term range with numeric interpretation of bounds and terms.
    TypedRange(TypedRangeQuery),
    /// Filter-backed query scoring every match with a constant.
    ConstantScore(ConstantScoreQuery),
    /// Matches every document.
    MatchAll(MatchAllQuery),
    /// Span-family query (positional); primitive under rewrite.
    Span(SpanQueryWrapper),
}

impl Query {
    /// Get the boost factor for this query.
    pub fn boost(&self) -> f32 {
        match self {
            Query::Term(q) => q.boost(),
            Query::Boolean(q) => q.boost(),
            Query::Phrase(q) => q.boost(),
            Query::MultiTerm(q) => q.boost(),
            Query::Fuzzy(q) => q.boost(),
            Query::Prefix(q) => q.boost(),
            Query::Wildcard(q) => q.boost(),
            Query::Range(q) => q.boost(),
            Query::TypedRange(q) => q.boost(),
            Query::ConstantScore(q) => q.boost(),
            Query::MatchAll(q) => q.boost(),
            Query::Span(q) => q.boost(),
        }
    }

    /// Set the boost factor for this query.
    pub fn set_boost(&mut self, boost: f32) {
        match self {
            Query::Term(q) => q.set_boost(boost),
            Query::Boolean(q) => q.set_boost(boost),
            Query::Phrase(q) => q.set_boost(boost),
            Query::MultiTerm(q) => q.set_boost(boost),
            Query::Fuzzy(q) => q.set_boost(boost),
            Query::Prefix(q) => q.set_boost(boost),
            Query::Wildcard(q) => q.set_boost(boost),
            Query::Range(q) => q.set_boost(boost),
            Query::TypedRange(q) => q.set_boost(boost),
            Query::ConstantScore(q) => q.set_boost(boost),
            Query::MatchAll(q) => q.set_boost(boost),
            Query::Span(q) => q.set_boost(boost),
        }
    }

    /// Rewrite this query into primitive, scorable form against a reader.
    ///
    /// Already-primitive variants rewrite to themselves. `None` means the
    /// query was eliminated entirely and matches nothing; callers that need
    /// a positive result must handle that case rather than treat it as an
    /// error.
    pub fn rewrite(self: &Arc<Query>, reader: &dyn IndexReader) -> Result<Option<Arc<Query>>> {
        match &**self {
            Query::Boolean(q) => q.rewrite(reader),
            Query::Phrase(q) => Ok(q.rewrite()),
            Query::Fuzzy(q) => q.rewrite(reader).map(Some),
            Query::Prefix(q) => q.rewrite(reader).map(Some),
            Query::Wildcard(q) => q.rewrite(reader).map(Some),
            Query::Range(q) => Ok(Some(q.rewrite(self))),
            Query::TypedRange(q) => Ok(Some(q.rewrite(self))),
            _ => Ok(Some(Arc::clone(self))),
        }
    }

    /// Render this query in query-string form.
    ///
    /// Terms in `default_field` are printed without a field prefix.
    pub fn to_query_string(&self, default_field: &str) -> String {
        match self {
            Query::Term(q) => q.to_query_string(default_field),
            Query::Boolean(q) => q.to_query_string(default_field),
            Query::Phrase(q) => q.to_query_string(default_field),
            Query::MultiTerm(q) => q.to_query_string(default_field),
            Query::Fuzzy(q) => q.to_query_string(default_field),
            Query::Prefix(q) => q.to_query_string(default_field),
            Query::Wildcard(q) => q.to_query_string(default_field),
            Query::Range(q) => q.to_query_string(default_field),
            Query::TypedRange(q) => q.to_query_string(default_field),
            Query::ConstantScore(q) => q.to_query_string(default_field),
            Query::MatchAll(q) => q.to_query_string(default_field),
            Query::Span(q) => q.to_query_string(default_field),
        }
    }
}

macro_rules! impl_from_query {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for Query {
            fn from(q: $ty) -> Query {
                Query::$variant(q)
            }
        }
    };
}

impl_from_query!(Term, TermQuery);
impl_from_query!(Boolean, BooleanQuery);
impl_from_query!(Phrase, PhraseQuery);
impl_from_query!(MultiTerm, MultiTermQuery);
impl_from_query!(Fuzzy, FuzzyQuery);
impl_from_query!(Prefix, PrefixQuery);
impl_from_query!(Wildcard, WildcardQuery);
impl_from_query!(Range, RangeQuery);
impl_from_query!(TypedRange, TypedRangeQuery);
impl_from_query!(ConstantScore, ConstantScoreQuery);
impl_from_query!(MatchAll, MatchAllQuery);
impl_from_query!(Span, SpanQueryWrapper);

/// Render a boost suffix (`^2.5`), or nothing for the default boost.
pub(crate) fn boost_suffix(boost: f32) -> String {
    if boost == 1.0 {
        String::new()
    } else {
        format!("^{boost}")
    }
}

/// Render a `field:` prefix unless the field is the default field.
pub(crate) fn field_prefix(field: &str, default_field: &str) -> String {
    if field == default_field {
        String::new()
    } else {
        format!("{field}:")
    }
}
