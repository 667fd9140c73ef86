//! Boolean query and its rewrite.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::Result;
use crate::index::IndexReader;
use crate::query::{MatchAllQuery, Query, boost_suffix};

/// Occurrence requirements for boolean clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occur {
    /// The clause must match (equivalent to AND).
    Must,
    /// The clause should match (equivalent to OR).
    Should,
    /// The clause must not match (equivalent to NOT).
    MustNot,
}

impl Occur {
    /// Query-string prefix for this occurrence.
    pub fn symbol(&self) -> &'static str {
        match self {
            Occur::Must => "+",
            Occur::Should => "",
            Occur::MustNot => "-",
        }
    }
}

/// A clause in a boolean query.
///
/// The clause itself belongs to exactly one `BooleanQuery`; the query it
/// wraps is shared.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct BooleanClause {
    /// The query for this clause.
    pub query: Arc<Query>,
    /// The occurrence requirement.
    pub occur: Occur,
}

impl BooleanClause {
    /// Create a new boolean clause.
    pub fn new(query: Arc<Query>, occur: Occur) -> Self {
        BooleanClause { query, occur }
    }

    /// Create a MUST clause.
    pub fn must(query: Arc<Query>) -> Self {
        BooleanClause::new(query, Occur::Must)
    }

    /// Create a SHOULD clause.
    pub fn should(query: Arc<Query>) -> Self {
        BooleanClause::new(query, Occur::Should)
    }

    /// Create a MUST_NOT clause.
    pub fn must_not(query: Arc<Query>) -> Self {
        BooleanClause::new(query, Occur::MustNot)
    }
}

/// A boolean query that combines multiple queries with boolean logic.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanQuery {
    clauses: Vec<BooleanClause>,
    boost: f32,
}

impl BooleanQuery {
    /// Create a new empty boolean query.
    pub fn new() -> Self {
        BooleanQuery {
            clauses: Vec::new(),
            boost: 1.0,
        }
    }

    /// Add a clause to this boolean query.
    pub fn add_clause(&mut self, clause: BooleanClause) {
        self.clauses.push(clause);
    }

    /// Add a MUST clause.
    pub fn add_must(&mut self, query: Arc<Query>) {
        self.add_clause(BooleanClause::must(query));
    }

    /// Add a SHOULD clause.
    pub fn add_should(&mut self, query: Arc<Query>) {
        self.add_clause(BooleanClause::should(query));
    }

    /// Add a MUST_NOT clause.
    pub fn add_must_not(&mut self, query: Arc<Query>) {
        self.add_clause(BooleanClause::must_not(query));
    }

    /// Set the boost factor.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Get the clauses.
    pub fn clauses(&self) -> &[BooleanClause] {
        &self.clauses
    }

    /// Check if this query has no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Get the boost factor.
    pub fn boost(&self) -> f32 {
        self.boost
    }

    /// Set the boost factor.
    pub fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    /// Rewrite this boolean query against a reader.
    ///
    /// Each clause's inner query is rewritten recursively; clauses whose
    /// rewrite yields no query are dropped. The result depends on how many
    /// clauses survive:
    ///
    /// - zero: the whole query is eliminated (`None`);
    /// - one non-MUST_NOT clause: the inner query is unwrapped as-is. The
    ///   boolean query's own boost is not transferred onto it — a known
    ///   limitation kept for compatibility;
    /// - one MUST_NOT clause: a new boolean query pairing that exclusion
    ///   with a required match-all clause;
    /// - otherwise: a boolean query taking ownership of the surviving
    ///   clauses without per-clause copies.
    pub fn rewrite(&self, reader: &dyn IndexReader) -> Result<Option<Arc<Query>>> {
        let mut survivors = Vec::with_capacity(self.clauses.len());
        for clause in &self.clauses {
            if let Some(rewritten) = clause.query.rewrite(reader)? {
                survivors.push(BooleanClause::new(rewritten, clause.occur));
            }
        }

        match survivors.len() {
            0 => Ok(None),
            1 if survivors[0].occur != Occur::MustNot => {
                let clause = survivors.pop().expect("one surviving clause");
                Ok(Some(clause.query))
            }
            1 => {
                let mut rewritten = BooleanQuery::new().with_boost(self.boost);
                rewritten.add_clause(survivors.pop().expect("one surviving clause"));
                rewritten.add_must(Arc::new(Query::MatchAll(MatchAllQuery::new())));
                Ok(Some(Arc::new(Query::Boolean(rewritten))))
            }
            _ => {
                let rewritten = BooleanQuery {
                    clauses: survivors,
                    boost: self.boost,
                };
                Ok(Some(Arc::new(Query::Boolean(rewritten))))
            }
        }
    }

    /// Render in query-string form.
    pub fn to_query_string(&self, default_field: &str) -> String {
        let clauses: Vec<String> = self
            .clauses
            .iter()
            .map(|clause| {
                format!(
                    "{}{}",
                    clause.occur.symbol(),
                    clause.query.to_query_string(default_field)
                )
            })
            .collect();
        format!("({}){}", clauses.join(" "), boost_suffix(self.boost))
    }
}

impl Default for BooleanQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl Hash for BooleanQuery {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.clauses.hash(state);
        self.boost.to_bits().hash(state);
    }
}
