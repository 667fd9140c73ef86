//! Span-family queries.
//!
//! Spans describe positional constraints over term occurrences. At this
//! layer they are primitive: rewrite is identity and positional execution
//! belongs to the search collaborator.

use std::hash::{Hash, Hasher};

use crate::query::{boost_suffix, field_prefix};

/// A positional span expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SpanQuery {
    /// A single term occurrence.
    Term {
        /// Field to search in.
        field: String,
        /// Term text.
        term: String,
    },
    /// A span ending within the first `end` positions.
    First {
        /// The constrained span.
        inner: Box<SpanQuery>,
        /// Last allowed end position.
        end: u32,
    },
    /// Multiple spans within `slop` positions of each other.
    Near {
        /// Component spans.
        clauses: Vec<SpanQuery>,
        /// Maximum allowed distance.
        slop: u32,
        /// Whether components must appear in order.
        in_order: bool,
    },
    /// Union of spans.
    Or {
        /// Alternative spans.
        clauses: Vec<SpanQuery>,
    },
    /// A span not overlapping another.
    Not {
        /// The span to keep.
        include: Box<SpanQuery>,
        /// The span to avoid.
        exclude: Box<SpanQuery>,
    },
}

impl SpanQuery {
    /// Render in query-string form.
    pub fn to_query_string(&self, default_field: &str) -> String {
        match self {
            SpanQuery::Term { field, term } => {
                format!("span_term({}{})", field_prefix(field, default_field), term)
            }
            SpanQuery::First { inner, end } => {
                format!("span_first({}, {end})", inner.to_query_string(default_field))
            }
            SpanQuery::Near {
                clauses,
                slop,
                in_order,
            } => {
                let parts: Vec<String> = clauses
                    .iter()
                    .map(|c| c.to_query_string(default_field))
                    .collect();
                format!(
                    "span_near([{}], slop: {slop}, in_order: {in_order})",
                    parts.join(", ")
                )
            }
            SpanQuery::Or { clauses } => {
                let parts: Vec<String> = clauses
                    .iter()
                    .map(|c| c.to_query_string(default_field))
                    .collect();
                format!("span_or([{}])", parts.join(", "))
            }
            SpanQuery::Not { include, exclude } => format!(
                "span_not({}, {})",
                include.to_query_string(default_field),
                exclude.to_query_string(default_field)
            ),
        }
    }
}

/// A span expression carried as a top-level query with a boost.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanQueryWrapper {
    span: SpanQuery,
    boost: f32,
}

impl SpanQueryWrapper {
    /// Wrap a span expression as a query.
    pub fn new(span: SpanQuery) -> Self {
        SpanQueryWrapper { span, boost: 1.0 }
    }

    /// Set the boost factor for this query.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Get the span expression.
    pub fn span(&self) -> &SpanQuery {
        &self.span
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
            "{}{}",
            self.span.to_query_string(default_field),
            boost_suffix(self.boost)
        )
    }
}

impl Hash for SpanQueryWrapper {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.span.hash(state);
        self.boost.to_bits().hash(state);
    }
}
