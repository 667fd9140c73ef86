//! Search execution: filters, field cache, sorting, collection.

pub mod collector;
pub mod comparator;
pub mod field_cache;
pub mod filter;
pub mod searcher;
pub mod sort;

pub use self::collector::TopKCollector;
pub use self::comparator::{Comparator, CompositeComparator, FieldDoc, SortValue};
pub use self::field_cache::{FieldCache, FieldIndex, FieldIndexKind, StringIndex};
pub use self::filter::{Filter, RangeFilter, TypedRangeFilter};
pub use self::searcher::{SearchOptions, Searcher, TopDocs};
pub use self::sort::{Sort, SortField, SortKind};

use serde::Serialize;

/// A matching document with its relevance score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hit {
    /// Document ordinal.
    pub doc: u32,
    /// Relevance score.
    pub score: f32,
}
