//! Comparators binding sort keys to one reader.
//!
//! A [`Comparator`] is the runtime form of a [`SortField`]: its `Auto` kind
//! resolved, its field index fetched from the cache (pseudo-fields carry
//! none), and its direction recorded. A [`CompositeComparator`] evaluates
//! the keys in order and falls back to ascending document id when every key
//! ties, which makes the order total.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;

use crate::error::{GlaiveError, Result};
use crate::index::IndexReader;
use crate::search::Hit;
use crate::search::field_cache::{FieldCache, FieldIndex, FieldIndexKind};
use crate::search::sort::{Sort, SortField, SortKind};

/// One extracted sort value, tagged with its source kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SortValue {
    /// Relevance score.
    Score(f32),
    /// Document id.
    Doc(u32),
    /// Dictionary rank.
    Byte(u8),
    /// Parsed integer.
    Int(i64),
    /// Parsed float.
    Float(f32),
    /// Interned string, `None` when the document has no value.
    Str(Option<String>),
}

/// A hit plus its sort values, one per sort key.
///
/// Values are materialized only for hits that survive into the final top-N,
/// at drain time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDoc {
    /// The underlying hit.
    pub hit: Hit,
    /// Extracted sort values in sort-key order.
    pub fields: Vec<SortValue>,
}

/// A sort key bound to one reader.
#[derive(Debug, Clone)]
pub struct Comparator {
    kind: SortKind,
    reverse: bool,
    index: Option<Arc<FieldIndex>>,
}

impl Comparator {
    /// Bind one sort field to a reader, resolving `Auto` and building or
    /// fetching the backing field index.
    pub fn bind(
        sort_field: &SortField,
        reader: &dyn IndexReader,
        cache: &FieldCache,
    ) -> Result<Comparator> {
        let kind = sort_field.resolve_kind(reader)?;
        let index = match kind {
            SortKind::Score | SortKind::Doc => None,
            SortKind::Byte | SortKind::Int | SortKind::Float | SortKind::Str => {
                let field = sort_field.field().ok_or_else(|| {
                    GlaiveError::invalid_argument("field-backed sort requires a field name")
                })?;
                let cache_kind = match kind {
                    SortKind::Byte => FieldIndexKind::Byte,
                    SortKind::Int => FieldIndexKind::Int,
                    SortKind::Float => FieldIndexKind::Float,
                    _ => FieldIndexKind::Str,
                };
                Some(cache.get(reader, field, cache_kind)?)
            }
            SortKind::Auto => unreachable!("auto kind is resolved above"),
        };
        Ok(Comparator {
            kind,
            reverse: sort_field.is_reverse(),
            index,
        })
    }

    /// Check whether this key is reversed.
    pub fn is_reverse(&self) -> bool {
        self.reverse
    }

    /// Compare two hits on this key alone, ignoring the reverse flag.
    ///
    /// `Less` means `a` ranks ahead of `b`.
    pub fn key_compare(&self, a: &Hit, b: &Hit) -> Ordering {
        match (self.kind, self.index.as_deref()) {
            // Operands swapped so that the higher score ranks first
            // without a reverse flag.
            (SortKind::Score, _) => b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal),
            (SortKind::Doc, _) => a.doc.cmp(&b.doc),
            (SortKind::Byte, Some(FieldIndex::Byte(values))) => {
                values[a.doc as usize].cmp(&values[b.doc as usize])
            }
            (SortKind::Int, Some(FieldIndex::Int(values))) => {
                values[a.doc as usize].cmp(&values[b.doc as usize])
            }
            // NaN ordering is unspecified; equal is as good as anything.
            (SortKind::Float, Some(FieldIndex::Float(values))) => values[a.doc as usize]
                .partial_cmp(&values[b.doc as usize])
                .unwrap_or(Ordering::Equal),
            (SortKind::Str, Some(FieldIndex::Str(si))) => {
                // A document without a value sorts after any document with
                // one; two absent values tie. The absent/present asymmetry
                // is a known boundary case kept from the original design.
                match (si.value(a.doc), si.value(b.doc)) {
                    (None, None) => Ordering::Equal,
                    (None, Some(_)) => Ordering::Greater,
                    (Some(_), None) => Ordering::Less,
                    (Some(a), Some(b)) => a.cmp(b),
                }
            }
            _ => Ordering::Equal,
        }
    }

    /// Extract this key's sort value for a hit.
    pub fn value(&self, hit: &Hit) -> SortValue {
        match (self.kind, self.index.as_deref()) {
            (SortKind::Score, _) => SortValue::Score(hit.score),
            (SortKind::Doc, _) => SortValue::Doc(hit.doc),
            (SortKind::Byte, Some(FieldIndex::Byte(values))) => {
                SortValue::Byte(values[hit.doc as usize])
            }
            (SortKind::Int, Some(FieldIndex::Int(values))) => {
                SortValue::Int(values[hit.doc as usize])
            }
            (SortKind::Float, Some(FieldIndex::Float(values))) => {
                SortValue::Float(values[hit.doc as usize])
            }
            (SortKind::Str, Some(FieldIndex::Str(si))) => {
                SortValue::Str(si.value(hit.doc).map(str::to_string))
            }
            _ => SortValue::Doc(hit.doc),
        }
    }
}

/// All of a sort's keys bound to one reader.
#[derive(Debug, Clone)]
pub struct CompositeComparator {
    comparators: Vec<Comparator>,
}

impl CompositeComparator {
    /// Bind every key of a sort to a reader.
    pub fn bind(sort: &Sort, reader: &dyn IndexReader, cache: &FieldCache) -> Result<Self> {
        let comparators = sort
            .fields()
            .iter()
            .map(|sf| Comparator::bind(sf, reader, cache))
            .collect::<Result<Vec<_>>>()?;
        Ok(CompositeComparator { comparators })
    }

    /// Compare two hits under the full sort.
    ///
    /// Keys are evaluated in order, each negated by its reverse flag; the
    /// first decisive key wins and full ties fall back to ascending
    /// document id.
    pub fn compare(&self, a: &Hit, b: &Hit) -> Ordering {
        for comparator in &self.comparators {
            let mut ord = comparator.key_compare(a, b);
            if comparator.is_reverse() {
                ord = ord.reverse();
            }
            if ord != Ordering::Equal {
                return ord;
            }
        }
        a.doc.cmp(&b.doc)
    }

    /// Extract the sort values of every key for a hit.
    pub fn values(&self, hit: &Hit) -> Vec<SortValue> {
        self.comparators.iter().map(|c| c.value(hit)).collect()
    }
}
