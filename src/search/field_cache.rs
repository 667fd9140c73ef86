//! Per-reader field index cache for sorting.
//!
//! A [`FieldIndex`] maps document ordinal to one field's sort value. Each
//! (field, kind) pair is built with exactly one postings scan per reader and
//! cached; the cache lock is held across the build, so concurrent callers of
//! the same key block until a single build finishes and then share the
//! resulting `Arc`. A failed build caches nothing.

use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::Mutex;

use crate::error::{GlaiveError, Result};
use crate::index::IndexReader;
use crate::util::{parse_leading_float, parse_leading_int};

/// Value kind of a field index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldIndexKind {
    /// Dictionary-rank values.
    Byte,
    /// Parsed integer values.
    Int,
    /// Parsed float values.
    Float,
    /// Interned string values.
    Str,
}

/// A columnar array of one field's per-document sort values.
#[derive(Debug)]
pub enum FieldIndex {
    /// Rank of each document's term in dictionary-enumeration order, not
    /// the parsed value of the term text. Zero means "no value". This rank
    /// proxy is deliberately different from `Int` on the same data.
    Byte(Vec<u8>),
    /// Leading integer literal of each document's term; zero when absent
    /// or unparsable.
    Int(Vec<i64>),
    /// Leading float literal of each document's term; zero when absent or
    /// unparsable.
    Float(Vec<f32>),
    /// Interned string values.
    Str(StringIndex),
}

impl FieldIndex {
    /// The kind of this index.
    pub fn kind(&self) -> FieldIndexKind {
        match self {
            FieldIndex::Byte(_) => FieldIndexKind::Byte,
            FieldIndex::Int(_) => FieldIndexKind::Int,
            FieldIndex::Float(_) => FieldIndexKind::Float,
            FieldIndex::Str(_) => FieldIndexKind::Str,
        }
    }
}

/// Interned per-document string values.
///
/// `order[doc]` indexes into `values`; slot 0 is reserved to mean "no
/// value". Terms are interned in dictionary-enumeration order.
#[derive(Debug)]
pub struct StringIndex {
    /// Per-document slot into `values`.
    pub order: Vec<u32>,
    /// Deduplicated value table; `values[0]` is `None`.
    pub values: Vec<Option<String>>,
}

impl StringIndex {
    /// The string value for a document, or `None` if absent.
    pub fn value(&self, doc: u32) -> Option<&str> {
        self.values
            .get(self.order[doc as usize] as usize)
            .and_then(|v| v.as_deref())
    }
}

/// Reader-scoped cache of built field indexes.
///
/// Lifetime is tied to the reader the caller pairs it with; a new reader
/// generation gets a fresh cache.
#[derive(Debug, Default)]
pub struct FieldCache {
    entries: Mutex<AHashMap<(String, FieldIndexKind), Arc<FieldIndex>>>,
}

impl FieldCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        FieldCache::default()
    }

    /// Fetch the index for a (field, kind) pair, building it on first use.
    ///
    /// The returned `Arc` is shared by every caller; the backing array is
    /// never copied or rebuilt for the same key.
    pub fn get(
        &self,
        reader: &dyn IndexReader,
        field: &str,
        kind: FieldIndexKind,
    ) -> Result<Arc<FieldIndex>> {
        let mut entries = self.entries.lock();
        if let Some(index) = entries.get(&(field.to_string(), kind)) {
            return Ok(Arc::clone(index));
        }
        let built = Arc::new(build_field_index(reader, field, kind)?);
        entries.insert((field.to_string(), kind), Arc::clone(&built));
        Ok(built)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// Build one field index with a single pass over the field's dictionary and
/// postings.
fn build_field_index(
    reader: &dyn IndexReader,
    field: &str,
    kind: FieldIndexKind,
) -> Result<FieldIndex> {
    let mut terms = reader.terms(field)?.ok_or_else(|| {
        GlaiveError::invalid_argument(format!("field '{field}' does not exist in the index"))
    })?;
    let doc_count = reader.max_doc() as usize;

    match kind {
        FieldIndexKind::Byte => {
            let mut values = vec![0u8; doc_count];
            let mut rank: u8 = 0;
            while let Some(term) = terms.next()? {
                rank = rank.wrapping_add(1);
                broadcast(reader, field, &term, |doc| values[doc] = rank)?;
            }
            Ok(FieldIndex::Byte(values))
        }
        FieldIndexKind::Int => {
            let mut values = vec![0i64; doc_count];
            while let Some(term) = terms.next()? {
                let parsed = parse_leading_int(&term).unwrap_or(0);
                broadcast(reader, field, &term, |doc| values[doc] = parsed)?;
            }
            Ok(FieldIndex::Int(values))
        }
        FieldIndexKind::Float => {
            let mut values = vec![0f32; doc_count];
            while let Some(term) = terms.next()? {
                let parsed = parse_leading_float(&term).unwrap_or(0.0);
                broadcast(reader, field, &term, |doc| values[doc] = parsed)?;
            }
            Ok(FieldIndex::Float(values))
        }
        FieldIndexKind::Str => {
            let mut order = vec![0u32; doc_count];
            let mut values = vec![None];
            while let Some(term) = terms.next()? {
                values.push(Some(term.clone()));
                let slot = (values.len() - 1) as u32;
                broadcast(reader, field, &term, |doc| order[doc] = slot)?;
            }
            Ok(FieldIndex::Str(StringIndex { order, values }))
        }
    }
}

fn broadcast(
    reader: &dyn IndexReader,
    field: &str,
    term: &str,
    mut assign: impl FnMut(usize),
) -> Result<()> {
    if let Some(mut postings) = reader.postings(field, term)? {
        while postings.next()? {
            assign(postings.doc() as usize);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MemoryIndex;

    fn sample_index() -> MemoryIndex {
        let mut index = MemoryIndex::new();
        index.add_term(0, "num", "30");
        index.add_term(1, "num", "4");
        index.add_term(2, "num", "200");
        index
    }

    #[test]
    fn test_int_index_parses_values() {
        let index = sample_index();
        let cache = FieldCache::new();
        let built = cache.get(&index, "num", FieldIndexKind::Int).unwrap();

        match &*built {
            FieldIndex::Int(values) => assert_eq!(values, &vec![30, 4, 200]),
            other => panic!("expected int index, got {other:?}"),
        }
    }

    #[test]
    fn test_byte_index_is_rank_not_value() {
        let index = sample_index();
        let cache = FieldCache::new();
        let built = cache.get(&index, "num", FieldIndexKind::Byte).unwrap();

        // Dictionary order is "200", "30", "4": ranks 1, 2, 3. Observably
        // different from the parsed values.
        match &*built {
            FieldIndex::Byte(values) => assert_eq!(values, &vec![2, 3, 1]),
            other => panic!("expected byte index, got {other:?}"),
        }
    }

    #[test]
    fn test_string_index_reserves_absent_slot() {
        let mut index = sample_index();
        index.set_max_doc(4); // doc 3 has no value

        let cache = FieldCache::new();
        let built = cache.get(&index, "num", FieldIndexKind::Str).unwrap();

        match &*built {
            FieldIndex::Str(si) => {
                assert_eq!(si.values[0], None);
                assert_eq!(si.value(0), Some("30"));
                assert_eq!(si.value(3), None);
                assert_eq!(si.order[3], 0);
            }
            other => panic!("expected string index, got {other:?}"),
        }
    }

    #[test]
    fn test_same_key_returns_identical_array() {
        let index = sample_index();
        let cache = FieldCache::new();

        let first = cache.get(&index, "num", FieldIndexKind::Int).unwrap();
        let second = cache.get(&index, "num", FieldIndexKind::Int).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        // A different kind for the same field is a separate entry.
        let other = cache.get(&index, "num", FieldIndexKind::Float).unwrap();
        assert_eq!(other.kind(), FieldIndexKind::Float);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_unknown_field_fails_and_caches_nothing() {
        let index = sample_index();
        let cache = FieldCache::new();

        let err = cache
            .get(&index, "missing", FieldIndexKind::Int)
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(cache.is_empty());
    }
}
