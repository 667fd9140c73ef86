//! In-memory index reader.
//!
//! `MemoryIndex` keeps per-field term dictionaries in `BTreeMap`s so that
//! term enumeration naturally runs in dictionary order. It backs the unit
//! and integration tests, doc examples and benches; production readers are
//! expected to implement [`IndexReader`] over a real inverted index.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::ops::Bound;

use crate::error::Result;
use crate::index::{IndexReader, PostingsEnum, TermsEnum};

/// A simple in-memory inverted index.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    /// field -> term -> sorted doc ids
    fields: BTreeMap<String, BTreeMap<String, Vec<u32>>>,
    max_doc: u32,
}

impl MemoryIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        MemoryIndex::default()
    }

    /// Add one token occurrence for a document.
    pub fn add_term<F: Into<String>, T: Into<String>>(&mut self, doc: u32, field: F, term: T) {
        let postings = self
            .fields
            .entry(field.into())
            .or_default()
            .entry(term.into())
            .or_default();
        if postings.last() != Some(&doc) {
            postings.push(doc);
            postings.sort_unstable();
        }
        self.max_doc = self.max_doc.max(doc + 1);
    }

    /// Add several tokens of one field for a document.
    pub fn add_terms<F: Into<String>>(&mut self, doc: u32, field: F, terms: &[&str]) {
        let field = field.into();
        for term in terms {
            self.add_term(doc, field.clone(), *term);
        }
    }

    /// Declare a field with no terms yet.
    pub fn add_field<F: Into<String>>(&mut self, field: F) {
        self.fields.entry(field.into()).or_default();
    }

    /// Raise the document count without adding terms.
    pub fn set_max_doc(&mut self, max_doc: u32) {
        self.max_doc = self.max_doc.max(max_doc);
    }

    /// Number of unique terms in a field.
    pub fn term_count(&self, field: &str) -> usize {
        self.fields.get(field).map_or(0, |t| t.len())
    }
}

impl IndexReader for MemoryIndex {
    fn max_doc(&self) -> u32 {
        self.max_doc
    }

    fn field_names(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }

    fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    fn terms(&self, field: &str) -> Result<Option<Box<dyn TermsEnum + '_>>> {
        Ok(self.fields.get(field).map(|terms| {
            Box::new(MemoryTermsEnum {
                terms,
                iter: terms.range::<str, _>(..),
            }) as Box<dyn TermsEnum>
        }))
    }

    fn postings(&self, field: &str, term: &str) -> Result<Option<Box<dyn PostingsEnum + '_>>> {
        let docs = self.fields.get(field).and_then(|terms| terms.get(term));
        Ok(docs.map(|docs| {
            Box::new(MemoryPostingsEnum {
                docs,
                position: None,
            }) as Box<dyn PostingsEnum>
        }))
    }
}

/// Term cursor over one field of a `MemoryIndex`.
struct MemoryTermsEnum<'a> {
    terms: &'a BTreeMap<String, Vec<u32>>,
    iter: btree_map::Range<'a, String, Vec<u32>>,
}

impl TermsEnum for MemoryTermsEnum<'_> {
    fn seek(&mut self, target: &str) -> Result<Option<String>> {
        self.iter = self
            .terms
            .range::<str, _>((Bound::Included(target), Bound::Unbounded));
        self.next()
    }

    fn next(&mut self) -> Result<Option<String>> {
        Ok(self.iter.next().map(|(term, _)| term.clone()))
    }
}

/// Postings cursor over one term's doc ids.
struct MemoryPostingsEnum<'a> {
    docs: &'a [u32],
    position: Option<usize>,
}

impl PostingsEnum for MemoryPostingsEnum<'_> {
    fn next(&mut self) -> Result<bool> {
        let next = self.position.map_or(0, |p| p + 1);
        self.position = Some(next);
        Ok(next < self.docs.len())
    }

    fn doc(&self) -> u32 {
        self.position.map_or(u32::MAX, |p| self.docs[p])
    }
}
