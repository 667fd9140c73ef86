//! Index-reading collaborator boundary.
//!
//! This core never touches the on-disk index format. Everything it needs is
//! expressed through [`IndexReader`]: ordered term enumeration per field,
//! postings enumeration per term, and the document count. The in-memory
//! implementation in [`memory`] exists for tests, examples and benches.

pub mod memory;

pub use self::memory::MemoryIndex;

use crate::error::Result;

/// Read-only view of one index generation.
///
/// Implementations are expected to be cheap to query concurrently; all
/// mutable per-reader state in this crate (the field cache) lives outside
/// the reader itself.
pub trait IndexReader: Send + Sync {
    /// One past the highest document id in this reader.
    fn max_doc(&self) -> u32;

    /// All field names known to this reader.
    fn field_names(&self) -> Vec<String>;

    /// Check whether a field exists in this reader.
    fn has_field(&self, field: &str) -> bool;

    /// Ordered term enumeration for a field, or `None` if the field is
    /// unknown to this reader.
    fn terms(&self, field: &str) -> Result<Option<Box<dyn TermsEnum + '_>>>;

    /// Postings enumeration for one term, or `None` if the field or term
    /// is absent.
    fn postings(&self, field: &str, term: &str) -> Result<Option<Box<dyn PostingsEnum + '_>>>;
}

/// Cursor over one field's term dictionary, in dictionary (lexical) order.
pub trait TermsEnum {
    /// Position at the first term `>= target` and return it.
    fn seek(&mut self, target: &str) -> Result<Option<String>>;

    /// Advance to the next term and return it.
    fn next(&mut self) -> Result<Option<String>>;
}

/// Cursor over one term's postings list, in document id order.
pub trait PostingsEnum {
    /// Advance to the next document. Returns `false` when exhausted.
    fn next(&mut self) -> Result<bool>;

    /// The current document id. Only valid after `next` returned `true`.
    fn doc(&self) -> u32;
}
