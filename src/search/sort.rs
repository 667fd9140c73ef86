//! Sort keys.

use serde::{Deserialize, Serialize};

use crate::error::{GlaiveError, Result};
use crate::index::IndexReader;

/// Value kind a sort key compares by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKind {
    /// Relevance score; higher sorts first unless reversed.
    Score,
    /// Document id, ascending.
    Doc,
    /// Dictionary-rank byte values.
    Byte,
    /// Parsed integer values.
    Int,
    /// Parsed float values.
    Float,
    /// Interned string values.
    Str,
    /// Detected from the field's first term at bind time.
    Auto,
}

/// One sort key: an optional field, a kind, and a direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortField {
    field: Option<String>,
    kind: SortKind,
    reverse: bool,
}

impl SortField {
    /// Create a field-backed sort key.
    pub fn new<F: Into<String>>(field: F, kind: SortKind) -> Self {
        SortField {
            field: Some(field.into()),
            kind,
            reverse: false,
        }
    }

    /// Create an auto-detected sort key.
    pub fn auto<F: Into<String>>(field: F) -> Self {
        Self::new(field, SortKind::Auto)
    }

    /// The score pseudo-field.
    pub fn score() -> Self {
        SortField {
            field: None,
            kind: SortKind::Score,
            reverse: false,
        }
    }

    /// The document-id pseudo-field.
    pub fn doc() -> Self {
        SortField {
            field: None,
            kind: SortKind::Doc,
            reverse: false,
        }
    }

    /// Reverse the direction of this key.
    pub fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Get the field name, `None` for the pseudo-fields.
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Get the kind.
    pub fn kind(&self) -> SortKind {
        self.kind
    }

    /// Check whether this key is reversed.
    pub fn is_reverse(&self) -> bool {
        self.reverse
    }

    /// Resolve `Auto` to a concrete kind by probing the field's first
    /// dictionary term: integer parse, then float parse, then string.
    ///
    /// A field with zero terms in a non-empty index is ambiguous and fails
    /// with an invalid-argument error rather than silently defaulting.
    pub fn resolve_kind(&self, reader: &dyn IndexReader) -> Result<SortKind> {
        if self.kind != SortKind::Auto {
            return Ok(self.kind);
        }
        let field = self.field.as_deref().ok_or_else(|| {
            GlaiveError::invalid_argument("auto sort requires a field name")
        })?;
        let mut terms = reader.terms(field)?.ok_or_else(|| {
            GlaiveError::invalid_argument(format!("unknown sort field '{field}'"))
        })?;
        match terms.next()? {
            Some(term) => {
                if term.parse::<i64>().is_ok() {
                    Ok(SortKind::Int)
                } else if term.parse::<f64>().is_ok() {
                    Ok(SortKind::Float)
                } else {
                    Ok(SortKind::Str)
                }
            }
            None if reader.max_doc() > 0 => Err(GlaiveError::invalid_argument(format!(
                "cannot auto-detect sort type of field '{field}' with no terms"
            ))),
            None => Ok(SortKind::Str),
        }
    }
}

/// An ordered, non-empty list of sort keys; the first key is primary and
/// later keys break ties in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sort {
    fields: Vec<SortField>,
}

impl Sort {
    /// Create a sort from an ordered key list.
    pub fn new(fields: Vec<SortField>) -> Result<Self> {
        if fields.is_empty() {
            return Err(GlaiveError::invalid_argument(
                "sort requires at least one sort field",
            ));
        }
        Ok(Sort { fields })
    }

    /// Sort by relevance score (the default search order).
    pub fn by_score() -> Self {
        Sort {
            fields: vec![SortField::score()],
        }
    }

    /// Sort by document id.
    pub fn by_doc() -> Self {
        Sort {
            fields: vec![SortField::doc()],
        }
    }

    /// Get the sort keys.
    pub fn fields(&self) -> &[SortField] {
        &self.fields
    }
}
