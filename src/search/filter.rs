//! Range filters producing document-membership bitsets.
//!
//! A filter scans one field's term dictionary, marks every document in each
//! qualifying term's postings, and hands back a [`BitVec`] sized to the
//! reader's `max_doc`. Bound validation happens at construction, before any
//! scan; boundary inclusivity is decided once per boundary term, never per
//! document.

use std::cmp::Ordering;

use bit_vec::BitVec;

use crate::error::{GlaiveError, Result};
use crate::index::IndexReader;
use crate::util::parse_whole_number;

/// A filter over document ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Lexical term range.
    Range(RangeFilter),
    /// Term range with numeric interpretation when the bounds allow it.
    TypedRange(TypedRangeFilter),
}

impl Filter {
    /// Compute the membership bitset against a reader.
    pub fn bits(&self, reader: &dyn IndexReader) -> Result<BitVec> {
        match self {
            Filter::Range(f) => f.bits(reader),
            Filter::TypedRange(f) => f.bits(reader),
        }
    }

    /// Render in query-string form.
    pub fn describe(&self) -> String {
        match self {
            Filter::Range(f) => f.describe(),
            Filter::TypedRange(f) => f.describe(),
        }
    }
}

/// Builds a bitset from a lexical term-dictionary range scan.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RangeFilter {
    field: String,
    lower: Option<String>,
    upper: Option<String>,
    include_lower: bool,
    include_upper: bool,
}

impl RangeFilter {
    /// Create a new range filter.
    ///
    /// Fails with an invalid-argument error if no bound is given or the
    /// upper bound sorts below the lower bound.
    pub fn new<F: Into<String>>(
        field: F,
        lower: Option<String>,
        upper: Option<String>,
        include_lower: bool,
        include_upper: bool,
    ) -> Result<Self> {
        validate_bounds(lower.as_deref(), upper.as_deref(), |l, u| l.cmp(u))?;
        Ok(RangeFilter {
            field: field.into(),
            lower,
            upper,
            include_lower,
            include_upper,
        })
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Compute the membership bitset.
    pub fn bits(&self, reader: &dyn IndexReader) -> Result<BitVec> {
        let mut terms = field_terms(reader, &self.field)?;
        let mut bits = BitVec::from_elem(reader.max_doc() as usize, false);

        // Lower-boundary inclusivity is settled once, right after the seek.
        let mut current = match &self.lower {
            Some(lower) => {
                let first = terms.seek(lower)?;
                if !self.include_lower && first.as_deref() == Some(lower.as_str()) {
                    terms.next()?
                } else {
                    first
                }
            }
            None => terms.next()?,
        };
        while let Some(term) = current {
            match upper_cmp(&term, self.upper.as_deref()) {
                Ordering::Greater => break,
                Ordering::Equal if !self.include_upper => break,
                _ => mark_postings(reader, &self.field, &term, &mut bits)?,
            }
            current = terms.next()?;
        }
        Ok(bits)
    }

    /// Render in query-string form.
    pub fn describe(&self) -> String {
        describe_range(
            &self.field,
            self.lower.as_deref(),
            self.upper.as_deref(),
            self.include_lower,
            self.include_upper,
        )
    }
}

/// Builds a bitset like [`RangeFilter`], but interprets bounds and terms
/// numerically when every given bound parses as a number.
///
/// A dictionary term that does not parse in its entirety is treated as out
/// of range on the numeric path. If any bound fails to parse, the filter
/// silently falls back to the lexical scan; that fallback is deliberate, not
/// a suppressed fault.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypedRangeFilter {
    field: String,
    lower: Option<String>,
    upper: Option<String>,
    include_lower: bool,
    include_upper: bool,
}

impl TypedRangeFilter {
    /// Create a new typed range filter.
    pub fn new<F: Into<String>>(
        field: F,
        lower: Option<String>,
        upper: Option<String>,
        include_lower: bool,
        include_upper: bool,
    ) -> Result<Self> {
        match numeric_bounds(lower.as_deref(), upper.as_deref()) {
            Some((l, u)) => {
                if u < l {
                    return Err(GlaiveError::invalid_argument(format!(
                        "upper bound {u} is less than lower bound {l}"
                    )));
                }
                if lower.is_none() && upper.is_none() {
                    return Err(GlaiveError::invalid_argument(
                        "range filter requires at least one bound",
                    ));
                }
            }
            None => {
                validate_bounds(lower.as_deref(), upper.as_deref(), |l, u| l.cmp(u))?;
            }
        }
        Ok(TypedRangeFilter {
            field: field.into(),
            lower,
            upper,
            include_lower,
            include_upper,
        })
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Compute the membership bitset.
    pub fn bits(&self, reader: &dyn IndexReader) -> Result<BitVec> {
        match numeric_bounds(self.lower.as_deref(), self.upper.as_deref()) {
            Some((lower, upper)) => self.numeric_bits(reader, lower, upper),
            None => {
                // Lexical fallback shares the plain range scan.
                let lexical = RangeFilter {
                    field: self.field.clone(),
                    lower: self.lower.clone(),
                    upper: self.upper.clone(),
                    include_lower: self.include_lower,
                    include_upper: self.include_upper,
                };
                lexical.bits(reader)
            }
        }
    }

    fn numeric_bits(&self, reader: &dyn IndexReader, lower: f64, upper: f64) -> Result<BitVec> {
        let mut terms = field_terms(reader, &self.field)?;
        let mut bits = BitVec::from_elem(reader.max_doc() as usize, false);

        // Numeric order differs from dictionary order, so every term is
        // visited and parsed.
        while let Some(term) = terms.next()? {
            let Some(value) = parse_whole_number(&term) else {
                continue;
            };
            let above_lower = if self.lower.is_none() {
                true
            } else if self.include_lower {
                value >= lower
            } else {
                value > lower
            };
            let below_upper = if self.upper.is_none() {
                true
            } else if self.include_upper {
                value <= upper
            } else {
                value < upper
            };
            if above_lower && below_upper {
                mark_postings(reader, &self.field, &term, &mut bits)?;
            }
        }
        Ok(bits)
    }

    /// Render in query-string form.
    pub fn describe(&self) -> String {
        describe_range(
            &self.field,
            self.lower.as_deref(),
            self.upper.as_deref(),
            self.include_lower,
            self.include_upper,
        )
    }
}

/// Resolve both bounds numerically; `None` if any present bound fails to
/// parse. Absent bounds resolve to infinities so they never constrain.
fn numeric_bounds(lower: Option<&str>, upper: Option<&str>) -> Option<(f64, f64)> {
    let lower = match lower {
        Some(s) => parse_whole_number(s)?,
        None => f64::NEG_INFINITY,
    };
    let upper = match upper {
        Some(s) => parse_whole_number(s)?,
        None => f64::INFINITY,
    };
    Some((lower, upper))
}

fn validate_bounds(
    lower: Option<&str>,
    upper: Option<&str>,
    cmp: impl Fn(&str, &str) -> Ordering,
) -> Result<()> {
    match (lower, upper) {
        (None, None) => Err(GlaiveError::invalid_argument(
            "range filter requires at least one bound",
        )),
        (Some(l), Some(u)) if cmp(l, u) == Ordering::Greater => Err(
            GlaiveError::invalid_argument(format!(
                "upper bound '{u}' is less than lower bound '{l}'"
            )),
        ),
        _ => Ok(()),
    }
}

fn upper_cmp(term: &str, upper: Option<&str>) -> Ordering {
    match upper {
        Some(upper) => term.cmp(upper),
        None => Ordering::Less,
    }
}

fn field_terms<'a>(
    reader: &'a dyn IndexReader,
    field: &str,
) -> Result<Box<dyn crate::index::TermsEnum + 'a>> {
    reader.terms(field)?.ok_or_else(|| {
        GlaiveError::invalid_argument(format!("field '{field}' does not exist in the index"))
    })
}

fn mark_postings(
    reader: &dyn IndexReader,
    field: &str,
    term: &str,
    bits: &mut BitVec,
) -> Result<()> {
    if let Some(mut postings) = reader.postings(field, term)? {
        while postings.next()? {
            bits.set(postings.doc() as usize, true);
        }
    }
    Ok(())
}

fn describe_range(
    field: &str,
    lower: Option<&str>,
    upper: Option<&str>,
    include_lower: bool,
    include_upper: bool,
) -> String {
    format!(
        "{}:{}{} {}{}",
        field,
        if include_lower { "[" } else { "{" },
        lower.unwrap_or("*"),
        upper.unwrap_or("*"),
        if include_upper { "]" } else { "}" },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MemoryIndex;

    /// Field `num` holds terms "2".."6", each on the doc id matching its
    /// value.
    fn numeric_index() -> MemoryIndex {
        let mut index = MemoryIndex::new();
        for value in 2u32..=6 {
            index.add_term(value, "num", value.to_string());
        }
        index
    }

    fn marked(bits: &BitVec) -> Vec<usize> {
        (0..bits.len()).filter(|&i| bits.get(i) == Some(true)).collect()
    }

    #[test]
    fn test_inclusive_range() {
        let index = numeric_index();
        let filter =
            RangeFilter::new("num", Some("2".into()), Some("6".into()), true, true).unwrap();
        assert_eq!(marked(&filter.bits(&index).unwrap()), vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_exclusive_upper_bound() {
        let index = numeric_index();
        let filter =
            RangeFilter::new("num", Some("2".into()), Some("6".into()), true, false).unwrap();
        assert_eq!(marked(&filter.bits(&index).unwrap()), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_exclusive_lower_bound() {
        let index = numeric_index();
        let filter =
            RangeFilter::new("num", Some("2".into()), Some("6".into()), false, true).unwrap();
        assert_eq!(marked(&filter.bits(&index).unwrap()), vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_unbounded_ends() {
        let index = numeric_index();
        let filter = RangeFilter::new("num", Some("4".into()), None, true, true).unwrap();
        assert_eq!(marked(&filter.bits(&index).unwrap()), vec![4, 5, 6]);

        let filter = RangeFilter::new("num", None, Some("3".into()), true, true).unwrap();
        assert_eq!(marked(&filter.bits(&index).unwrap()), vec![2, 3]);
    }

    #[test]
    fn test_inverted_bounds_rejected_up_front() {
        let err = RangeFilter::new("num", Some("6".into()), Some("2".into()), true, true)
            .expect_err("inverted bounds");
        assert!(err.is_invalid_argument());

        let err = RangeFilter::new("num", None, None, true, true).expect_err("no bounds");
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_unknown_field_fails_before_scan() {
        let index = numeric_index();
        let filter = RangeFilter::new("missing", Some("2".into()), None, true, true).unwrap();
        assert!(filter.bits(&index).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_typed_range_uses_numeric_order() {
        let mut index = MemoryIndex::new();
        for (doc, term) in ["9", "10", "200", "30"].iter().enumerate() {
            index.add_term(doc as u32, "num", *term);
        }

        // Lexically "10" < "9"; numerically the range 9..=30 keeps 9, 10, 30.
        let filter =
            TypedRangeFilter::new("num", Some("9".into()), Some("30".into()), true, true).unwrap();
        assert_eq!(marked(&filter.bits(&index).unwrap()), vec![0, 1, 3]);
    }

    #[test]
    fn test_typed_range_requires_full_parse() {
        let mut index = MemoryIndex::new();
        index.add_term(0, "num", "15");
        index.add_term(1, "num", "15x");

        let filter =
            TypedRangeFilter::new("num", Some("10".into()), Some("20".into()), true, true).unwrap();
        assert_eq!(marked(&filter.bits(&index).unwrap()), vec![0]);
    }

    #[test]
    fn test_typed_range_falls_back_to_lexical() {
        let mut index = MemoryIndex::new();
        index.add_term(0, "name", "alice");
        index.add_term(1, "name", "bob");
        index.add_term(2, "name", "carol");

        let filter =
            TypedRangeFilter::new("name", Some("alice".into()), Some("bob".into()), true, true)
                .unwrap();
        assert_eq!(marked(&filter.bits(&index).unwrap()), vec![0, 1]);
    }

    #[test]
    fn test_typed_range_numeric_bound_validation() {
        let err = TypedRangeFilter::new("num", Some("30".into()), Some("9".into()), true, true)
            .expect_err("numerically inverted");
        assert!(err.is_invalid_argument());

        // Lexically inverted but numerically ordered: fine.
        assert!(
            TypedRangeFilter::new("num", Some("9".into()), Some("30".into()), true, true).is_ok()
        );
    }

    #[test]
    fn test_describe() {
        let filter =
            RangeFilter::new("num", Some("2".into()), Some("6".into()), true, false).unwrap();
        assert_eq!(filter.describe(), "num:[2 6}");
    }
}
