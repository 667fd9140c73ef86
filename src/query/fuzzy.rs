//! Fuzzy query: minimum-similarity approximate term matching.
//!
//! Rewrite enumerates dictionary terms sharing the required prefix and
//! scores each candidate with a bounded Levenshtein distance. Two pruning
//! layers keep the scan cheap: a length-difference rejection computed from a
//! per-length maximum-distance table, and a per-row abandon check inside the
//! dynamic program. The two DP rows are sized once per rewrite and reused
//! across every candidate term.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{GlaiveError, Result};
use crate::index::IndexReader;
use crate::query::multi_term::DEFAULT_MAX_TERMS;
use crate::query::{MultiTermQuery, Query, TermQuery, boost_suffix, field_prefix};

/// Default minimum similarity threshold.
pub const DEFAULT_MIN_SIMILARITY: f32 = 0.5;

/// Default exact-match prefix length.
pub const DEFAULT_PREFIX_LENGTH: usize = 0;

/// Candidate lengths below this cutoff use the precomputed distance table;
/// longer candidates compute their threshold live.
const TYPICAL_LONGEST_WORD: usize = 20;

/// A query that matches terms within a similarity threshold of the query
/// term.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyQuery {
    field: String,
    term: String,
    min_similarity: f32,
    prefix_length: usize,
    max_terms: usize,
    boost: f32,
}

impl FuzzyQuery {
    /// Create a new fuzzy query with default settings.
    pub fn new<F: Into<String>, T: Into<String>>(field: F, term: T) -> Self {
        FuzzyQuery {
            field: field.into(),
            term: term.into(),
            min_similarity: DEFAULT_MIN_SIMILARITY,
            prefix_length: DEFAULT_PREFIX_LENGTH,
            max_terms: DEFAULT_MAX_TERMS,
            boost: 1.0,
        }
    }

    /// Set the minimum similarity threshold, in `[0, 1)`.
    pub fn with_min_similarity(mut self, min_similarity: f32) -> Result<Self> {
        if !(0.0..1.0).contains(&min_similarity) {
            return Err(GlaiveError::invalid_argument(format!(
                "minimum similarity must be in [0, 1), got {min_similarity}"
            )));
        }
        self.min_similarity = min_similarity;
        Ok(self)
    }

    /// Set the number of leading characters that must match exactly.
    pub fn with_prefix_length(mut self, prefix_length: usize) -> Self {
        self.prefix_length = prefix_length;
        self
    }

    /// Set the maximum number of terms the rewrite may expand to.
    pub fn with_max_terms(mut self, max_terms: usize) -> Self {
        self.max_terms = max_terms;
        self
    }

    /// Set the boost factor for this query.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the query term.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Get the minimum similarity threshold.
    pub fn min_similarity(&self) -> f32 {
        self.min_similarity
    }

    /// Get the prefix length.
    pub fn prefix_length(&self) -> usize {
        self.prefix_length
    }

    /// Get the boost factor.
    pub fn boost(&self) -> f32 {
        self.boost
    }

    /// Set the boost factor.
    pub fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    /// Rewrite into a bounded multi-term disjunction of similar terms, each
    /// boosted by its similarity score.
    ///
    /// A prefix length covering the whole term leaves no room for edits and
    /// degenerates to an exact term query rather than an error.
    pub fn rewrite(&self, reader: &dyn IndexReader) -> Result<Arc<Query>> {
        let term_chars: Vec<char> = self.term.chars().collect();
        if self.prefix_length >= term_chars.len() {
            return Ok(Arc::new(Query::Term(
                TermQuery::new(&self.field, &self.term).with_boost(self.boost),
            )));
        }

        let prefix: String = term_chars[..self.prefix_length].iter().collect();
        let text: Vec<char> = term_chars[self.prefix_length..].to_vec();
        let mut scorer = SimilarityScorer::new(text, self.prefix_length, self.min_similarity);

        let mut expanded = MultiTermQuery::with_max_terms(&self.field, self.max_terms);
        if let Some(mut terms) = reader.terms(&self.field)? {
            let mut current = terms.seek(&prefix)?;
            while let Some(term) = current {
                if !term.starts_with(&prefix) {
                    break;
                }
                let score = scorer.score(&term[prefix.len()..]);
                if score > 0.0 {
                    expanded.add_term_boost(term, score);
                }
                current = terms.next()?;
            }
        }
        expanded.set_boost(self.boost);
        Ok(Arc::new(Query::MultiTerm(expanded)))
    }

    /// Render in query-string form.
    pub fn to_query_string(&self, default_field: &str) -> String {
        format!(
            "{}{}~{}{}",
            field_prefix(&self.field, default_field),
            self.term,
            self.min_similarity,
            boost_suffix(self.boost)
        )
    }
}

impl Hash for FuzzyQuery {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.field.hash(state);
        self.term.hash(state);
        self.min_similarity.to_bits().hash(state);
        self.prefix_length.hash(state);
        self.max_terms.hash(state);
        self.boost.to_bits().hash(state);
    }
}

/// Edit-distance scorer for one rewrite pass.
///
/// Holds the stripped query suffix, the precomputed per-length distance
/// thresholds, and the two DP scratch rows. Not shareable across concurrent
/// candidate evaluations; each rewrite owns its own instance.
struct SimilarityScorer {
    text: Vec<char>,
    prefix_length: usize,
    min_similarity: f32,
    max_distances: Vec<u32>,
    prev: Vec<u32>,
    current: Vec<u32>,
}

impl SimilarityScorer {
    fn new(text: Vec<char>, prefix_length: usize, min_similarity: f32) -> Self {
        let n = text.len();
        let max_distances = (0..TYPICAL_LONGEST_WORD)
            .map(|m| compute_max_distance(min_similarity, prefix_length, n, m))
            .collect();
        SimilarityScorer {
            text,
            prefix_length,
            min_similarity,
            max_distances,
            prev: vec![0; n + 1],
            current: vec![0; n + 1],
        }
    }

    /// Maximum tolerated edit distance for a candidate suffix of length `m`.
    fn max_distance(&self, m: usize) -> u32 {
        if m < TYPICAL_LONGEST_WORD {
            self.max_distances[m]
        } else {
            compute_max_distance(self.min_similarity, self.prefix_length, self.text.len(), m)
        }
    }

    /// Similarity of a candidate suffix against the query suffix, or 0.0 if
    /// the candidate is rejected.
    fn score(&mut self, target: &str) -> f32 {
        let target: Vec<char> = target.chars().collect();
        let m = target.len();
        let n = self.text.len();

        // Closed form when either side is empty: the distance is the other
        // side's full length, so only the shared prefix can contribute.
        if m == 0 || n == 0 {
            if self.prefix_length == 0 {
                return 0.0;
            }
            let sim = 1.0 - (m + n) as f32 / self.prefix_length as f32;
            return sim.max(0.0);
        }

        let max_dist = self.max_distance(m);
        if m.abs_diff(n) as u32 > max_dist {
            // No candidate of this length can stay within the threshold.
            return 0.0;
        }

        for (j, cell) in self.prev.iter_mut().enumerate() {
            *cell = j as u32;
        }
        for (i, &tc) in target.iter().enumerate() {
            let row = i as u32 + 1;
            self.current[0] = row;
            let mut prune = row > max_dist;
            for j in 1..=n {
                let cost = u32::from(tc != self.text[j - 1]);
                let d = (self.current[j - 1] + 1)
                    .min(self.prev[j] + 1)
                    .min(self.prev[j - 1] + cost);
                self.current[j] = d;
                if prune && d <= max_dist {
                    prune = false;
                }
            }
            if prune {
                // Every cell in this row already exceeds the threshold.
                return 0.0;
            }
            std::mem::swap(&mut self.prev, &mut self.current);
        }

        let distance = self.prev[n];
        if distance > max_dist {
            return 0.0;
        }
        let sim = 1.0 - distance as f32 / (self.prefix_length + n.min(m)) as f32;
        sim.max(0.0)
    }
}

fn compute_max_distance(min_similarity: f32, prefix_length: usize, n: usize, m: usize) -> u32 {
    ((1.0 - min_similarity) * (n.min(m) + prefix_length) as f32).floor() as u32
}
