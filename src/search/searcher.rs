//! Query execution.
//!
//! [`Searcher`] pairs a reader with a field cache for its lifetime. A search
//! rewrites the query against the reader, scores the rewritten form into a
//! per-document score map, then runs every scored document through a
//! [`TopKCollector`] under the requested sort.

use std::sync::Arc;

use ahash::AHashMap;

use crate::error::{GlaiveError, Result};
use crate::index::IndexReader;
use crate::query::{Occur, Query};
use crate::search::Hit;
use crate::search::collector::TopKCollector;
use crate::search::comparator::{CompositeComparator, FieldDoc};
use crate::search::field_cache::FieldCache;
use crate::search::sort::Sort;

/// Default number of hits returned by a search.
pub const DEFAULT_LIMIT: usize = 10;

/// Options controlling one search call.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    limit: usize,
    sort: Option<Sort>,
}

impl SearchOptions {
    /// Create options with the default limit and relevance order.
    pub fn new() -> Self {
        SearchOptions {
            limit: DEFAULT_LIMIT,
            sort: None,
        }
    }

    /// Set the maximum number of hits to return.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the sort order. Unset means relevance order.
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Get the hit limit.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Get the sort order, if one was set.
    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions::new()
    }
}

/// Result of a search: the best hits and the full match count.
#[derive(Debug, Clone)]
pub struct TopDocs {
    /// Number of documents that matched, retained or not.
    pub total_hits: u64,
    /// The best hits in rank order, with sort values attached.
    pub hits: Vec<FieldDoc>,
}

/// Executes queries against one reader.
///
/// The field cache lives exactly as long as the searcher, so sort indexes
/// built for one reader generation are never reused against another.
pub struct Searcher {
    reader: Arc<dyn IndexReader>,
    cache: FieldCache,
}

impl Searcher {
    /// Create a searcher over a reader.
    pub fn new(reader: Arc<dyn IndexReader>) -> Self {
        Searcher {
            reader,
            cache: FieldCache::new(),
        }
    }

    /// Get the reader this searcher executes against.
    pub fn reader(&self) -> &Arc<dyn IndexReader> {
        &self.reader
    }

    /// Get the searcher's field cache.
    pub fn cache(&self) -> &FieldCache {
        &self.cache
    }

    /// Execute a query and return the top hits under the requested sort.
    pub fn search(&self, query: &Arc<Query>, options: &SearchOptions) -> Result<TopDocs> {
        let sort = options.sort().cloned().unwrap_or_else(Sort::by_score);
        let comparator = CompositeComparator::bind(&sort, &*self.reader, &self.cache)?;
        let mut collector = TopKCollector::new(options.limit(), comparator);

        if let Some(rewritten) = query.rewrite(&*self.reader)? {
            let scores = self.score_docs(&rewritten)?;
            for (doc, score) in scores {
                collector.collect(Hit { doc, score });
            }
        }

        Ok(TopDocs {
            total_hits: collector.total_hits(),
            hits: collector.into_field_docs(),
        })
    }

    /// Count the documents matching a query.
    pub fn count(&self, query: &Arc<Query>) -> Result<u64> {
        match query.rewrite(&*self.reader)? {
            Some(rewritten) => Ok(self.score_docs(&rewritten)?.len() as u64),
            None => Ok(0),
        }
    }

    /// Score a rewritten query into a per-document score map.
    ///
    /// Only primitive variants are scorable; a composite variant reaching
    /// this point means the caller skipped the rewrite step, which is an
    /// invalid-operation error rather than a silent empty result.
    fn score_docs(&self, query: &Arc<Query>) -> Result<AHashMap<u32, f32>> {
        match &**query {
            Query::Term(q) => {
                let mut scores = AHashMap::new();
                self.for_each_doc(q.field(), q.term(), |doc| {
                    scores.insert(doc, q.boost());
                })?;
                Ok(scores)
            }
            Query::MultiTerm(q) => {
                let mut scores = AHashMap::new();
                for bt in q.terms() {
                    let contribution = bt.boost * q.boost();
                    self.for_each_doc(q.field(), &bt.term, |doc| {
                        *scores.entry(doc).or_insert(0.0) += contribution;
                    })?;
                }
                Ok(scores)
            }
            Query::Phrase(q) => {
                // Conjunction over the phrase terms. Term positions are not
                // consulted at this layer, so slop has no effect here.
                let mut scores: Option<AHashMap<u32, f32>> = None;
                for term in q.terms() {
                    let mut docs = AHashMap::new();
                    self.for_each_doc(q.field(), term, |doc| {
                        docs.insert(doc, q.boost());
                    })?;
                    scores = Some(match scores {
                        None => docs,
                        Some(prev) => prev
                            .into_iter()
                            .filter(|(doc, _)| docs.contains_key(doc))
                            .collect(),
                    });
                }
                Ok(scores.unwrap_or_default())
            }
            Query::Boolean(q) => self.score_boolean(q),
            Query::ConstantScore(q) => {
                let bits = q.filter().bits(&*self.reader)?;
                let mut scores = AHashMap::new();
                for (doc, set) in bits.iter().enumerate() {
                    if set {
                        scores.insert(doc as u32, q.boost());
                    }
                }
                Ok(scores)
            }
            Query::MatchAll(q) => {
                let mut scores = AHashMap::new();
                for doc in 0..self.reader.max_doc() {
                    scores.insert(doc, q.boost());
                }
                Ok(scores)
            }
            Query::Span(_) => Err(GlaiveError::not_implemented(
                "span queries are not executable yet",
            )),
            other => Err(GlaiveError::invalid_operation(format!(
                "query must be rewritten before scoring: {}",
                other.to_query_string("")
            ))),
        }
    }

    fn score_boolean(&self, q: &crate::query::BooleanQuery) -> Result<AHashMap<u32, f32>> {
        let mut musts: Option<AHashMap<u32, f32>> = None;
        let mut shoulds: AHashMap<u32, f32> = AHashMap::new();
        let mut excluded: Vec<AHashMap<u32, f32>> = Vec::new();
        let mut has_must = false;

        for clause in q.clauses() {
            let clause_scores = match clause.query.rewrite(&*self.reader)? {
                Some(rewritten) => self.score_docs(&rewritten)?,
                None => AHashMap::new(),
            };
            match clause.occur {
                Occur::Must => {
                    has_must = true;
                    musts = Some(match musts {
                        None => clause_scores,
                        Some(prev) => prev
                            .into_iter()
                            .filter_map(|(doc, score)| {
                                clause_scores.get(&doc).map(|s| (doc, score + s))
                            })
                            .collect(),
                    });
                }
                Occur::Should => {
                    for (doc, score) in clause_scores {
                        *shoulds.entry(doc).or_insert(0.0) += score;
                    }
                }
                Occur::MustNot => excluded.push(clause_scores),
            }
        }

        let mut scores = match musts {
            Some(mut musts) => {
                // Shoulds only add on top of documents the musts accepted.
                for (doc, score) in musts.iter_mut() {
                    if let Some(extra) = shoulds.get(doc) {
                        *score += extra;
                    }
                }
                musts
            }
            None if has_must => AHashMap::new(),
            None => shoulds,
        };

        for exclusion in excluded {
            scores.retain(|doc, _| !exclusion.contains_key(doc));
        }
        for score in scores.values_mut() {
            *score *= q.boost();
        }
        Ok(scores)
    }

    fn for_each_doc(&self, field: &str, term: &str, mut found: impl FnMut(u32)) -> Result<()> {
        if let Some(mut postings) = self.reader.postings(field, term)? {
            while postings.next()? {
                found(postings.doc());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MemoryIndex;
    use crate::query::{BooleanQuery, FuzzyQuery, MatchAllQuery, PhraseQuery, TermQuery};
    use crate::search::sort::{SortField, SortKind};

    fn sample_searcher() -> Searcher {
        let mut index = MemoryIndex::new();
        index.add_terms(0, "content", &["the", "quick", "brown", "fox"]);
        index.add_terms(1, "content", &["the", "lazy", "dog"]);
        index.add_terms(2, "content", &["quick", "quick", "dog"]);
        index.add_term(0, "num", "30");
        index.add_term(1, "num", "4");
        index.add_term(2, "num", "200");
        Searcher::new(Arc::new(index))
    }

    fn docs(top: &TopDocs) -> Vec<u32> {
        top.hits.iter().map(|fd| fd.hit.doc).collect()
    }

    #[test]
    fn test_term_search() {
        let searcher = sample_searcher();
        let query = Arc::new(Query::Term(TermQuery::new("content", "quick")));

        let top = searcher.search(&query, &SearchOptions::new()).unwrap();
        assert_eq!(top.total_hits, 2);
        assert_eq!(docs(&top), vec![0, 2]);
    }

    #[test]
    fn test_boolean_search() {
        let searcher = sample_searcher();
        let mut bq = BooleanQuery::new();
        bq.add_must(Arc::new(Query::Term(TermQuery::new("content", "quick"))));
        bq.add_must_not(Arc::new(Query::Term(TermQuery::new("content", "dog"))));
        let query = Arc::new(Query::Boolean(bq));

        let top = searcher.search(&query, &SearchOptions::new()).unwrap();
        assert_eq!(docs(&top), vec![0]);
    }

    #[test]
    fn test_should_boosts_ranking() {
        let searcher = sample_searcher();
        let mut bq = BooleanQuery::new();
        bq.add_must(Arc::new(Query::Term(TermQuery::new("content", "quick"))));
        bq.add_should(Arc::new(Query::Term(
            TermQuery::new("content", "dog").with_boost(2.0),
        )));
        let query = Arc::new(Query::Boolean(bq));

        // Doc 2 matches the should clause on top of the must, doc 0 only
        // the must.
        let top = searcher.search(&query, &SearchOptions::new()).unwrap();
        assert_eq!(docs(&top), vec![2, 0]);
        assert!(top.hits[0].hit.score > top.hits[1].hit.score);
    }

    #[test]
    fn test_fuzzy_search_end_to_end() {
        let searcher = sample_searcher();
        let query = Arc::new(Query::Fuzzy(FuzzyQuery::new("content", "quik")));

        let top = searcher.search(&query, &SearchOptions::new()).unwrap();
        assert_eq!(docs(&top), vec![0, 2]);
    }

    #[test]
    fn test_phrase_is_conjunctive() {
        let searcher = sample_searcher();
        let query = Arc::new(Query::Phrase(PhraseQuery::new(
            "content",
            vec!["quick".into(), "dog".into()],
        )));

        let top = searcher.search(&query, &SearchOptions::new()).unwrap();
        assert_eq!(docs(&top), vec![2]);
    }

    #[test]
    fn test_sorted_search() {
        let searcher = sample_searcher();
        let query = Arc::new(Query::MatchAll(MatchAllQuery::new()));
        let sort = Sort::new(vec![SortField::new("num", SortKind::Int)]).unwrap();
        let options = SearchOptions::new().with_sort(sort);

        let top = searcher.search(&query, &options).unwrap();
        assert_eq!(docs(&top), vec![1, 0, 2]);
    }

    #[test]
    fn test_limit_caps_hits_not_total() {
        let searcher = sample_searcher();
        let query = Arc::new(Query::MatchAll(MatchAllQuery::new()));
        let options = SearchOptions::new().with_limit(2);

        let top = searcher.search(&query, &options).unwrap();
        assert_eq!(top.total_hits, 3);
        assert_eq!(top.hits.len(), 2);
    }

    #[test]
    fn test_empty_boolean_matches_nothing() {
        let searcher = sample_searcher();
        let query = Arc::new(Query::Boolean(BooleanQuery::new()));

        let top = searcher.search(&query, &SearchOptions::new()).unwrap();
        assert_eq!(top.total_hits, 0);
        assert!(top.hits.is_empty());
    }

    #[test]
    fn test_count() {
        let searcher = sample_searcher();
        let query = Arc::new(Query::Term(TermQuery::new("content", "dog")));
        assert_eq!(searcher.count(&query).unwrap(), 2);
    }

    #[test]
    fn test_unrewritten_composite_rejected_by_score_docs() {
        let searcher = sample_searcher();
        let query = Arc::new(Query::Fuzzy(FuzzyQuery::new("content", "quik")));

        let err = searcher.score_docs(&query).unwrap_err();
        assert!(matches!(err, GlaiveError::InvalidOperation(_)));
    }
}
