//! Integration tests for search execution, sorting, and the field cache.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use glaive::index::{IndexReader, MemoryIndex, PostingsEnum, TermsEnum};
use glaive::query::{BooleanQuery, MatchAllQuery, Query, RangeQuery, TermQuery, TypedRangeQuery};
use glaive::search::{SearchOptions, Searcher, Sort, SortField, SortKind, SortValue};

/// Reader wrapper counting dictionary scans, to observe cache behavior.
struct ScanCountingReader {
    inner: MemoryIndex,
    scans: AtomicUsize,
}

impl ScanCountingReader {
    fn new(inner: MemoryIndex) -> Self {
        ScanCountingReader {
            inner,
            scans: AtomicUsize::new(0),
        }
    }

    fn scans(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }
}

impl IndexReader for ScanCountingReader {
    fn max_doc(&self) -> u32 {
        self.inner.max_doc()
    }

    fn field_names(&self) -> Vec<String> {
        self.inner.field_names()
    }

    fn has_field(&self, field: &str) -> bool {
        self.inner.has_field(field)
    }

    fn terms(&self, field: &str) -> glaive::error::Result<Option<Box<dyn TermsEnum + '_>>> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        self.inner.terms(field)
    }

    fn postings(
        &self,
        field: &str,
        term: &str,
    ) -> glaive::error::Result<Option<Box<dyn PostingsEnum + '_>>> {
        self.inner.postings(field, term)
    }
}

fn book_index() -> MemoryIndex {
    let mut index = MemoryIndex::new();
    index.add_terms(0, "title", &["rust", "in", "action"]);
    index.add_term(0, "year", "2019");
    index.add_term(0, "price", "40");
    index.add_terms(1, "title", &["programming", "rust"]);
    index.add_term(1, "year", "2021");
    index.add_term(1, "price", "60");
    index.add_terms(2, "title", &["the", "rust", "book"]);
    index.add_term(2, "year", "2019");
    index.add_term(2, "price", "0");
    index.add_terms(3, "title", &["python", "crash", "course"]);
    index.add_term(3, "year", "2023");
    index.add_term(3, "price", "35");
    index
}

fn doc_ids(top: &glaive::search::TopDocs) -> Vec<u32> {
    top.hits.iter().map(|fd| fd.hit.doc).collect()
}

#[test]
fn test_sorted_search_with_tie_break() {
    let searcher = Searcher::new(Arc::new(book_index()));
    let query = Arc::new(Query::Term(TermQuery::new("title", "rust")));
    let sort = Sort::new(vec![SortField::new("year", SortKind::Int)]).unwrap();
    let options = SearchOptions::new().with_sort(sort);

    // Docs 0 and 2 share year 2019; the lower doc id comes first.
    let top = searcher.search(&query, &options).unwrap();
    assert_eq!(doc_ids(&top), vec![0, 2, 1]);
    assert_eq!(top.hits[0].fields, vec![SortValue::Int(2019)]);
}

#[test]
fn test_reverse_sort() {
    let searcher = Searcher::new(Arc::new(book_index()));
    let query = Arc::new(Query::MatchAll(MatchAllQuery::new()));
    let sort = Sort::new(vec![SortField::new("price", SortKind::Int).reverse()]).unwrap();
    let options = SearchOptions::new().with_sort(sort);

    let top = searcher.search(&query, &options).unwrap();
    assert_eq!(doc_ids(&top), vec![1, 0, 3, 2]);
}

#[test]
fn test_auto_sort_detects_numeric_field() {
    let searcher = Searcher::new(Arc::new(book_index()));
    let query = Arc::new(Query::MatchAll(MatchAllQuery::new()));
    let sort = Sort::new(vec![SortField::auto("price")]).unwrap();
    let options = SearchOptions::new().with_sort(sort);

    // Detected as Int: 0 < 35 < 40 < 60, not lexical "0" < "35" < "40" < "60"
    // (which happens to agree) — the stronger signal is that "200" would
    // sort after "60" lexically but before it numerically.
    let top = searcher.search(&query, &options).unwrap();
    assert_eq!(doc_ids(&top), vec![2, 3, 0, 1]);
}

#[test]
fn test_field_index_built_once_per_sort_key() {
    let reader = Arc::new(ScanCountingReader::new(book_index()));
    let searcher = Searcher::new(Arc::clone(&reader) as Arc<dyn IndexReader>);
    let query = Arc::new(Query::Term(TermQuery::new("title", "rust")));
    let sort = Sort::new(vec![SortField::new("year", SortKind::Int)]).unwrap();
    let options = SearchOptions::new().with_sort(sort);

    searcher.search(&query, &options).unwrap();
    let after_first = reader.scans();
    assert!(after_first >= 1, "first search must scan the year field");

    // Repeat searches reuse the cached field index; no further dictionary
    // scans happen for the sort key.
    searcher.search(&query, &options).unwrap();
    searcher.search(&query, &options).unwrap();
    assert_eq!(reader.scans(), after_first);
}

#[test]
fn test_range_search_end_to_end() {
    let searcher = Searcher::new(Arc::new(book_index()));
    // Lexical range over year terms.
    let query = Arc::new(Query::Range(
        RangeQuery::new("year", Some("2019".into()), Some("2021".into()), true, true).unwrap(),
    ));

    let top = searcher.search(&query, &SearchOptions::new()).unwrap();
    assert_eq!(top.total_hits, 3);
    assert_eq!(doc_ids(&top), vec![0, 1, 2]);
}

#[test]
fn test_typed_range_orders_numerically() {
    let mut index = MemoryIndex::new();
    index.add_term(0, "num", "9");
    index.add_term(1, "num", "10");
    index.add_term(2, "num", "30");
    let searcher = Searcher::new(Arc::new(index));

    // Lexically "9" > "10", but the typed range compares parsed values.
    let query = Arc::new(Query::TypedRange(
        TypedRangeQuery::new("num", Some("9".into()), Some("10".into()), true, true).unwrap(),
    ));

    let top = searcher.search(&query, &SearchOptions::new()).unwrap();
    assert_eq!(doc_ids(&top), vec![0, 1]);
}

#[test]
fn test_exclusive_range_bounds() {
    let searcher = Searcher::new(Arc::new(book_index()));
    let query = Arc::new(Query::Range(
        RangeQuery::new(
            "year",
            Some("2019".into()),
            Some("2023".into()),
            false,
            false,
        )
        .unwrap(),
    ));

    let top = searcher.search(&query, &SearchOptions::new()).unwrap();
    assert_eq!(doc_ids(&top), vec![1]);
}

#[test]
fn test_boolean_search_with_range_clause() {
    let searcher = Searcher::new(Arc::new(book_index()));
    let mut bq = BooleanQuery::new();
    bq.add_must(Arc::new(Query::Term(TermQuery::new("title", "rust"))));
    bq.add_must(Arc::new(Query::TypedRange(
        TypedRangeQuery::new("price", Some("1".into()), None, true, true).unwrap(),
    )));
    let query = Arc::new(Query::Boolean(bq));

    // "the rust book" is free and falls below the price floor.
    let top = searcher.search(&query, &SearchOptions::new()).unwrap();
    assert_eq!(doc_ids(&top), vec![0, 1]);
}

#[test]
fn test_collector_retention_under_limit() {
    let mut index = MemoryIndex::new();
    for doc in 0..100 {
        index.add_term(doc, "content", "common");
        index.add_term(doc, "rank", &format!("{:03}", doc));
    }
    let searcher = Searcher::new(Arc::new(index));
    let query = Arc::new(Query::Term(TermQuery::new("content", "common")));
    let sort = Sort::new(vec![SortField::new("rank", SortKind::Str).reverse()]).unwrap();
    let options = SearchOptions::new().with_limit(5).with_sort(sort);

    let top = searcher.search(&query, &options).unwrap();
    assert_eq!(top.total_hits, 100);
    assert_eq!(doc_ids(&top), vec![99, 98, 97, 96, 95]);
}

#[test]
fn test_multi_key_sort() {
    let searcher = Searcher::new(Arc::new(book_index()));
    let query = Arc::new(Query::MatchAll(MatchAllQuery::new()));
    let sort = Sort::new(vec![
        SortField::new("year", SortKind::Int),
        SortField::new("price", SortKind::Int).reverse(),
    ])
    .unwrap();
    let options = SearchOptions::new().with_sort(sort);

    // 2019 ties broken by descending price: doc 0 (40) before doc 2 (0).
    let top = searcher.search(&query, &options).unwrap();
    assert_eq!(doc_ids(&top), vec![0, 2, 1, 3]);
}

#[test]
fn test_unknown_sort_field_is_an_error() {
    let searcher = Searcher::new(Arc::new(book_index()));
    let query = Arc::new(Query::MatchAll(MatchAllQuery::new()));
    let sort = Sort::new(vec![SortField::new("missing", SortKind::Int)]).unwrap();
    let options = SearchOptions::new().with_sort(sort);

    let err = searcher.search(&query, &options).unwrap_err();
    assert!(err.is_invalid_argument());
}
