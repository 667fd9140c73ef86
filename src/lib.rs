//! # Glaive
//!
//! The matching, rewriting, and ranking core of a full-text search engine.
//!
//! ## Features
//!
//! - Closed query model with boosts and MUST/SHOULD/MUST_NOT composition
//! - Reader-specific rewriting of fuzzy, prefix, wildcard, and range queries
//! - Bitset range filters with lexical and typed-numeric interpretation
//! - Cached columnar field indexes for sorting
//! - Multi-key sorting with auto-detected field types
//! - Bounded top-N collection

pub mod error;
pub mod index;
pub mod query;
pub mod search;
pub mod util;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
