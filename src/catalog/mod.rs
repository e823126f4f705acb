//! Catalog candidate handling: fan-out, merge, relevance filtering
//!
//! Raw place records arrive from several phrasings of the same destination
//! query. They are merged by [`CandidateAggregator`], screened by
//! [`RelevanceFilter`] and then handed to the ranker.

pub mod aggregator;
pub mod cache;
pub mod fallback;
pub mod filter;
pub mod gather;
pub mod source;
pub mod vocabulary;

pub use aggregator::{CandidateAggregator, DEFAULT_MAX_CANDIDATES};
pub use cache::QueryCache;
pub use fallback::fallback_attractions;
pub use filter::{FilterOutcome, RelevanceFilter, DEFAULT_RESULT_LIMIT};
pub use gather::{default_queries, gather_candidates, GatherReport};
pub use source::{parse_candidates, CatalogClient, CatalogSource};
