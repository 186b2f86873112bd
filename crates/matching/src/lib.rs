//! Candidate–job matching engine.
//!
//! This crate provides:
//! - `MatchScorer`: multi-factor weighted compatibility score for one
//!   job/candidate pair, with a per-factor breakdown
//! - `parse_smart_search`: extracts city and employment-type filters from a
//!   bilingual free-text query
//! - a `Filter` trait and `FilterPipeline` that apply parsed filters to a
//!   job listing
//! - parallel ranking of postings for a candidate and candidates for a posting
//!
//! The scorer and the parser are pure functions: no I/O, no logging, no
//! shared state.
//!
//! ## Example Usage
//! ```ignore
//! use matching::{calculate_match_score, parse_smart_search, FilterPipeline};
//!
//! let result = calculate_match_score(&job, &cv);
//! println!("{} ({:?})", result.score, result.breakdown);
//!
//! let filters = parse_smart_search("need a part time dentist in baghdad");
//! let listing = FilterPipeline::for_search().apply(board.jobs().collect(), &filters)?;
//! ```

pub mod traits;
pub mod filters;
pub mod filter_pipeline;
pub mod weights;
pub mod scorer;
pub mod smart_search;
pub mod ranking;

// Re-export main types
pub use traits::Filter;
pub use filter_pipeline::FilterPipeline;
pub use weights::MatchWeights;
pub use scorer::{calculate_match_score, MatchBreakdown, MatchResult, MatchScorer};
pub use smart_search::{parse_smart_search, SearchFilters};
pub use ranking::{rank_cvs_for_job, rank_jobs_for_cv, CandidateMatch, JobMatch};
