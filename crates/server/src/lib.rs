//! Server crate for the matching engine.
//!
//! This crate contains the orchestrator that composes the job board, smart
//! search, listing filters and scorer into the operations the job-search
//! and recommendation pages call.

pub mod error;
pub mod orchestrator;

pub use error::LookupError;
pub use orchestrator::{
    CandidateRecommendation, JobRecommendation, MatchOrchestrator, SearchOutcome,
};
