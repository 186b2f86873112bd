//! Core traits for the listing filter layer.
//!
//! A `Filter` narrows a job listing using the structured part of a parsed
//! search. Filters compose through [`crate::FilterPipeline`].

use crate::smart_search::SearchFilters;
use anyhow::Result;
use data_loader::Job;

/// Narrows a set of postings according to parsed search filters.
///
/// ## Design Note
/// - `Send + Sync` so one pipeline can serve concurrent searches
/// - Filters take the Vec by value and return the survivors, borrowing the
///   postings from whoever owns them
/// - A filter whose field is unset in `SearchFilters` passes everything
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of postings.
    fn apply<'a>(&self, jobs: Vec<&'a Job>, filters: &SearchFilters) -> Result<Vec<&'a Job>>;
}
