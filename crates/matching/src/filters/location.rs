//! Keep postings located in one of the cities named in the query.

use crate::smart_search::SearchFilters;
use crate::traits::Filter;
use anyhow::Result;
use data_loader::Job;

/// Keeps postings whose location label contains any recognized city token.
///
/// Containment rather than equality, so `"baghdad"` keeps a posting in
/// `"Baghdad - Karrada"`.
pub struct LocationFilter;

impl Filter for LocationFilter {
    fn name(&self) -> &str {
        "LocationFilter"
    }

    fn apply<'a>(&self, jobs: Vec<&'a Job>, filters: &SearchFilters) -> Result<Vec<&'a Job>> {
        let Some(tokens) = filters.location.as_deref() else {
            return Ok(jobs);
        };

        Ok(jobs
            .into_iter()
            .filter(|job| {
                let location = job.location.to_lowercase();
                tokens.iter().any(|token| location.contains(token.as_str()))
            })
            .collect())
    }
}
