//! Keep postings of the employment types named in the query.

use crate::smart_search::SearchFilters;
use crate::traits::Filter;
use anyhow::Result;
use data_loader::Job;

/// Keeps postings whose employment type is one of the requested ones.
/// Postings without a type are dropped once any type is requested.
pub struct EmploymentTypeFilter;

impl Filter for EmploymentTypeFilter {
    fn name(&self) -> &str {
        "EmploymentTypeFilter"
    }

    fn apply<'a>(&self, jobs: Vec<&'a Job>, filters: &SearchFilters) -> Result<Vec<&'a Job>> {
        let Some(wanted) = filters.employment_type.as_deref() else {
            return Ok(jobs);
        };

        Ok(jobs
            .into_iter()
            .filter(|job| {
                job.employment_type
                    .is_some_and(|employment_type| wanted.contains(&employment_type))
            })
            .collect())
    }
}
