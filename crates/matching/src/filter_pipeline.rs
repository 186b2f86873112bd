//! The FilterPipeline orchestrates multiple filters.

use crate::filters::{EmploymentTypeFilter, KeywordFilter, LocationFilter};
use crate::smart_search::SearchFilters;
use crate::traits::Filter;
use anyhow::Result;
use data_loader::Job;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(LocationFilter)
///     .add_filter(EmploymentTypeFilter);
///
/// let filters = parse_smart_search("part time in baghdad");
/// let listing = pipeline.apply(board.jobs().collect(), &filters)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The standard job-search chain: location, then employment type, then
    /// free-text keywords.
    pub fn for_search() -> Self {
        Self::new()
            .add_filter(LocationFilter)
            .add_filter(EmploymentTypeFilter)
            .add_filter(KeywordFilter)
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in order. Stops at the first filter that errors.
    pub fn apply<'a>(&self, jobs: Vec<&'a Job>, filters: &SearchFilters) -> Result<Vec<&'a Job>> {
        let mut current = jobs;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, filters)?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
