//! Free-text matching on what is left of the query once the recognized
//! cities and employment phrases are taken out.

use crate::smart_search::{residual_keywords, SearchFilters};
use crate::traits::Filter;
use anyhow::Result;
use data_loader::Job;

/// Keeps postings related to the keyword part of the query.
///
/// A posting is kept when, lowercased:
/// - its title contains the keywords, or the keywords contain its title
/// - its description contains the keywords
/// - the keywords mention one of its skills
///
/// A query made only of recognized filters has no keywords and keeps
/// everything.
pub struct KeywordFilter;

impl Filter for KeywordFilter {
    fn name(&self) -> &str {
        "KeywordFilter"
    }

    fn apply<'a>(&self, jobs: Vec<&'a Job>, filters: &SearchFilters) -> Result<Vec<&'a Job>> {
        let keywords = residual_keywords(&filters.query);
        if keywords.is_empty() {
            return Ok(jobs);
        }

        Ok(jobs
            .into_iter()
            .filter(|job| matches_keywords(job, &keywords))
            .collect())
    }
}

fn matches_keywords(job: &Job, keywords: &str) -> bool {
    let title = job.title.trim().to_lowercase();
    if !title.is_empty() && (title.contains(keywords) || keywords.contains(title.as_str())) {
        return true;
    }

    let in_description = job
        .description
        .as_deref()
        .is_some_and(|description| description.to_lowercase().contains(keywords));
    if in_description {
        return true;
    }

    job.skills.iter().any(|skill| {
        let skill = skill.trim().to_lowercase();
        !skill.is_empty() && keywords.contains(skill.as_str())
    })
}
