//! Job ↔ candidate compatibility scoring.
//!
//! Six independent factors are scored and summed:
//!
//! | Factor     | Full | Partial | Rule |
//! |------------|------|---------|------|
//! | title      | 40   | 20      | title inside bio / a skill inside title |
//! | location   | 45   | 30      | exact city or preferred / substring of a preferred |
//! | type       | 15   | -       | same employment type |
//! | skills     | 50   | -       | 10 per shared skill, capped |
//! | salary     | 20   | 10      | max covers expectation / covers 80% of it |
//! | experience | 15   | -       | history entries >= required years |
//!
//! Location and title dominate; salary and experience act as feasibility
//! gates. All string comparisons lowercase both sides and nothing more.

use crate::weights::MatchWeights;
use anyhow::Result;
use data_loader::{Cv, Job};
use serde::Serialize;
use std::collections::HashSet;

/// Per-factor points
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchBreakdown {
    pub title: u32,
    pub location: u32,
    pub salary: u32,
    #[serde(rename = "type")]
    pub employment_type: u32,
    pub experience: u32,
    pub skills: u32,
}

impl MatchBreakdown {
    pub fn total(&self) -> u32 {
        self.title
            + self.location
            + self.salary
            + self.employment_type
            + self.experience
            + self.skills
    }
}

/// Score for one job/candidate pair. `score` is always `breakdown.total()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub score: u32,
    pub breakdown: MatchBreakdown,
}

/// Scores job/candidate pairs against a weight table.
///
/// Pure and cheap to copy; share one across threads freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchScorer {
    weights: MatchWeights,
}

/// Score with the default weight table.
pub fn calculate_match_score(job: &Job, cv: &Cv) -> MatchResult {
    MatchScorer::new().score(job, cv)
}

impl MatchScorer {
    pub fn new() -> Self {
        Self {
            weights: MatchWeights::DEFAULT,
        }
    }

    /// Build a scorer from a custom table, rejecting inconsistent ones.
    pub fn with_weights(weights: MatchWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &MatchWeights {
        &self.weights
    }

    /// Score one pair. Missing fields count as zero or empty; never fails.
    pub fn score(&self, job: &Job, cv: &Cv) -> MatchResult {
        let breakdown = MatchBreakdown {
            title: self.title_score(job, cv),
            location: self.location_score(job, cv),
            salary: self.salary_score(job, cv),
            employment_type: self.employment_type_score(job, cv),
            experience: self.experience_score(job, cv),
            skills: self.skills_score(job, cv),
        };

        MatchResult {
            score: breakdown.total(),
            breakdown,
        }
    }

    fn title_score(&self, job: &Job, cv: &Cv) -> u32 {
        let title = normalize(&job.title);
        if title.is_empty() {
            return 0;
        }

        if cv.bio.to_lowercase().contains(&title) {
            return self.weights.title;
        }

        let skill_in_title = cv
            .skills
            .iter()
            .map(|skill| normalize(skill))
            .any(|skill| !skill.is_empty() && title.contains(&skill));

        if skill_in_title {
            self.weights.title_partial
        } else {
            0
        }
    }

    fn location_score(&self, job: &Job, cv: &Cv) -> u32 {
        let location = normalize(&job.location);
        if location.is_empty() {
            return 0;
        }

        let preferred: Vec<String> = cv
            .location_preferred
            .iter()
            .map(|place| normalize(place))
            .filter(|place| !place.is_empty())
            .collect();

        if normalize(&cv.city) == location || preferred.contains(&location) {
            return self.weights.location;
        }

        let overlapping = preferred
            .iter()
            .any(|place| place.contains(&location) || location.contains(place.as_str()));

        if overlapping {
            self.weights.location_partial
        } else {
            0
        }
    }

    fn employment_type_score(&self, job: &Job, cv: &Cv) -> u32 {
        match (job.employment_type, cv.availability_type) {
            (Some(offered), Some(wanted)) if offered == wanted => self.weights.employment_type,
            _ => 0,
        }
    }

    fn skills_score(&self, job: &Job, cv: &Cv) -> u32 {
        let candidate_skills = skill_set(&cv.skills);
        if candidate_skills.is_empty() {
            return 0;
        }

        let shared = skill_set(&job.skills)
            .iter()
            .filter(|skill| candidate_skills.contains(*skill))
            .count();

        u32::try_from(shared)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.weights.skill_point)
            .min(self.weights.skills_cap)
    }

    fn salary_score(&self, job: &Job, cv: &Cv) -> u32 {
        let offered = non_negative(job.salary.max);
        let expected = non_negative(cv.salary_expected);

        if offered >= expected {
            self.weights.salary
        } else if offered >= expected * self.weights.salary_partial_ratio {
            self.weights.salary_partial
        } else {
            0
        }
    }

    fn experience_score(&self, job: &Job, cv: &Cv) -> u32 {
        if cv.experience_years() >= job.min_experience {
            self.weights.experience
        } else {
            0
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

fn skill_set(skills: &[String]) -> HashSet<String> {
    skills
        .iter()
        .map(|skill| normalize(skill))
        .filter(|skill| !skill.is_empty())
        .collect()
}

/// NaN, infinities and negatives all count as 0.
fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}
