//! Point values for each match factor.
//!
//! Full credit, partial credit and caps live together so a deployment can
//! retune them from a JSON file without touching the scoring rules.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

/// Points awarded per factor.
///
/// Deserializing fills any field missing from the input with its
/// [`MatchWeights::DEFAULT`] value, so a file may override a subset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchWeights {
    /// Job title found in the candidate bio
    pub title: u32,
    /// Job title mentions one of the candidate's skills
    pub title_partial: u32,
    /// Job location equals the candidate's city or a preferred location
    pub location: u32,
    /// Job location and a preferred location contain one another
    pub location_partial: u32,
    pub employment_type: u32,
    /// Points per shared skill
    pub skill_point: u32,
    /// Ceiling on the whole skills factor
    pub skills_cap: u32,
    /// Job max salary covers the expectation
    pub salary: u32,
    /// Job max salary covers at least `salary_partial_ratio` of the expectation
    pub salary_partial: u32,
    pub salary_partial_ratio: f64,
    pub experience: u32,
}

impl MatchWeights {
    pub const DEFAULT: MatchWeights = MatchWeights {
        title: 40,
        title_partial: 20,
        location: 45,
        location_partial: 30,
        employment_type: 15,
        skill_point: 10,
        skills_cap: 50,
        salary: 20,
        salary_partial: 10,
        salary_partial_ratio: 0.8,
        experience: 15,
    };

    /// Highest score any job/candidate pair can reach
    pub fn max_total(&self) -> u32 {
        self.title
            + self.location
            + self.employment_type
            + self.skills_cap
            + self.salary
            + self.experience
    }

    /// Reject tables where partial credit outranks full credit or the
    /// salary ratio isn't a fraction in (0, 1].
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.title_partial <= self.title,
            "title_partial ({}) exceeds title ({})",
            self.title_partial,
            self.title
        );
        ensure!(
            self.location_partial <= self.location,
            "location_partial ({}) exceeds location ({})",
            self.location_partial,
            self.location
        );
        ensure!(
            self.salary_partial <= self.salary,
            "salary_partial ({}) exceeds salary ({})",
            self.salary_partial,
            self.salary
        );
        ensure!(
            self.salary_partial_ratio > 0.0 && self.salary_partial_ratio <= 1.0,
            "salary_partial_ratio must be in (0, 1], got {}",
            self.salary_partial_ratio
        );
        Ok(())
    }
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ceiling() {
        assert_eq!(MatchWeights::DEFAULT.max_total(), 185);
        assert!(MatchWeights::DEFAULT.validate().is_ok());
    }

    #[test]
    fn test_partial_above_full_is_rejected() {
        let weights = MatchWeights {
            location_partial: 50,
            ..MatchWeights::DEFAULT
        };
        assert!(weights.validate().is_err());

        let weights = MatchWeights {
            salary_partial_ratio: 1.5,
            ..MatchWeights::DEFAULT
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_partial_json_override() {
        let weights: MatchWeights = serde_json::from_str(r#"{"skills_cap": 30}"#).unwrap();
        assert_eq!(weights.skills_cap, 30);
        assert_eq!(weights.title, 40);
        assert_eq!(weights.max_total(), 165);
    }
}
