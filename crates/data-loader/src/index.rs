//! JobBoard building and indexing logic.
//!
//! - Load `jobs.json` and `cvs.json` from a data directory in parallel
//! - Build secondary indices (location, employment type)
//! - Validate the invariants the matching core relies on

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::path::Path;
use tracing::{debug, info};

impl JobBoard {
    /// Load every job posting and candidate profile from a directory.
    ///
    /// Steps:
    /// 1. Parse both files in parallel
    /// 2. Insert records (later duplicates replace earlier ones)
    /// 3. Build secondary indices
    /// 4. Validate
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading marketplace data from {:?}", data_dir);

        let jobs_path = data_dir.join("jobs.json");
        let cvs_path = data_dir.join("cvs.json");

        let (jobs, cvs) = rayon::join(
            || parser::parse_jobs(&jobs_path),
            || parser::parse_cvs(&cvs_path),
        );
        let jobs = jobs?;
        let cvs = cvs?;

        info!("Parsed {} jobs, {} cvs", jobs.len(), cvs.len());

        let mut board = JobBoard::new();
        for job in jobs {
            board.insert_job(job);
        }
        for cv in cvs {
            board.insert_cv(cv);
        }

        board.build_secondary_indices();
        board.validate()?;

        let (job_count, cv_count) = board.counts();
        info!(jobs = job_count, cvs = cv_count, "JobBoard built and validated");
        Ok(board)
    }

    /// Rebuild the location and employment-type indices from scratch.
    ///
    /// Call again after inserting postings by hand.
    pub fn build_secondary_indices(&mut self) {
        self.location_index.clear();
        self.type_index.clear();

        for (job_id, job) in &self.jobs {
            let location = job.location.trim().to_lowercase();
            if !location.is_empty() {
                self.location_index
                    .entry(location)
                    .or_default()
                    .push(job_id.clone());
            }

            if let Some(employment_type) = job.employment_type {
                self.type_index
                    .entry(employment_type)
                    .or_default()
                    .push(job_id.clone());
            }
        }

        debug!(
            locations = self.location_index.len(),
            types = self.type_index.len(),
            "secondary indices built"
        );
    }

    /// Check that:
    /// - every posting's salary range is ordered (`max >= min` when both are set)
    /// - no id is blank
    pub fn validate(&self) -> Result<()> {
        for job in self.jobs.values() {
            if job.id.trim().is_empty() {
                return Err(DataLoadError::ValidationError(
                    "job with blank id".to_string(),
                ));
            }

            let SalaryRange { min, max } = job.salary;
            if min > 0.0 && max > 0.0 && max < min {
                return Err(DataLoadError::ValidationError(format!(
                    "job {}: salary max {} is below min {}",
                    job.id, max, min
                )));
            }
        }

        if self.cvs.keys().any(|id| id.trim().is_empty()) {
            return Err(DataLoadError::ValidationError(
                "cv with blank id".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: &str, location: &str, employment_type: Option<EmploymentType>) -> Job {
        Job {
            id: id.to_string(),
            title: "Dental Assistant".to_string(),
            location: location.to_string(),
            employment_type,
            ..Job::default()
        }
    }

    #[test]
    fn test_secondary_indices() {
        let mut board = JobBoard::new();
        board.insert_job(job("1", "Baghdad", Some(EmploymentType::FullTime)));
        board.insert_job(job("2", "baghdad - Karrada", Some(EmploymentType::PartTime)));
        board.insert_job(job("3", "Basra", Some(EmploymentType::FullTime)));
        board.insert_job(job("4", "", None));
        board.build_secondary_indices();

        let in_baghdad: Vec<&str> = board
            .jobs_in_location("BAGHDAD")
            .iter()
            .map(|j| j.id.as_str())
            .collect();
        assert_eq!(in_baghdad, vec!["1", "2"]);

        assert_eq!(board.jobs_by_type(EmploymentType::FullTime).len(), 2);
        assert!(board.jobs_by_type(EmploymentType::Contract).is_empty());
        assert!(board.jobs_in_location("  ").is_empty());
    }

    #[test]
    fn test_validate_rejects_inverted_salary() {
        let mut board = JobBoard::new();
        let mut bad = job("1", "Erbil", None);
        bad.salary = SalaryRange { min: 1000.0, max: 500.0 };
        board.insert_job(bad);

        assert!(matches!(
            board.validate(),
            Err(DataLoadError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_allows_open_ended_salary() {
        let mut board = JobBoard::new();
        let mut open = job("1", "Erbil", None);
        open.salary = SalaryRange { min: 1000.0, max: 0.0 };
        board.insert_job(open);

        assert!(board.validate().is_ok());
    }

    #[test]
    fn test_missing_directory() {
        let err = JobBoard::load_from_files(Path::new("does/not/exist")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
