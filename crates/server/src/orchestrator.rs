//! # Match Orchestrator
//!
//! Coordinates the pieces behind the job-search and recommendation pages:
//! 1. Look up the candidate / posting on the board
//! 2. Parse the free-text query into structured filters
//! 3. Narrow the listing with the filter pipeline
//! 4. Score and rank (on the blocking pool, it is pure CPU work)
//! 5. Truncate to the requested limit and attach explanations

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::LookupError;
use data_loader::{Cv, CvId, EmploymentType, Job, JobBoard, JobId};
use matching::{
    parse_smart_search, rank_cvs_for_job, rank_jobs_for_cv, FilterPipeline, MatchResult,
    MatchScorer, MatchWeights, SearchFilters,
};

/// A posting as shown in search results or job recommendations
#[derive(Debug, Clone, Serialize)]
pub struct JobRecommendation {
    pub job_id: JobId,
    pub title: String,
    pub company: Option<String>,
    pub location: String,
    pub employment_type: Option<EmploymentType>,
    /// Present when the listing was scored against a candidate
    pub result: Option<MatchResult>,
    pub explanation: String,
}

/// A candidate as shown to a clinic looking at one of its postings
#[derive(Debug, Clone, Serialize)]
pub struct CandidateRecommendation {
    pub cv_id: CvId,
    pub full_name: Option<String>,
    pub city: String,
    pub result: MatchResult,
    pub explanation: String,
}

/// What a smart search returns: the parsed filters and the surviving postings
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub filters: SearchFilters,
    pub results: Vec<JobRecommendation>,
}

/// Main orchestrator. Cheap to clone; the board is shared read-only.
#[derive(Clone)]
pub struct MatchOrchestrator {
    board: Arc<JobBoard>,
    scorer: MatchScorer,
    filter_pipeline: Arc<FilterPipeline>,
}

impl MatchOrchestrator {
    /// Orchestrator with the default weight table and search filter chain.
    ///
    /// Searches read the board's secondary indices, so build them before
    /// handing the board over.
    pub fn new(board: Arc<JobBoard>) -> Self {
        Self::with_scorer(board, MatchScorer::new())
    }

    pub fn with_scorer(board: Arc<JobBoard>, scorer: MatchScorer) -> Self {
        Self {
            board,
            scorer,
            filter_pipeline: Arc::new(FilterPipeline::for_search()),
        }
    }

    pub fn board(&self) -> &Arc<JobBoard> {
        &self.board
    }

    pub fn scorer(&self) -> &MatchScorer {
        &self.scorer
    }

    /// Smart search over the listing.
    ///
    /// With a `cv_id` the surviving postings are ranked by match score;
    /// without one they keep listing order (by id) and carry no score.
    pub async fn search_jobs(
        &self,
        query: &str,
        cv_id: Option<&str>,
        limit: usize,
    ) -> Result<SearchOutcome> {
        let start_time = Instant::now();

        let filters = parse_smart_search(query);
        debug!(
            location = ?filters.location,
            employment_type = ?filters.employment_type,
            "Parsed search query"
        );

        if let Some(id) = cv_id {
            self.lookup_cv(id)?;
        }

        let results = tokio::task::spawn_blocking({
            let this = self.clone();
            let filters = filters.clone();
            let cv_id = cv_id.map(str::to_string);
            move || this.search_blocking(&filters, cv_id.as_deref(), limit)
        })
        .await
        .context("Search task panicked")??;

        info!(
            "Search {:?} returned {} jobs in {:.2?}",
            query,
            results.len(),
            start_time.elapsed()
        );
        Ok(SearchOutcome { filters, results })
    }

    /// Best postings for one candidate, across the whole board
    pub async fn recommend_jobs(
        &self,
        cv_id: &str,
        limit: usize,
    ) -> Result<Vec<JobRecommendation>> {
        let start_time = Instant::now();
        self.lookup_cv(cv_id)?;

        let recommendations = tokio::task::spawn_blocking({
            let this = self.clone();
            let cv_id = cv_id.to_string();
            move || -> Result<Vec<JobRecommendation>> {
                let cv = this.lookup_cv(&cv_id)?;
                let jobs: Vec<&Job> = this.board.jobs().collect();
                Ok(rank_jobs_for_cv(&this.scorer, &jobs, cv)
                    .into_iter()
                    .take(limit)
                    .map(|m| job_recommendation(m.job, Some(m.result), this.scorer.weights()))
                    .collect())
            }
        })
        .await
        .context("Recommendation task panicked")??;

        info!(
            "Selected top {} jobs for cv {} in {:.2?}",
            recommendations.len(),
            cv_id,
            start_time.elapsed()
        );
        Ok(recommendations)
    }

    /// Best candidates for one posting
    pub async fn recommend_candidates(
        &self,
        job_id: &str,
        limit: usize,
    ) -> Result<Vec<CandidateRecommendation>> {
        let start_time = Instant::now();
        self.lookup_job(job_id)?;

        let recommendations = tokio::task::spawn_blocking({
            let this = self.clone();
            let job_id = job_id.to_string();
            move || -> Result<Vec<CandidateRecommendation>> {
                let job = this.lookup_job(&job_id)?;
                let cvs: Vec<&Cv> = this.board.cvs().collect();
                Ok(rank_cvs_for_job(&this.scorer, &cvs, job)
                    .into_iter()
                    .take(limit)
                    .map(|m| CandidateRecommendation {
                        cv_id: m.cv.id.clone(),
                        full_name: m.cv.full_name.clone(),
                        city: m.cv.city.clone(),
                        result: m.result,
                        explanation: explain(&m.result, this.scorer.weights()),
                    })
                    .collect())
            }
        })
        .await
        .context("Candidate ranking task panicked")??;

        info!(
            "Selected top {} candidates for job {} in {:.2?}",
            recommendations.len(),
            job_id,
            start_time.elapsed()
        );
        Ok(recommendations)
    }

    /// Score a single posting against a single candidate
    pub fn score_pair(&self, job_id: &str, cv_id: &str) -> Result<MatchResult> {
        let job = self.lookup_job(job_id)?;
        let cv = self.lookup_cv(cv_id)?;
        Ok(self.scorer.score(job, cv))
    }

    fn search_blocking(
        &self,
        filters: &SearchFilters,
        cv_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<JobRecommendation>> {
        let candidates = self.seed_listing(filters);
        debug!("Seeded {} jobs from board indices", candidates.len());

        let listing = self
            .filter_pipeline
            .apply(candidates, filters)
            .context("Failed to apply filters")?;
        debug!("Filtering complete, {} jobs remain", listing.len());

        let weights = self.scorer.weights();
        match cv_id {
            Some(id) => {
                let cv = self.lookup_cv(id)?;
                Ok(rank_jobs_for_cv(&self.scorer, &listing, cv)
                    .into_iter()
                    .take(limit)
                    .map(|m| job_recommendation(m.job, Some(m.result), weights))
                    .collect())
            }
            None => Ok(listing
                .into_iter()
                .take(limit)
                .map(|job| job_recommendation(job, None, weights))
                .collect()),
        }
    }

    /// Starting listing for a search, ordered by id.
    ///
    /// Narrowed through the board's location index, or its employment-type
    /// index when no city was named. The filter pipeline still runs over the
    /// result, so both filters hold regardless of which index was used.
    fn seed_listing(&self, filters: &SearchFilters) -> Vec<&Job> {
        let mut jobs: Vec<&Job> = if let Some(tokens) = &filters.location {
            tokens
                .iter()
                .flat_map(|token| self.board.jobs_in_location(token))
                .collect()
        } else if let Some(types) = &filters.employment_type {
            types
                .iter()
                .flat_map(|employment_type| self.board.jobs_by_type(*employment_type))
                .collect()
        } else {
            return self.board.jobs().collect();
        };

        jobs.sort_by(|a, b| a.id.cmp(&b.id));
        jobs.dedup_by(|a, b| a.id == b.id);
        jobs
    }

    fn lookup_job(&self, job_id: &str) -> Result<&Job> {
        self.board
            .get_job(job_id)
            .ok_or_else(|| LookupError::JobNotFound(job_id.to_string()).into())
    }

    fn lookup_cv(&self, cv_id: &str) -> Result<&Cv> {
        self.board
            .get_cv(cv_id)
            .ok_or_else(|| LookupError::CvNotFound(cv_id.to_string()).into())
    }
}

fn job_recommendation(
    job: &Job,
    result: Option<MatchResult>,
    weights: &MatchWeights,
) -> JobRecommendation {
    let explanation = match &result {
        Some(result) => explain(result, weights),
        None => "Matches the search filters".to_string(),
    };

    JobRecommendation {
        job_id: job.id.clone(),
        title: job.title.clone(),
        company: job.company.clone(),
        location: job.location.clone(),
        employment_type: job.employment_type,
        result,
        explanation,
    }
}

/// One short clause per factor that earned points, e.g.
/// `"title matches bio, nearby location, +20 skills"`.
pub fn explain(result: &MatchResult, weights: &MatchWeights) -> String {
    let b = &result.breakdown;
    let mut reasons: Vec<String> = Vec::new();

    if b.title >= weights.title && b.title > 0 {
        reasons.push("title matches bio".to_string());
    } else if b.title > 0 {
        reasons.push("title mentions a skill".to_string());
    }

    if b.location >= weights.location && b.location > 0 {
        reasons.push("preferred location".to_string());
    } else if b.location > 0 {
        reasons.push("nearby location".to_string());
    }

    if b.employment_type > 0 {
        reasons.push("employment type matches".to_string());
    }

    if b.salary >= weights.salary && b.salary > 0 {
        reasons.push("salary meets expectation".to_string());
    } else if b.salary > 0 {
        reasons.push(format!(
            "salary within {:.0}% of expectation",
            weights.salary_partial_ratio * 100.0
        ));
    }

    if b.experience > 0 {
        reasons.push("enough experience".to_string());
    }

    if b.skills > 0 {
        reasons.push(format!("+{} skills", b.skills));
    }

    if reasons.is_empty() {
        "No matching factors".to_string()
    } else {
        reasons.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{ExperienceEntry, SalaryRange};
    use matching::MatchBreakdown;

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    fn build_test_board() -> Arc<JobBoard> {
        let mut board = JobBoard::new();

        board.insert_job(Job {
            id: "j1".to_string(),
            title: "Dentist".to_string(),
            company: Some("Smile Clinic".to_string()),
            location: "Baghdad".to_string(),
            employment_type: Some(EmploymentType::PartTime),
            salary: SalaryRange { min: 500.0, max: 1000.0 },
            skills: vec!["Endodontics".to_string()],
            ..Job::default()
        });
        board.insert_job(Job {
            id: "j2".to_string(),
            title: "Dentist".to_string(),
            location: "Basra".to_string(),
            employment_type: Some(EmploymentType::PartTime),
            salary: SalaryRange { min: 500.0, max: 1000.0 },
            ..Job::default()
        });
        board.insert_job(Job {
            id: "j3".to_string(),
            title: "Receptionist".to_string(),
            location: "Baghdad".to_string(),
            employment_type: Some(EmploymentType::FullTime),
            ..Job::default()
        });

        board.insert_cv(Cv {
            id: "c1".to_string(),
            full_name: Some("Noor".to_string()),
            bio: "Dentist, five years".to_string(),
            city: "Baghdad".to_string(),
            availability_type: Some(EmploymentType::PartTime),
            skills: vec!["endodontics".to_string()],
            salary_expected: 900.0,
            experience: vec![ExperienceEntry::default(); 5],
            ..Cv::default()
        });
        board.insert_cv(Cv {
            id: "c2".to_string(),
            city: "Mosul".to_string(),
            ..Cv::default()
        });

        board.build_secondary_indices();
        Arc::new(board)
    }

    // ============================================================================
    // Tests
    // ============================================================================

    #[tokio::test]
    async fn test_search_without_cv_keeps_listing_order() {
        let orchestrator = MatchOrchestrator::new(build_test_board());

        let outcome = orchestrator
            .search_jobs("part time dentist", None, 10)
            .await
            .unwrap();

        let ids: Vec<&str> = outcome.results.iter().map(|r| r.job_id.as_str()).collect();
        assert_eq!(ids, vec!["j1", "j2"]);
        assert!(outcome.results.iter().all(|r| r.result.is_none()));
        assert_eq!(outcome.filters.employment_type, Some(vec![EmploymentType::PartTime]));
    }

    #[tokio::test]
    async fn test_search_with_cv_ranks_by_score() {
        let orchestrator = MatchOrchestrator::new(build_test_board());

        let outcome = orchestrator
            .search_jobs("dentist", Some("c1"), 10)
            .await
            .unwrap();

        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.results[0].job_id, "j1", "Same-city posting should rank first");
        let best = outcome.results[0].result.unwrap();
        let second = outcome.results[1].result.unwrap();
        assert!(best.score > second.score);
    }

    #[tokio::test]
    async fn test_search_reads_board_indices() {
        let mut board = JobBoard::new();
        board.insert_job(Job {
            id: "j1".to_string(),
            title: "Dentist".to_string(),
            location: "Baghdad - Karrada".to_string(),
            employment_type: Some(EmploymentType::Contract),
            ..Job::default()
        });
        board.build_secondary_indices();
        // Added after the indices were built, so only a full scan sees it
        board.insert_job(Job {
            id: "j2".to_string(),
            title: "Dentist".to_string(),
            location: "Baghdad".to_string(),
            employment_type: Some(EmploymentType::Contract),
            ..Job::default()
        });
        let orchestrator = MatchOrchestrator::new(Arc::new(board));

        let ids = |outcome: SearchOutcome| -> Vec<String> {
            outcome.results.into_iter().map(|r| r.job_id).collect()
        };

        let by_city = orchestrator.search_jobs("dentist in baghdad", None, 10).await.unwrap();
        assert_eq!(ids(by_city), vec!["j1"]);

        let by_type = orchestrator.search_jobs("contract", None, 10).await.unwrap();
        assert_eq!(ids(by_type), vec!["j1"]);

        let unfiltered = orchestrator.search_jobs("dentist", None, 10).await.unwrap();
        assert_eq!(ids(unfiltered), vec!["j1", "j2"]);
    }

    #[tokio::test]
    async fn test_search_respects_limit() {
        let orchestrator = MatchOrchestrator::new(build_test_board());

        let outcome = orchestrator.search_jobs("", None, 2).await.unwrap();
        assert_eq!(outcome.results.len(), 2, "Should truncate to limit of 2");
    }

    #[tokio::test]
    async fn test_unknown_ids_are_lookup_errors() {
        let orchestrator = MatchOrchestrator::new(build_test_board());

        let err = orchestrator.recommend_jobs("nobody", 5).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<LookupError>(),
            Some(&LookupError::CvNotFound("nobody".to_string()))
        );

        let err = orchestrator.recommend_candidates("nothing", 5).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<LookupError>(),
            Some(&LookupError::JobNotFound("nothing".to_string()))
        );

        assert!(orchestrator.search_jobs("dentist", Some("nobody"), 5).await.is_err());
    }

    #[tokio::test]
    async fn test_recommend_jobs() {
        let orchestrator = MatchOrchestrator::new(build_test_board());

        let recommendations = orchestrator.recommend_jobs("c1", 2).await.unwrap();
        assert_eq!(recommendations.len(), 2);
        assert_eq!(recommendations[0].job_id, "j1");
        assert_eq!(recommendations[0].company.as_deref(), Some("Smile Clinic"));
        assert!(recommendations[0].explanation.contains("title matches bio"));
    }

    #[tokio::test]
    async fn test_recommend_candidates() {
        let orchestrator = MatchOrchestrator::new(build_test_board());

        let recommendations = orchestrator.recommend_candidates("j1", 10).await.unwrap();
        assert_eq!(recommendations.len(), 2);
        assert_eq!(recommendations[0].cv_id, "c1");
        assert_eq!(recommendations[0].full_name.as_deref(), Some("Noor"));
        assert!(recommendations[0].result.score > recommendations[1].result.score);
    }

    #[test]
    fn test_score_pair() {
        let orchestrator = MatchOrchestrator::new(build_test_board());

        let result = orchestrator.score_pair("j1", "c1").unwrap();
        assert_eq!(result.breakdown.title, 40);
        assert_eq!(result.breakdown.location, 45);
        assert_eq!(result.breakdown.employment_type, 15);
        assert!(orchestrator.score_pair("j1", "missing").is_err());
    }

    #[test]
    fn test_explain() {
        let weights = MatchWeights::DEFAULT;

        let partial = MatchResult {
            score: 60,
            breakdown: MatchBreakdown {
                title: 20,
                location: 30,
                salary: 10,
                ..MatchBreakdown::default()
            },
        };
        assert_eq!(
            explain(&partial, &weights),
            "title mentions a skill, nearby location, salary within 80% of expectation"
        );

        assert_eq!(explain(&MatchResult::default(), &weights), "No matching factors");
    }
}
