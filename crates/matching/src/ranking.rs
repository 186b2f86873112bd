//! Ranking many postings or candidates at once.
//!
//! Scoring is independent per pair, so it runs on the rayon pool. Results
//! are ordered by score (highest first) and then by id, which keeps the
//! output stable from run to run.

use crate::scorer::{MatchResult, MatchScorer};
use data_loader::{Cv, Job};
use rayon::prelude::*;

/// A posting scored against one candidate
#[derive(Debug, Clone, Copy)]
pub struct JobMatch<'a> {
    pub job: &'a Job,
    pub result: MatchResult,
}

/// A candidate scored against one posting
#[derive(Debug, Clone, Copy)]
pub struct CandidateMatch<'a> {
    pub cv: &'a Cv,
    pub result: MatchResult,
}

/// Score every posting for `cv` and sort best first.
pub fn rank_jobs_for_cv<'a>(scorer: &MatchScorer, jobs: &[&'a Job], cv: &Cv) -> Vec<JobMatch<'a>> {
    let mut matches: Vec<JobMatch<'a>> = jobs
        .par_iter()
        .map(|&job| JobMatch {
            job,
            result: scorer.score(job, cv),
        })
        .collect();

    matches.sort_by(|a, b| {
        b.result
            .score
            .cmp(&a.result.score)
            .then_with(|| a.job.id.cmp(&b.job.id))
    });
    matches
}

/// Score every candidate for `job` and sort best first.
pub fn rank_cvs_for_job<'a>(
    scorer: &MatchScorer,
    cvs: &[&'a Cv],
    job: &Job,
) -> Vec<CandidateMatch<'a>> {
    let mut matches: Vec<CandidateMatch<'a>> = cvs
        .par_iter()
        .map(|&cv| CandidateMatch {
            cv,
            result: scorer.score(job, cv),
        })
        .collect();

    matches.sort_by(|a, b| {
        b.result
            .score
            .cmp(&a.result.score)
            .then_with(|| a.cv.id.cmp(&b.cv.id))
    });
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: &str, location: &str) -> Job {
        Job {
            id: id.to_string(),
            title: "Dentist".to_string(),
            location: location.to_string(),
            ..Job::default()
        }
    }

    #[test]
    fn test_rank_jobs_orders_by_score_then_id() {
        let jobs = [job("b", "Basra"), job("c", "Baghdad"), job("a", "Basra")];
        let refs: Vec<&Job> = jobs.iter().collect();

        let cv = Cv {
            id: "cv".to_string(),
            city: "Baghdad".to_string(),
            ..Cv::default()
        };

        let ranked = rank_jobs_for_cv(&MatchScorer::new(), &refs, &cv);
        let ids: Vec<&str> = ranked.iter().map(|m| m.job.id.as_str()).collect();

        assert_eq!(ids, vec!["c", "a", "b"]);
        assert!(ranked[0].result.score > ranked[1].result.score);
        assert_eq!(ranked[1].result.score, ranked[2].result.score);
    }

    #[test]
    fn test_rank_cvs_for_job() {
        let posting = job("j", "Erbil");
        let cvs = [
            Cv {
                id: "far".to_string(),
                city: "Basra".to_string(),
                ..Cv::default()
            },
            Cv {
                id: "near".to_string(),
                city: "Basra".to_string(),
                location_preferred: vec!["Erbil".to_string()],
                ..Cv::default()
            },
        ];
        let refs: Vec<&Cv> = cvs.iter().collect();

        let ranked = rank_cvs_for_job(&MatchScorer::new(), &refs, &posting);
        assert_eq!(ranked[0].cv.id, "near");
        assert_eq!(ranked[0].result.breakdown.location, 45);
        assert_eq!(ranked[1].result.breakdown.location, 0);
    }

    #[test]
    fn test_empty_input() {
        let cv = Cv::default();
        assert!(rank_jobs_for_cv(&MatchScorer::new(), &[], &cv).is_empty());
    }
}
