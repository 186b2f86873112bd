//! Core domain types for the job marketplace.
//!
//! These are the canonical shapes every other crate works with. The raw
//! rows coming out of the data layer (camelCase or snake_case, numbers as
//! strings, nullable lists) are adapted into these types once, in
//! [`crate::parser`], and nowhere else.

use crate::error::DataLoadError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier of a job posting (a row id from the data layer)
pub type JobId = String;

/// Identifier of a candidate profile
pub type CvId = String;

// =============================================================================
// Employment Type
// =============================================================================

/// Time commitment of a posting, or the kind of work a candidate is available for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Temporary,
}

impl EmploymentType {
    pub const ALL: [EmploymentType; 4] = [
        EmploymentType::FullTime,
        EmploymentType::PartTime,
        EmploymentType::Contract,
        EmploymentType::Temporary,
    ];

    /// Canonical wire label (`full_time`, `part_time`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "full_time",
            EmploymentType::PartTime => "part_time",
            EmploymentType::Contract => "contract",
            EmploymentType::Temporary => "temporary",
        }
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lenient label parsing.
///
/// Accepts `full_time`, `full-time`, `Full Time`, `fullTime` and `FULLTIME`
/// alike by dropping separators and case before comparing.
impl FromStr for EmploymentType {
    type Err = DataLoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "fulltime" => Ok(EmploymentType::FullTime),
            "parttime" => Ok(EmploymentType::PartTime),
            "contract" => Ok(EmploymentType::Contract),
            "temporary" | "temp" => Ok(EmploymentType::Temporary),
            _ => Err(DataLoadError::InvalidValue {
                field: "employment_type".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

// =============================================================================
// Job
// =============================================================================

/// Salary range in the local currency unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
}

/// A job posting from a clinic, lab or company
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    /// Clinic / lab / company name, display only
    pub company: Option<String>,
    pub description: Option<String>,
    /// Free-text city or region label
    pub location: String,
    pub employment_type: Option<EmploymentType>,
    pub salary: SalaryRange,
    /// Skill labels; order carries no meaning
    pub skills: Vec<String>,
    /// Minimum years of experience, 0 when the posting doesn't say
    pub min_experience: u32,
}

// =============================================================================
// CV
// =============================================================================

/// One line of a candidate's employment history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: Option<String>,
    pub company: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// A candidate profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cv {
    pub id: CvId,
    pub full_name: Option<String>,
    pub bio: String,
    /// Primary location
    pub city: String,
    /// Locations the candidate is willing to work in, most preferred first
    pub location_preferred: Vec<String>,
    pub availability_type: Option<EmploymentType>,
    pub skills: Vec<String>,
    pub salary_expected: f64,
    pub experience: Vec<ExperienceEntry>,
}

impl Cv {
    /// Years of experience credited for matching.
    ///
    /// One year per history entry. Start and end markers are not read.
    pub fn experience_years(&self) -> u32 {
        u32::try_from(self.experience.len()).unwrap_or(u32::MAX)
    }
}

// =============================================================================
// JobBoard - in-memory index over jobs and candidates
// =============================================================================

/// Holds every loaded job and CV plus lookup indices.
///
/// Stands in for the hosted relational store: the rest of the workspace
/// only ever reads from it.
#[derive(Debug)]
pub struct JobBoard {
    pub(crate) jobs: BTreeMap<JobId, Job>,
    pub(crate) cvs: BTreeMap<CvId, Cv>,

    /// Lowercased job location -> postings in that location
    pub(crate) location_index: HashMap<String, Vec<JobId>>,
    /// Postings grouped by employment type
    pub(crate) type_index: HashMap<EmploymentType, Vec<JobId>>,
}

impl JobBoard {
    /// Creates a new, empty JobBoard
    pub fn new() -> Self {
        Self {
            jobs: BTreeMap::new(),
            cvs: BTreeMap::new(),
            location_index: HashMap::new(),
            type_index: HashMap::new(),
        }
    }

    pub fn get_job(&self, id: &str) -> Option<&Job> {
        self.jobs.get(id)
    }

    pub fn get_cv(&self, id: &str) -> Option<&Cv> {
        self.cvs.get(id)
    }

    /// All postings, ordered by id
    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values()
    }

    /// All candidate profiles, ordered by id
    pub fn cvs(&self) -> impl Iterator<Item = &Cv> {
        self.cvs.values()
    }

    /// Postings whose location label contains `token` (case-insensitive).
    ///
    /// Uses the location index, so it only sees jobs present when
    /// [`JobBoard::build_secondary_indices`] last ran.
    pub fn jobs_in_location(&self, token: &str) -> Vec<&Job> {
        let token = token.trim().to_lowercase();
        if token.is_empty() {
            return Vec::new();
        }

        let mut ids: Vec<&JobId> = self
            .location_index
            .iter()
            .filter(|(location, _)| location.contains(&token))
            .flat_map(|(_, ids)| ids.iter())
            .collect();
        ids.sort();
        ids.dedup();

        ids.into_iter().filter_map(|id| self.jobs.get(id)).collect()
    }

    /// Postings of one employment type
    pub fn jobs_by_type(&self, employment_type: EmploymentType) -> Vec<&Job> {
        self.type_index
            .get(&employment_type)
            .map(|ids| ids.iter().filter_map(|id| self.jobs.get(id)).collect())
            .unwrap_or_default()
    }

    /// Insert a posting. An existing posting with the same id is replaced.
    pub fn insert_job(&mut self, job: Job) {
        self.jobs.insert(job.id.clone(), job);
    }

    /// Insert a candidate profile. An existing profile with the same id is replaced.
    pub fn insert_cv(&mut self, cv: Cv) {
        self.cvs.insert(cv.id.clone(), cv);
    }

    /// (jobs, cvs)
    pub fn counts(&self) -> (usize, usize) {
        (self.jobs.len(), self.cvs.len())
    }
}

impl Default for JobBoard {
    fn default() -> Self {
        Self::new()
    }
}
