//! Boundary adapter from data-layer rows to canonical [`Job`] / [`Cv`] values.
//!
//! The hosted store hands back JSON rows whose field names depend on who
//! wrote them: application objects use camelCase (`employmentType`,
//! `salaryExpected`), raw table rows use snake_case (`employment_type`,
//! `salary_expected`). Some rows carry both. Each canonical field is looked
//! up through an ordered list of accepted keys and the first usable value
//! wins, so each row is converted into its canonical type exactly once.
//!
//! Value tolerance rules:
//! - numbers may be JSON numbers, numeric strings or null; anything else,
//!   including negative or non-finite values, becomes 0
//! - lists may be arrays of strings or a comma separated string
//!   (`,` or the Arabic comma `،`); blank entries are dropped
//! - a salary may be nested (`salary: {min, max}`), flat (`salary_min`,
//!   `salaryMax`) or a single number meaning both ends

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::warn;

type Row = Map<String, Value>;

// Accepted keys per field, in lookup order
const COMPANY_KEYS: &[&str] = &[
    "company",
    "company_name",
    "companyName",
    "clinic_name",
    "clinicName",
];
const EMPLOYMENT_TYPE_KEYS: &[&str] = &["employment_type", "employmentType", "job_type", "jobType"];
const SALARY_MIN_KEYS: &[&str] = &["salary_min", "salaryMin"];
const SALARY_MAX_KEYS: &[&str] = &["salary_max", "salaryMax"];
const JOB_SKILL_KEYS: &[&str] = &["skills", "required_skills", "requiredSkills"];
const MIN_EXPERIENCE_KEYS: &[&str] = &[
    "min_experience",
    "minExperience",
    "experience_years",
    "experienceYears",
];
const CV_ID_KEYS: &[&str] = &["id", "user_id", "userId"];
const FULL_NAME_KEYS: &[&str] = &["full_name", "fullName", "name"];
const BIO_KEYS: &[&str] = &["bio", "about"];
const PREFERRED_LOCATION_KEYS: &[&str] = &[
    "location_preferred",
    "locationPreferred",
    "preferred_locations",
    "preferredLocations",
];
const AVAILABILITY_KEYS: &[&str] = &["availability_type", "availabilityType", "availability"];
const SALARY_EXPECTED_KEYS: &[&str] = &[
    "salary_expected",
    "salaryExpected",
    "expected_salary",
    "expectedSalary",
];

// =============================================================================
// Public entry points
// =============================================================================

/// Parse a `jobs.json` file
pub fn parse_jobs(path: &Path) -> Result<Vec<Job>> {
    let content = read_file(path)?;
    parse_jobs_str(&content, &source_name(path))
}

/// Parse a `cvs.json` file
pub fn parse_cvs(path: &Path) -> Result<Vec<Cv>> {
    let content = read_file(path)?;
    parse_cvs_str(&content, &source_name(path))
}

/// Parse job rows from a JSON document.
///
/// The document is either an array of rows or an object with a `data` array
/// (the shape the hosted query client returns). `source` only labels errors.
pub fn parse_jobs_str(content: &str, source: &str) -> Result<Vec<Job>> {
    parse_rows(content, source, job_from_row)
}

/// Parse CV rows from a JSON document. Same envelope rules as [`parse_jobs_str`].
pub fn parse_cvs_str(content: &str, source: &str) -> Result<Vec<Cv>> {
    parse_rows(content, source, cv_from_row)
}

/// Coerce a loosely typed JSON value into a non-negative finite number.
///
/// Returns `None` when the value isn't numeric at all, so callers can tell
/// "absent" from "zero" while merging alternative fields.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    if n.is_finite() { Some(n.max(0.0)) } else { None }
}

// =============================================================================
// File helpers
// =============================================================================

fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(fs::read_to_string(path)?)
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn record_array(document: Value, source: &str) -> Result<Vec<Value>> {
    match document {
        Value::Array(records) => Ok(records),
        Value::Object(mut envelope) => match envelope.remove("data") {
            Some(Value::Array(records)) => Ok(records),
            _ => Err(DataLoadError::ValidationError(format!(
                "{source}: expected an array of records or an object with a `data` array"
            ))),
        },
        _ => Err(DataLoadError::ValidationError(format!(
            "{source}: expected an array of records"
        ))),
    }
}

fn parse_rows<T>(
    content: &str,
    source: &str,
    convert: fn(&Row) -> std::result::Result<T, String>,
) -> Result<Vec<T>> {
    let records = record_array(serde_json::from_str(content)?, source)?;

    records
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            let converted = match value {
                Value::Object(row) => convert(row),
                other => Err(format!("expected an object, found {}", json_kind(other))),
            };
            converted.map_err(|reason| DataLoadError::ParseError {
                file: source.to_string(),
                record: idx + 1,
                reason,
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Row conversion
// =============================================================================

fn job_from_row(row: &Row) -> std::result::Result<Job, String> {
    let id = first_string(row, &["id"]).ok_or_else(|| "Missing id".to_string())?;

    // Nested salary wins; flat fields fill whatever end it leaves out
    let (nested_min, nested_max) = nested_salary(row);
    let salary = SalaryRange {
        min: nested_min.or_else(|| first_number(row, SALARY_MIN_KEYS)).unwrap_or(0.0),
        max: nested_max.or_else(|| first_number(row, SALARY_MAX_KEYS)).unwrap_or(0.0),
    };

    // A fractional requirement still has to be met in whole years
    let min_experience = first_number(row, MIN_EXPERIENCE_KEYS)
        .map(|years| years.ceil().min(f64::from(u32::MAX)) as u32)
        .unwrap_or(0);

    Ok(Job {
        employment_type: employment_type_label(&id, first_string(row, EMPLOYMENT_TYPE_KEYS)),
        title: first_string(row, &["title"]).unwrap_or_default(),
        company: first_string(row, COMPANY_KEYS),
        description: first_string(row, &["description"]),
        location: first_string(row, &["location"]).unwrap_or_default(),
        salary,
        skills: first_list(row, JOB_SKILL_KEYS),
        min_experience,
        id,
    })
}

fn cv_from_row(row: &Row) -> std::result::Result<Cv, String> {
    // Profiles keyed by their owner's user id are common in the data layer.
    let id = first_string(row, CV_ID_KEYS).ok_or_else(|| "Missing id".to_string())?;

    Ok(Cv {
        availability_type: employment_type_label(&id, first_string(row, AVAILABILITY_KEYS)),
        full_name: first_string(row, FULL_NAME_KEYS),
        bio: first_string(row, BIO_KEYS).unwrap_or_default(),
        city: first_string(row, &["city"]).unwrap_or_default(),
        location_preferred: first_list(row, PREFERRED_LOCATION_KEYS),
        skills: first_list(row, &["skills"]),
        salary_expected: first_number(row, SALARY_EXPECTED_KEYS).unwrap_or(0.0),
        experience: row.get("experience").map(experience_entries).unwrap_or_default(),
        id,
    })
}

fn employment_type_label(record_id: &str, label: Option<String>) -> Option<EmploymentType> {
    let label = label?;
    match label.parse::<EmploymentType>() {
        Ok(employment_type) => Some(employment_type),
        Err(e) => {
            warn!(record = record_id, "ignoring unknown employment type: {}", e);
            None
        }
    }
}

// =============================================================================
// Lenient field lookups
// =============================================================================

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// First key holding a non-blank scalar
fn first_string(row: &Row, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| row.get(*key).and_then(value_to_string))
}

/// First key holding something numeric
fn first_number(row: &Row, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| row.get(*key).and_then(coerce_number))
}

/// First key holding a non-empty list
fn first_list(row: &Row, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .map(|key| row.get(*key).map(string_list).unwrap_or_default())
        .find(|list| !list.is_empty())
        .unwrap_or_default()
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(value_to_string).collect(),
        Value::String(s) => s
            .split([',', '،'])
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn nested_salary(row: &Row) -> (Option<f64>, Option<f64>) {
    match row.get("salary") {
        Some(Value::Object(salary)) => (
            salary.get("min").and_then(coerce_number),
            salary.get("max").and_then(coerce_number),
        ),
        Some(other) => {
            let both = coerce_number(other);
            (both, both)
        }
        None => (None, None),
    }
}

fn experience_entries(value: &Value) -> Vec<ExperienceEntry> {
    let Value::Array(items) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(entry) => Some(ExperienceEntry {
                title: first_string(entry, &["title", "position", "job_title", "jobTitle"]),
                company: first_string(
                    entry,
                    &["company", "company_name", "companyName", "employer"],
                ),
                start: first_string(entry, &["start", "start_date", "startDate", "from"]),
                end: first_string(entry, &["end", "end_date", "endDate", "to"]),
            }),
            Value::String(title) if !title.trim().is_empty() => Some(ExperienceEntry {
                title: Some(title.trim().to_string()),
                ..ExperienceEntry::default()
            }),
            _ => None,
        })
        .collect()
}
