//! Loads the bundled sample dataset end to end.

use data_loader::{EmploymentType, JobBoard, SalaryRange};
use std::path::{Path, PathBuf};

fn sample_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/sample")
}

#[test]
fn test_load_sample_dataset() {
    let board = JobBoard::load_from_files(&sample_dir()).unwrap();
    assert_eq!(board.counts(), (8, 5));
}

#[test]
fn test_mixed_field_spellings_are_normalized() {
    let board = JobBoard::load_from_files(&sample_dir()).unwrap();

    // camelCase row
    let assistant = board.get_job("job-002").unwrap();
    assert_eq!(assistant.company.as_deref(), Some("Smile Clinic"));
    assert_eq!(assistant.employment_type, Some(EmploymentType::PartTime));
    assert_eq!(assistant.salary, SalaryRange { min: 300.0, max: 500.0 });

    // snake_case row with alternate names
    let ortho = board.get_job("job-003").unwrap();
    assert_eq!(ortho.skills, vec!["Braces", "Aligners", "Cephalometrics"]);
    assert_eq!(ortho.min_experience, 5);
    assert_eq!(ortho.salary.max, 2500.0);

    // single-number salary
    let reception = board.get_job("job-005").unwrap();
    assert_eq!(reception.salary, SalaryRange { min: 400.0, max: 400.0 });

    // non-numeric salary
    assert_eq!(board.get_job("job-007").unwrap().salary.max, 0.0);
    assert_eq!(board.get_cv("cv-005").unwrap().salary_expected, 0.0);

    // profile keyed by userId
    let technician = board.get_cv("cv-002").unwrap();
    assert_eq!(technician.salary_expected, 1000.0);
    assert_eq!(technician.experience_years(), 1);
}

#[test]
fn test_sample_indices() {
    let board = JobBoard::load_from_files(&sample_dir()).unwrap();

    let baghdad: Vec<&str> = board
        .jobs_in_location("baghdad")
        .iter()
        .map(|job| job.id.as_str())
        .collect();
    assert_eq!(baghdad, vec!["job-001", "job-002", "job-008"]);

    assert_eq!(board.jobs_by_type(EmploymentType::Contract).len(), 2);
}
