//! # Data Loader Crate
//!
//! Loads job postings and candidate profiles and indexes them in memory.
//!
//! ## Main Components
//!
//! - **types**: Canonical domain types (Job, Cv, EmploymentType, JobBoard)
//! - **parser**: Boundary adapter from camelCase/snake_case JSON rows
//! - **index**: Build lookup indices and validate invariants
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::JobBoard;
//! use std::path::Path;
//!
//! let board = JobBoard::load_from_files(Path::new("data/sample"))?;
//!
//! let job = board.get_job("job-001").unwrap();
//! let cv = board.get_cv("cv-001").unwrap();
//! println!("{} vs {}", job.title, cv.city);
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{
    // Type aliases
    JobId,
    CvId,
    // Core types
    Job,
    Cv,
    SalaryRange,
    ExperienceEntry,
    JobBoard,
    // Enums
    EmploymentType,
};
