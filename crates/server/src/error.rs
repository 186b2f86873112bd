use thiserror::Error;

/// A requested record isn't on the board
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Job {0} not found")]
    JobNotFound(String),

    #[error("CV {0} not found")]
    CvNotFound(String),
}
