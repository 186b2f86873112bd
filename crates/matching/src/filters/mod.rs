//! Filter implementations for the job listing.
//!
//! Each one reads a single part of [`crate::SearchFilters`].

pub mod employment_type;
pub mod keyword;
pub mod location;

// Re-export for convenience
pub use employment_type::EmploymentTypeFilter;
pub use keyword::KeywordFilter;
pub use location::LocationFilter;
