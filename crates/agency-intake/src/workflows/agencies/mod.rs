//! Agencies and their job posts: owners of the default and job-level form schemas.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{slugify, Agency, AgencyCode, JobPost, JobPostId, NewAgency, NewJobPost};
pub use repository::AgencyRepository;
pub use router::agency_router;
pub use service::{AgencyService, AgencyServiceError};
