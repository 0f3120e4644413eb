use super::domain::{Agency, AgencyCode, JobPost, JobPostId};
use crate::workflows::repository::RepositoryError;

/// Storage abstraction for agencies and job posts.
pub trait AgencyRepository: Send + Sync {
    fn insert_agency(&self, agency: Agency) -> Result<Agency, RepositoryError>;
    fn update_agency(&self, agency: Agency) -> Result<(), RepositoryError>;
    fn fetch_agency(&self, code: &AgencyCode) -> Result<Option<Agency>, RepositoryError>;
    /// Conflicts when the agency already has a post with the same title.
    fn insert_job_post(&self, post: JobPost) -> Result<JobPost, RepositoryError>;
    fn update_job_post(&self, post: JobPost) -> Result<(), RepositoryError>;
    fn fetch_job_post(&self, id: JobPostId) -> Result<Option<JobPost>, RepositoryError>;
    fn job_posts_for(&self, code: &AgencyCode) -> Result<Vec<JobPost>, RepositoryError>;
}
