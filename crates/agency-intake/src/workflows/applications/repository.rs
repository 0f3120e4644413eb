use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ApplicationDocument, ApplicationId, ApplicationStatus};
use crate::workflows::agencies::{AgencyCode, JobPostId};
use crate::workflows::forms::{ApplicantAge, ExperienceDuration, FormData};
use crate::workflows::repository::RepositoryError;

/// Stored application, including the form data exactly as accepted at intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub application_id: ApplicationId,
    pub job_post_id: JobPostId,
    pub agency_code: AgencyCode,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub form_data: FormData,
    pub status: ApplicationStatus,
    pub notes: String,
    pub documents: Vec<ApplicationDocument>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationRecord {
    pub fn summary(&self) -> ApplicationSummary {
        ApplicationSummary {
            application_id: self.application_id.clone(),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            status: self.status.label(),
            documents: self.documents.len(),
            created_at: self.created_at,
        }
    }
}

/// Storage abstraction for applications.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError>;
    fn update(&self, record: ApplicationRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError>;
    fn for_job_post(&self, job_post_id: JobPostId) -> Result<Vec<ApplicationRecord>, RepositoryError>;
    fn count_for_agency(&self, code: &AgencyCode) -> Result<usize, RepositoryError>;
}

/// Listing row for a job post's applications.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationSummary {
    pub application_id: ApplicationId,
    pub full_name: String,
    pub email: String,
    pub status: &'static str,
    pub documents: usize,
    pub created_at: DateTime<Utc>,
}

/// Reviewer-facing view with values derived from the form data.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationDetailView {
    #[serde(flatten)]
    pub record: ApplicationRecord,
    pub job_title: String,
    pub total_experience: ExperienceDuration,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ages: Vec<ApplicantAge>,
}
