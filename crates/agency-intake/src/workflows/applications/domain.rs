use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::agencies::JobPostId;
use crate::workflows::forms::FormData;

/// Agency-scoped application identifier, e.g. `ACME-007`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Review stage tracked by agency staff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewing,
    Shortlisted,
    Rejected,
    Hired,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewing => "reviewing",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Hired => "hired",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    EducationCertificate,
    WorkExperienceCertificate,
    Other,
}

/// A file the blob store already holds, referenced by `key` from inside the form data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub key: String,
    pub file_name: String,
    pub storage_key: String,
    /// Size in bytes as reported by the blob store.
    pub size: u64,
}

/// Applicant payload accepted at intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationSubmission {
    pub job_post_id: JobPostId,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub form_data: FormData,
    #[serde(default)]
    pub uploads: Vec<UploadedFile>,
    #[serde(default)]
    pub ip_address: Option<String>,
}

/// Supporting file linked to an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDocument {
    pub document_type: DocumentType,
    pub file_name: String,
    pub storage_key: String,
    #[serde(default)]
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDocument {
    #[serde(default = "other_document")]
    pub document_type: DocumentType,
    pub file_name: String,
    pub storage_key: String,
    pub size: u64,
}

fn other_document() -> DocumentType {
    DocumentType::Other
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
    #[serde(default)]
    pub notes: Option<String>,
}
