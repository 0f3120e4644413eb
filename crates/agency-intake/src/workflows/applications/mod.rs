//! Application intake against job post schemas, review status, supporting documents, and the
//! CSV roster export.

pub mod certificates;
pub mod domain;
pub mod export;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use certificates::{
    accepted_document_type, check_document_size, link_certificates, DocumentError,
    DEFAULT_MAX_UPLOAD_BYTES,
};
pub use domain::{
    ApplicationDocument, ApplicationId, ApplicationStatus, ApplicationSubmission, DocumentType,
    NewDocument, StatusUpdate, UploadedFile,
};
pub use export::{write_roster, RosterRow};
pub use repository::{
    ApplicationDetailView, ApplicationRecord, ApplicationRepository, ApplicationSummary,
};
pub use router::application_router;
pub use service::{application_id_for, ApplicationService, ApplicationServiceError};
