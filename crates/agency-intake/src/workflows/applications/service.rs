use std::io::Write;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use super::certificates::{
    document_from, link_certificates, DocumentError, DEFAULT_MAX_UPLOAD_BYTES,
};
use super::domain::{
    ApplicationDocument, ApplicationId, ApplicationStatus, ApplicationSubmission, NewDocument,
    StatusUpdate,
};
use super::export::{write_roster, RosterRow};
use super::repository::{
    ApplicationDetailView, ApplicationRecord, ApplicationRepository, ApplicationSummary,
};
use crate::workflows::agencies::{AgencyCode, AgencyRepository, JobPost, JobPostId};
use crate::workflows::forms::{
    applicant_ages, compute_total_experience, validate_form_data, SchemaMismatch,
};
use crate::workflows::repository::RepositoryError;

const DEFAULT_LIST_LIMIT: usize = 50;

/// Service handling intake, review, and export of applications against job posts.
pub struct ApplicationService<J, R> {
    job_posts: Arc<J>,
    repository: Arc<R>,
    list_limit: usize,
    max_upload_bytes: u64,
}

/// `{CODE}-{n:03}` where `n` is one past the agency's existing application count.
pub fn application_id_for(code: &AgencyCode, existing: usize) -> ApplicationId {
    ApplicationId(format!("{}-{:03}", code.id_prefix(), existing + 1))
}

impl<J, R> ApplicationService<J, R>
where
    J: AgencyRepository + 'static,
    R: ApplicationRepository + 'static,
{
    pub fn new(job_posts: Arc<J>, repository: Arc<R>) -> Self {
        Self {
            job_posts,
            repository,
            list_limit: DEFAULT_LIST_LIMIT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Page size used when a listing does not ask for one. Zero keeps the current value.
    pub fn with_list_limit(mut self, list_limit: usize) -> Self {
        if list_limit > 0 {
            self.list_limit = list_limit;
        }
        self
    }

    pub fn list_limit(&self) -> usize {
        self.list_limit
    }

    /// Largest accepted supporting file, in bytes.
    pub fn with_max_upload_bytes(mut self, max_upload_bytes: u64) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    /// Accept a submission whose form data matches the job post's own schema exactly.
    pub fn submit(
        &self,
        submission: ApplicationSubmission,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let post = self
            .job_posts
            .fetch_job_post(submission.job_post_id)?
            .ok_or(ApplicationServiceError::UnknownJobPost(submission.job_post_id))?;
        if !post.is_active {
            return Err(ApplicationServiceError::ClosedJobPost(post.id));
        }

        let full_name = submission.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(ApplicationServiceError::MissingContact("full_name"));
        }
        let email = submission.email.trim().to_string();
        if email.is_empty() {
            return Err(ApplicationServiceError::MissingContact("email"));
        }

        if let Err(mismatch) = validate_form_data(&post.form_schema, &submission.form_data) {
            warn!(job_post = %post.id, error = %mismatch, "submission rejected");
            return Err(mismatch.into());
        }

        let now = Utc::now();
        let mut form_data = submission.form_data;
        let documents = link_certificates(
            &mut form_data,
            &submission.uploads,
            self.max_upload_bytes,
            now,
        )?;

        let existing = self.repository.count_for_agency(&post.agency_code)?;
        let record = ApplicationRecord {
            application_id: application_id_for(&post.agency_code, existing),
            job_post_id: post.id,
            agency_code: post.agency_code.clone(),
            full_name,
            email,
            phone: submission.phone.trim().to_string(),
            form_data,
            status: ApplicationStatus::default(),
            notes: String::new(),
            documents,
            ip_address: submission.ip_address,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(record)?;
        info!(
            application = %stored.application_id,
            job_post = %stored.job_post_id,
            documents = stored.documents.len(),
            "application submitted"
        );
        Ok(stored)
    }

    pub fn get(&self, id: &ApplicationId) -> Result<ApplicationRecord, ApplicationServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Record plus job title, total experience, and ages, evaluated against the job's schema.
    pub fn detail(
        &self,
        id: &ApplicationId,
        today: NaiveDate,
    ) -> Result<ApplicationDetailView, ApplicationServiceError> {
        let record = self.get(id)?;
        let post = self.job_post(record.job_post_id)?;

        Ok(ApplicationDetailView {
            job_title: post.title.clone(),
            total_experience: compute_total_experience(&post.form_schema, &record.form_data),
            ages: applicant_ages(&post.form_schema, &record.form_data, today),
            record,
        })
    }

    /// Newest applications first, capped at `limit` or the configured page size.
    pub fn list_for_job_post(
        &self,
        job_post_id: JobPostId,
        limit: Option<usize>,
    ) -> Result<Vec<ApplicationSummary>, ApplicationServiceError> {
        self.job_post(job_post_id)?;
        let limit = limit.filter(|limit| *limit > 0).unwrap_or(self.list_limit);

        let mut records = self.repository.for_job_post(job_post_id)?;
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.application_id.cmp(&a.application_id))
        });

        Ok(records
            .iter()
            .take(limit)
            .map(ApplicationRecord::summary)
            .collect())
    }

    pub fn update_status(
        &self,
        id: &ApplicationId,
        update: StatusUpdate,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let mut record = self.get(id)?;
        let previous = record.status;
        record.status = update.status;
        if let Some(notes) = update.notes {
            record.notes = notes;
        }
        record.updated_at = Utc::now();

        self.repository.update(record.clone())?;
        info!(
            application = %record.application_id,
            from = previous.label(),
            to = record.status.label(),
            "application status updated"
        );
        Ok(record)
    }

    pub fn attach_document(
        &self,
        id: &ApplicationId,
        document: NewDocument,
    ) -> Result<ApplicationDocument, ApplicationServiceError> {
        let mut record = self.get(id)?;
        let now = Utc::now();
        let attached = document_from(
            document.document_type,
            &document.file_name,
            &document.storage_key,
            document.size,
            self.max_upload_bytes,
            now,
        )?;

        record.documents.push(attached.clone());
        record.updated_at = now;
        self.repository.update(record)?;
        Ok(attached)
    }

    /// Write the job post's roster as CSV, oldest application first.
    pub fn export_roster<W: Write>(
        &self,
        job_post_id: JobPostId,
        writer: W,
    ) -> Result<usize, ApplicationServiceError> {
        let post = self.job_post(job_post_id)?;
        let mut records = self.repository.for_job_post(job_post_id)?;
        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.application_id.cmp(&b.application_id))
        });

        let rows = records.iter().map(|record| {
            RosterRow::new(
                record,
                compute_total_experience(&post.form_schema, &record.form_data),
            )
        });
        let written = write_roster(writer, rows)?;
        info!(job_post = %post.id, rows = written, "roster exported");
        Ok(written)
    }

    fn job_post(&self, id: JobPostId) -> Result<JobPost, ApplicationServiceError> {
        let post = self
            .job_posts
            .fetch_job_post(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(post)
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error(transparent)]
    Mismatch(#[from] SchemaMismatch),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("roster export failed: {0}")]
    Export(#[from] csv::Error),
    #[error("job post {0} does not exist")]
    UnknownJobPost(JobPostId),
    #[error("job post {0} is not accepting applications")]
    ClosedJobPost(JobPostId),
    #[error("applicant {0} is required")]
    MissingContact(&'static str),
}
