use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::info;

use super::domain::{slugify, Agency, AgencyCode, JobPost, JobPostId, NewAgency, NewJobPost};
use super::repository::AgencyRepository;
use crate::workflows::forms::{
    agency_default_schema, merge_schemas, FormSchema, SchemaStructureError,
};
use crate::workflows::repository::RepositoryError;

/// Service owning agency/job post writes and the effective-schema read.
pub struct AgencyService<R> {
    repository: Arc<R>,
}

static JOB_POST_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_job_post_id() -> JobPostId {
    JobPostId(JOB_POST_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

impl<R> AgencyService<R>
where
    R: AgencyRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Create an agency, deriving its code from the name and installing the template schema
    /// when none was supplied.
    pub fn create_agency(&self, request: NewAgency) -> Result<Agency, AgencyServiceError> {
        let name = request.name.trim().to_string();
        let code = slugify(request.code.as_deref().unwrap_or(&name));
        if name.is_empty() || code.is_empty() {
            return Err(AgencyServiceError::InvalidAgencyName(request.name));
        }

        let default_form_schema = match request.default_form_schema {
            Some(value) if !is_empty_document(&value) => FormSchema::from_value(value)?,
            _ => agency_default_schema(),
        };

        let now = Utc::now();
        let agency = Agency {
            code: AgencyCode(code),
            name,
            description: request.description,
            instructions: request.instructions,
            default_form_schema,
            is_active: request.is_active,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert_agency(agency)?;
        info!(agency = %stored.code, fields = stored.default_form_schema.fields.len(), "agency created");
        Ok(stored)
    }

    pub fn agency(&self, code: &AgencyCode) -> Result<Agency, AgencyServiceError> {
        let agency = self
            .repository
            .fetch_agency(code)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(agency)
    }

    /// Replace an agency's default schema after validating it.
    pub fn replace_default_schema(
        &self,
        code: &AgencyCode,
        schema: Value,
    ) -> Result<Agency, AgencyServiceError> {
        let schema = FormSchema::from_value(schema)?;
        let mut agency = self.agency(code)?;
        agency.default_form_schema = schema;
        agency.updated_at = Utc::now();
        self.repository.update_agency(agency.clone())?;
        info!(agency = %agency.code, "default form schema replaced");
        Ok(agency)
    }

    pub fn create_job_post(&self, request: NewJobPost) -> Result<JobPost, AgencyServiceError> {
        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(AgencyServiceError::MissingTitle);
        }

        let form_schema = FormSchema::from_value(request.form_schema)?;
        if self.repository.fetch_agency(&request.agency_code)?.is_none() {
            return Err(AgencyServiceError::UnknownAgency(request.agency_code));
        }

        let now = Utc::now();
        let post = JobPost {
            id: next_job_post_id(),
            agency_code: request.agency_code,
            title,
            description: request.description,
            form_schema,
            is_active: request.is_active,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert_job_post(post)?;
        info!(job_post = %stored.id, agency = %stored.agency_code, "job post created");
        Ok(stored)
    }

    pub fn job_post(&self, id: JobPostId) -> Result<JobPost, AgencyServiceError> {
        let post = self
            .repository
            .fetch_job_post(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(post)
    }

    /// Active job posts of an existing agency, oldest first.
    pub fn active_job_posts(&self, code: &AgencyCode) -> Result<Vec<JobPost>, AgencyServiceError> {
        self.agency(code)?;
        let mut posts: Vec<JobPost> = self
            .repository
            .job_posts_for(code)?
            .into_iter()
            .filter(|post| post.is_active)
            .collect();
        posts.sort_by_key(|post| (post.created_at, post.id));
        Ok(posts)
    }

    pub fn replace_job_schema(
        &self,
        id: JobPostId,
        schema: Value,
    ) -> Result<JobPost, AgencyServiceError> {
        let schema = FormSchema::from_value(schema)?;
        let mut post = self.job_post(id)?;
        post.form_schema = schema;
        post.updated_at = Utc::now();
        self.repository.update_job_post(post.clone())?;
        info!(job_post = %post.id, "job post form schema replaced");
        Ok(post)
    }

    /// The agency default schema overlaid with the job post's own schema, for display.
    pub fn effective_schema(&self, id: JobPostId) -> Result<FormSchema, AgencyServiceError> {
        let post = self.job_post(id)?;
        let agency = self.agency(&post.agency_code)?;
        Ok(merge_schemas(&agency.default_form_schema, &post.form_schema))
    }
}

fn is_empty_document(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Error raised by the agency service.
#[derive(Debug, thiserror::Error)]
pub enum AgencyServiceError {
    #[error(transparent)]
    Schema(#[from] SchemaStructureError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("agency name '{0}' does not produce a usable code")]
    InvalidAgencyName(String),
    #[error("unknown agency '{0}'")]
    UnknownAgency(AgencyCode),
    #[error("job post title is required")]
    MissingTitle,
}
