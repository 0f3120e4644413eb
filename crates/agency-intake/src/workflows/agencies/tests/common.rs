use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::{json, Value};

use crate::workflows::agencies::domain::{Agency, AgencyCode, JobPost, JobPostId, NewAgency, NewJobPost};
use crate::workflows::agencies::repository::AgencyRepository;
use crate::workflows::agencies::service::AgencyService;
use crate::workflows::repository::RepositoryError;

#[derive(Default, Clone)]
pub(super) struct MemoryAgencies {
    agencies: Arc<Mutex<HashMap<AgencyCode, Agency>>>,
    posts: Arc<Mutex<HashMap<JobPostId, JobPost>>>,
}

impl AgencyRepository for MemoryAgencies {
    fn insert_agency(&self, agency: Agency) -> Result<Agency, RepositoryError> {
        let mut guard = self.agencies.lock().expect("agency mutex poisoned");
        if guard.contains_key(&agency.code) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(agency.code.clone(), agency.clone());
        Ok(agency)
    }

    fn update_agency(&self, agency: Agency) -> Result<(), RepositoryError> {
        let mut guard = self.agencies.lock().expect("agency mutex poisoned");
        guard.insert(agency.code.clone(), agency);
        Ok(())
    }

    fn fetch_agency(&self, code: &AgencyCode) -> Result<Option<Agency>, RepositoryError> {
        let guard = self.agencies.lock().expect("agency mutex poisoned");
        Ok(guard.get(code).cloned())
    }

    fn insert_job_post(&self, post: JobPost) -> Result<JobPost, RepositoryError> {
        let mut guard = self.posts.lock().expect("job post mutex poisoned");
        if guard
            .values()
            .any(|existing| existing.agency_code == post.agency_code && existing.title == post.title)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(post.id, post.clone());
        Ok(post)
    }

    fn update_job_post(&self, post: JobPost) -> Result<(), RepositoryError> {
        let mut guard = self.posts.lock().expect("job post mutex poisoned");
        guard.insert(post.id, post);
        Ok(())
    }

    fn fetch_job_post(&self, id: JobPostId) -> Result<Option<JobPost>, RepositoryError> {
        let guard = self.posts.lock().expect("job post mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn job_posts_for(&self, code: &AgencyCode) -> Result<Vec<JobPost>, RepositoryError> {
        let guard = self.posts.lock().expect("job post mutex poisoned");
        Ok(guard
            .values()
            .filter(|post| &post.agency_code == code)
            .cloned()
            .collect())
    }
}

pub(super) struct OfflineAgencies;

impl AgencyRepository for OfflineAgencies {
    fn insert_agency(&self, _agency: Agency) -> Result<Agency, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_agency(&self, _agency: Agency) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_agency(&self, _code: &AgencyCode) -> Result<Option<Agency>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_job_post(&self, _post: JobPost) -> Result<JobPost, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_job_post(&self, _post: JobPost) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_job_post(&self, _id: JobPostId) -> Result<Option<JobPost>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn job_posts_for(&self, _code: &AgencyCode) -> Result<Vec<JobPost>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (AgencyService<MemoryAgencies>, Arc<MemoryAgencies>) {
    let repository = Arc::new(MemoryAgencies::default());
    (AgencyService::new(repository.clone()), repository)
}

pub(super) fn new_agency(name: &str) -> NewAgency {
    NewAgency {
        name: name.to_string(),
        code: None,
        description: "Public service recruitment".to_string(),
        instructions: "Read the notification before applying.".to_string(),
        default_form_schema: None,
        is_active: true,
    }
}

pub(super) fn job_schema() -> Value {
    json!({
        "fields": [
            { "name": "full_name", "label": "Full Name", "type": "text", "required": true },
            { "name": "email", "label": "Email Address", "type": "text", "required": true },
            {
                "name": "work_experience",
                "label": "Work Experience",
                "type": "array",
                "subfields": {
                    "from_date": { "type": "date", "label": "From Date" },
                    "to_date": { "type": "date", "label": "To Date" }
                }
            }
        ],
        "as_on_date": "2024-03-31"
    })
}

pub(super) fn new_job_post(code: &AgencyCode, title: &str) -> NewJobPost {
    NewJobPost {
        agency_code: code.clone(),
        title: title.to_string(),
        description: "Entry level clerical role".to_string(),
        form_schema: job_schema(),
        is_active: true,
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
