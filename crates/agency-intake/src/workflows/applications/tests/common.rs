use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::{json, Value};

use crate::workflows::agencies::{
    Agency, AgencyCode, AgencyRepository, AgencyService, JobPost, JobPostId, NewAgency, NewJobPost,
};
use crate::workflows::applications::domain::{ApplicationId, ApplicationSubmission, UploadedFile};
use crate::workflows::applications::repository::{ApplicationRecord, ApplicationRepository};
use crate::workflows::applications::service::ApplicationService;
use crate::workflows::forms::FormData;
use crate::workflows::repository::RepositoryError;

#[derive(Default)]
pub(super) struct MemoryStore {
    agencies: Mutex<HashMap<AgencyCode, Agency>>,
    posts: Mutex<HashMap<JobPostId, JobPost>>,
    applications: Mutex<HashMap<ApplicationId, ApplicationRecord>>,
}

impl AgencyRepository for MemoryStore {
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

impl ApplicationRepository for MemoryStore {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.applications.lock().expect("application mutex poisoned");
        if guard.contains_key(&record.application_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.application_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ApplicationRecord) -> Result<(), RepositoryError> {
        let mut guard = self.applications.lock().expect("application mutex poisoned");
        if !guard.contains_key(&record.application_id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(record.application_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.applications.lock().expect("application mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_job_post(&self, job_post_id: JobPostId) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let guard = self.applications.lock().expect("application mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.job_post_id == job_post_id)
            .cloned()
            .collect())
    }

    fn count_for_agency(&self, code: &AgencyCode) -> Result<usize, RepositoryError> {
        let guard = self.applications.lock().expect("application mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| &record.agency_code == code)
            .count())
    }
}

pub(super) struct Fixture {
    pub agencies: AgencyService<MemoryStore>,
    pub applications: Arc<ApplicationService<MemoryStore, MemoryStore>>,
    pub agency: Agency,
    pub post: JobPost,
}

pub(super) fn job_schema() -> Value {
    json!({
        "fields": [
            { "name": "date_of_birth", "label": "Date of Birth", "type": "date", "required": true },
            {
                "name": "work_experience",
                "label": "Work Experience",
                "type": "array",
                "subfields": {
                    "designation": { "type": "text", "label": "Designation" },
                    "from_date": { "type": "date", "label": "From Date" },
                    "to_date": { "type": "date", "label": "To Date" },
                    "certificate": { "type": "file", "label": "Experience Certificate" }
                }
            },
            {
                "name": "education_qualifications",
                "label": "Education Qualifications",
                "type": "array",
                "subfields": {
                    "course": { "type": "text", "label": "Course" },
                    "certificate": { "type": "file", "label": "Certificate" }
                }
            }
        ],
        "as_on_date": "2024-03-31"
    })
}

pub(super) fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::default());
    let agencies = AgencyService::new(store.clone());
    let agency = agencies
        .create_agency(NewAgency {
            name: "Acme Recruitment".to_string(),
            code: Some("acme".to_string()),
            description: String::new(),
            instructions: String::new(),
            default_form_schema: None,
            is_active: true,
        })
        .expect("agency created");
    let post = agencies
        .create_job_post(job_post_request(&agency.code, "Junior Assistant"))
        .expect("job post created");
    let applications = Arc::new(ApplicationService::new(store.clone(), store).with_list_limit(2));

    Fixture {
        agencies,
        applications,
        agency,
        post,
    }
}

pub(super) fn job_post_request(code: &AgencyCode, title: &str) -> NewJobPost {
    NewJobPost {
        agency_code: code.clone(),
        title: title.to_string(),
        description: String::new(),
        form_schema: job_schema(),
        is_active: true,
    }
}

pub(super) fn form_data() -> FormData {
    serde_json::from_value(json!({
        "date_of_birth": "1990-05-20",
        "work_experience": [
            {
                "designation": "Clerk",
                "from_date": "2020-01-01",
                "to_date": "2020-12-31",
                "certificate": "exp-1"
            }
        ],
        "education_qualifications": [
            { "course": "B.Com", "certificate": "edu-1" }
        ]
    }))
    .expect("form data decodes")
}

pub(super) fn uploads() -> Vec<UploadedFile> {
    vec![
        UploadedFile {
            key: "exp-1".to_string(),
            file_name: "experience.pdf".to_string(),
            storage_key: "applications/documents/experience.pdf".to_string(),
            size: 180_000,
        },
        UploadedFile {
            key: "edu-1".to_string(),
            file_name: "degree.jpg".to_string(),
            storage_key: "applications/documents/degree.jpg".to_string(),
            size: 950_000,
        },
    ]
}

pub(super) fn submission(post: &JobPost, full_name: &str) -> ApplicationSubmission {
    ApplicationSubmission {
        job_post_id: post.id,
        full_name: full_name.to_string(),
        email: "asha@example.com".to_string(),
        phone: "9876543210".to_string(),
        form_data: form_data(),
        uploads: Vec::new(),
        ip_address: None,
    }
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    serde_json::from_slice(&read_body(response).await).expect("json payload")
}
