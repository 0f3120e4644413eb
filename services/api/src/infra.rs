use agency_intake::workflows::agencies::{Agency, AgencyCode, AgencyRepository, JobPost, JobPostId};
use agency_intake::workflows::applications::{
    ApplicationId, ApplicationRecord, ApplicationRepository,
};
use agency_intake::workflows::repository::RepositoryError;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAgencyRepository {
    agencies: Arc<Mutex<HashMap<AgencyCode, Agency>>>,
    job_posts: Arc<Mutex<HashMap<JobPostId, JobPost>>>,
}

impl AgencyRepository for InMemoryAgencyRepository {
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
        if guard.contains_key(&agency.code) {
            guard.insert(agency.code.clone(), agency);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_agency(&self, code: &AgencyCode) -> Result<Option<Agency>, RepositoryError> {
        let guard = self.agencies.lock().expect("agency mutex poisoned");
        Ok(guard.get(code).cloned())
    }

    fn insert_job_post(&self, post: JobPost) -> Result<JobPost, RepositoryError> {
        let mut guard = self.job_posts.lock().expect("job post mutex poisoned");
        let duplicate_title = guard
            .values()
            .any(|existing| existing.agency_code == post.agency_code && existing.title == post.title);
        if duplicate_title || guard.contains_key(&post.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(post.id, post.clone());
        Ok(post)
    }

    fn update_job_post(&self, post: JobPost) -> Result<(), RepositoryError> {
        let mut guard = self.job_posts.lock().expect("job post mutex poisoned");
        if guard.contains_key(&post.id) {
            guard.insert(post.id, post);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_job_post(&self, id: JobPostId) -> Result<Option<JobPost>, RepositoryError> {
        let guard = self.job_posts.lock().expect("job post mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn job_posts_for(&self, code: &AgencyCode) -> Result<Vec<JobPost>, RepositoryError> {
        let guard = self.job_posts.lock().expect("job post mutex poisoned");
        Ok(guard
            .values()
            .filter(|post| &post.agency_code == code)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    records: Arc<Mutex<HashMap<ApplicationId, ApplicationRecord>>>,
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.application_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.application_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ApplicationRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.application_id) {
            guard.insert(record.application_id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_job_post(&self, job_post_id: JobPostId) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.job_post_id == job_post_id)
            .cloned()
            .collect())
    }

    fn count_for_agency(&self, code: &AgencyCode) -> Result<usize, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| &record.agency_code == code)
            .count())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
