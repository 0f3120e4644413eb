use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};

use super::domain::{AgencyCode, JobPostId, NewAgency, NewJobPost};
use super::repository::AgencyRepository;
use super::service::{AgencyService, AgencyServiceError};
use crate::workflows::repository::RepositoryError;

/// Router exposing agency/job post administration and the effective-schema read.
pub fn agency_router<R>(service: Arc<AgencyService<R>>) -> Router
where
    R: AgencyRepository + 'static,
{
    Router::new()
        .route("/api/v1/agencies", post(create_agency_handler::<R>))
        .route("/api/v1/agencies/:code", get(agency_handler::<R>))
        .route(
            "/api/v1/agencies/:code/job-posts",
            get(agency_job_posts_handler::<R>),
        )
        .route(
            "/api/v1/agencies/:code/default-form-schema",
            put(replace_default_schema_handler::<R>),
        )
        .route("/api/v1/job-posts", post(create_job_post_handler::<R>))
        .route("/api/v1/job-posts/:job_post_id", get(job_post_handler::<R>))
        .route(
            "/api/v1/job-posts/:job_post_id/form-schema",
            get(effective_schema_handler::<R>).put(replace_job_schema_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn create_agency_handler<R>(
    State(service): State<Arc<AgencyService<R>>>,
    axum::Json(request): axum::Json<NewAgency>,
) -> Response
where
    R: AgencyRepository + 'static,
{
    match service.create_agency(request) {
        Ok(agency) => (StatusCode::CREATED, axum::Json(agency)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn agency_handler<R>(
    State(service): State<Arc<AgencyService<R>>>,
    Path(code): Path<String>,
) -> Response
where
    R: AgencyRepository + 'static,
{
    match service.agency(&AgencyCode(code)) {
        Ok(agency) => (StatusCode::OK, axum::Json(agency)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn agency_job_posts_handler<R>(
    State(service): State<Arc<AgencyService<R>>>,
    Path(code): Path<String>,
) -> Response
where
    R: AgencyRepository + 'static,
{
    match service.active_job_posts(&AgencyCode(code)) {
        Ok(posts) => (StatusCode::OK, axum::Json(posts)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn replace_default_schema_handler<R>(
    State(service): State<Arc<AgencyService<R>>>,
    Path(code): Path<String>,
    axum::Json(schema): axum::Json<Value>,
) -> Response
where
    R: AgencyRepository + 'static,
{
    match service.replace_default_schema(&AgencyCode(code), schema) {
        Ok(agency) => (StatusCode::OK, axum::Json(agency)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_job_post_handler<R>(
    State(service): State<Arc<AgencyService<R>>>,
    axum::Json(request): axum::Json<NewJobPost>,
) -> Response
where
    R: AgencyRepository + 'static,
{
    match service.create_job_post(request) {
        Ok(post) => (StatusCode::CREATED, axum::Json(post)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn job_post_handler<R>(
    State(service): State<Arc<AgencyService<R>>>,
    Path(job_post_id): Path<u64>,
) -> Response
where
    R: AgencyRepository + 'static,
{
    match service.job_post(JobPostId(job_post_id)) {
        Ok(post) => (StatusCode::OK, axum::Json(post)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn effective_schema_handler<R>(
    State(service): State<Arc<AgencyService<R>>>,
    Path(job_post_id): Path<u64>,
) -> Response
where
    R: AgencyRepository + 'static,
{
    match service.effective_schema(JobPostId(job_post_id)) {
        Ok(schema) => (StatusCode::OK, axum::Json(schema)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn replace_job_schema_handler<R>(
    State(service): State<Arc<AgencyService<R>>>,
    Path(job_post_id): Path<u64>,
    axum::Json(schema): axum::Json<Value>,
) -> Response
where
    R: AgencyRepository + 'static,
{
    match service.replace_job_schema(JobPostId(job_post_id), schema) {
        Ok(post) => (StatusCode::OK, axum::Json(post)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(error: AgencyServiceError) -> Response {
    let status = match &error {
        AgencyServiceError::Schema(_)
        | AgencyServiceError::InvalidAgencyName(_)
        | AgencyServiceError::UnknownAgency(_)
        | AgencyServiceError::MissingTitle => StatusCode::UNPROCESSABLE_ENTITY,
        AgencyServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AgencyServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AgencyServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
