use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicationId, ApplicationSubmission, NewDocument, StatusUpdate};
use super::repository::ApplicationRepository;
use super::service::{ApplicationService, ApplicationServiceError};
use crate::workflows::agencies::{AgencyRepository, JobPostId};
use crate::workflows::repository::RepositoryError;

/// Router exposing intake, review, and roster export endpoints.
pub fn application_router<J, R>(service: Arc<ApplicationService<J, R>>) -> Router
where
    J: AgencyRepository + 'static,
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route("/api/v1/applications", post(submit_handler::<J, R>))
        .route(
            "/api/v1/applications/:application_id",
            get(detail_handler::<J, R>),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            patch(status_handler::<J, R>),
        )
        .route(
            "/api/v1/applications/:application_id/documents",
            post(document_handler::<J, R>),
        )
        .route(
            "/api/v1/job-posts/:job_post_id/applications",
            get(list_handler::<J, R>),
        )
        .route(
            "/api/v1/job-posts/:job_post_id/applications/export",
            get(export_handler::<J, R>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListParams {
    limit: Option<usize>,
}

/// First hop of `X-Forwarded-For`, when present.
pub(crate) fn forwarded_client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
}

pub(crate) async fn submit_handler<J, R>(
    State(service): State<Arc<ApplicationService<J, R>>>,
    headers: HeaderMap,
    axum::Json(mut submission): axum::Json<ApplicationSubmission>,
) -> Response
where
    J: AgencyRepository + 'static,
    R: ApplicationRepository + 'static,
{
    if let Some(ip) = forwarded_client_ip(&headers) {
        submission.ip_address = Some(ip);
    }

    match service.submit(submission) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn detail_handler<J, R>(
    State(service): State<Arc<ApplicationService<J, R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    J: AgencyRepository + 'static,
    R: ApplicationRepository + 'static,
{
    let today = Utc::now().date_naive();
    match service.detail(&ApplicationId(application_id), today) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn status_handler<J, R>(
    State(service): State<Arc<ApplicationService<J, R>>>,
    Path(application_id): Path<String>,
    axum::Json(update): axum::Json<StatusUpdate>,
) -> Response
where
    J: AgencyRepository + 'static,
    R: ApplicationRepository + 'static,
{
    match service.update_status(&ApplicationId(application_id), update) {
        Ok(record) => (StatusCode::OK, axum::Json(record.summary())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn document_handler<J, R>(
    State(service): State<Arc<ApplicationService<J, R>>>,
    Path(application_id): Path<String>,
    axum::Json(document): axum::Json<NewDocument>,
) -> Response
where
    J: AgencyRepository + 'static,
    R: ApplicationRepository + 'static,
{
    match service.attach_document(&ApplicationId(application_id), document) {
        Ok(document) => (StatusCode::CREATED, axum::Json(document)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_handler<J, R>(
    State(service): State<Arc<ApplicationService<J, R>>>,
    Path(job_post_id): Path<u64>,
    Query(params): Query<ListParams>,
) -> Response
where
    J: AgencyRepository + 'static,
    R: ApplicationRepository + 'static,
{
    match service.list_for_job_post(JobPostId(job_post_id), params.limit) {
        Ok(summaries) => (StatusCode::OK, axum::Json(summaries)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn export_handler<J, R>(
    State(service): State<Arc<ApplicationService<J, R>>>,
    Path(job_post_id): Path<u64>,
) -> Response
where
    J: AgencyRepository + 'static,
    R: ApplicationRepository + 'static,
{
    let mut buffer = Vec::new();
    match service.export_roster(JobPostId(job_post_id), &mut buffer) {
        Ok(_) => {
            let disposition =
                format!("attachment; filename=\"job-post-{job_post_id}-applications.csv\"");
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, mime::TEXT_CSV_UTF_8.to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                buffer,
            )
                .into_response()
        }
        Err(err) => error_response(err),
    }
}

fn error_response(error: ApplicationServiceError) -> Response {
    let status = match &error {
        ApplicationServiceError::Mismatch(_)
        | ApplicationServiceError::Document(_)
        | ApplicationServiceError::UnknownJobPost(_)
        | ApplicationServiceError::ClosedJobPost(_)
        | ApplicationServiceError::MissingContact(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ApplicationServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ApplicationServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ApplicationServiceError::Repository(RepositoryError::Unavailable(_))
        | ApplicationServiceError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = match &error {
        ApplicationServiceError::Mismatch(mismatch) => json!({
            "error": error.to_string(),
            "missing": mismatch.missing,
            "extra": mismatch.extra,
        }),
        _ => json!({ "error": error.to_string() }),
    };
    (status, axum::Json(payload)).into_response()
}
