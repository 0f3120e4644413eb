use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAgencyRepository, InMemoryApplicationRepository};
use crate::routes::with_intake_routes;
use agency_intake::config::AppConfig;
use agency_intake::error::AppError;
use agency_intake::telemetry;
use agency_intake::workflows::agencies::AgencyService;
use agency_intake::workflows::applications::ApplicationService;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let agency_repository = Arc::new(InMemoryAgencyRepository::default());
    let application_repository = Arc::new(InMemoryApplicationRepository::default());
    let agency_service = Arc::new(AgencyService::new(agency_repository.clone()));
    let application_service = Arc::new(
        ApplicationService::new(agency_repository, application_repository)
            .with_list_limit(config.intake.list_limit)
            .with_max_upload_bytes(config.intake.max_upload_bytes),
    );

    let app = with_intake_routes(agency_service, application_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        list_limit = config.intake.list_limit,
        max_upload_bytes = config.intake.max_upload_bytes,
        "agency intake service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
