use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryMetricsRepository};
use crate::routes::with_metrics_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use sitesafe::config::AppConfig;
use sitesafe::error::AppError;
use sitesafe::scoring::{MetricsService, ParameterCatalog};
use sitesafe::telemetry;
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

    let repository = Arc::new(InMemoryMetricsRepository::default());
    let metrics_service = Arc::new(MetricsService::new(
        repository,
        ParameterCatalog::standard(),
    ));

    let app = with_metrics_routes(metrics_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "safety KPI service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
