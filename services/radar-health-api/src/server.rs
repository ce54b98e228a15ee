use crate::cli::ServeArgs;
use crate::infra::{build_service, AppState, ObservationSource};
use crate::routes::{cors_layer, with_index_routes};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use radar_health::config::AppConfig;
use radar_health::error::AppError;
use radar_health::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let source = ObservationSource::from_args(
        args.observations_csv.take(),
        &config.index,
        Utc::now().date_naive(),
    );
    let service = Arc::new(build_service(&source, config.index.baseline_years)?);

    let app = with_index_routes(service)
        .layer(Extension(app_state))
        .layer(cors_layer(&config.server.allowed_origins()))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "radar health index API ready");

    axum::serve(listener, app).await?;
    Ok(())
}
