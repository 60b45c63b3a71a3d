use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::{diagnosis_routes, with_service_layers};
use axum_prometheus::PrometheusMetricLayer;
use sentinel_rx::config::AppConfig;
use sentinel_rx::diagnosis::DiagnosisEngine;
use sentinel_rx::error::AppError;
use sentinel_rx::telemetry;
use std::sync::atomic::Ordering;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(rules) = args.rules.take() {
        config.rules_file = Some(rules);
    }

    telemetry::init(&config.telemetry)?;

    let engine = DiagnosisEngine::new(config.rule_thresholds()?);
    if let Some(path) = &config.rules_file {
        info!(rules_file = %path.display(), "loaded custom rule table");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let app_state = AppState::new(prometheus_handle, engine);
    let readiness_flag = app_state.readiness.clone();

    let app = with_service_layers(diagnosis_routes(), app_state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        environment = config.environment.label(),
        %addr,
        "sentinel-rx diagnosis service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
