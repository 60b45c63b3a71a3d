use crate::infra::{record_diagnosis, record_failure, AppState};
use axum::extract::rejection::JsonRejection;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use sentinel_rx::diagnosis::{demo_summary, AnalysisSummary, DiagnosisReport, ScoreAdjustment};
use sentinel_rx::error::{AppError, GENERATION_FAILURE_MESSAGE};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DiagnosisRequest {
    #[serde(default)]
    pub(crate) analysis_result: Option<AnalysisSummary>,
}

/// Transport envelope shared by the HTTP API and the CLI's JSON output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DiagnosisResponse {
    pub(crate) success: bool,
    pub(crate) demo: bool,
    #[serde(flatten)]
    pub(crate) report: DiagnosisReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) score_breakdown: Option<Vec<ScoreAdjustment>>,
}

impl DiagnosisResponse {
    pub(crate) fn new(report: DiagnosisReport, demo: bool) -> Self {
        Self {
            success: true,
            demo,
            report,
            score_breakdown: None,
        }
    }
}

pub(crate) fn diagnosis_routes() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/diagnosis",
            get(demo_diagnosis_endpoint).post(diagnosis_endpoint),
        )
}

/// Shared state, request tracing, and the panic guard that turns handler
/// faults into the generic 500 body.
pub(crate) fn with_service_layers(router: Router, state: AppState) -> Router {
    router
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
}

fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("diagnosis handler panicked");
    record_failure("internal");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "error": GENERATION_FAILURE_MESSAGE })),
    )
        .into_response()
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn demo_diagnosis_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<DiagnosisResponse>, AppError> {
    let report = state.engine.diagnose(&demo_summary()).inspect_err(|_| {
        record_failure("demo");
    })?;
    record_diagnosis("demo", &report);

    Ok(Json(DiagnosisResponse::new(report, true)))
}

pub(crate) async fn diagnosis_endpoint(
    Extension(state): Extension<AppState>,
    payload: Result<Json<DiagnosisRequest>, JsonRejection>,
) -> Result<Json<DiagnosisResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        record_failure("malformed_body");
        AppError::InvalidRequest(rejection.body_text())
    })?;

    let summary = request.analysis_result.ok_or_else(|| {
        record_failure("missing_summary");
        AppError::InvalidRequest("analysisResult is required".to_string())
    })?;

    let report = state.engine.diagnose(&summary).inspect_err(|_| {
        record_failure("invalid_summary");
    })?;
    record_diagnosis("live", &report);

    Ok(Json(DiagnosisResponse::new(report, false)))
}
