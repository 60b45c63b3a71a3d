use metrics::counter;
use metrics_exporter_prometheus::PrometheusHandle;
use sentinel_rx::diagnosis::{AnalysisSummary, DiagnosisEngine, DiagnosisReport};
use sentinel_rx::error::AppError;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) engine: DiagnosisEngine,
}

impl AppState {
    pub(crate) fn new(metrics: PrometheusHandle, engine: DiagnosisEngine) -> Self {
        Self {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(metrics),
            engine,
        }
    }
}

pub(crate) fn record_diagnosis(mode: &'static str, report: &DiagnosisReport) {
    counter!(
        "sentinel_rx_diagnoses_total",
        "mode" => mode,
        "health" => report.overall_health.label()
    )
    .increment(1);
}

pub(crate) fn record_failure(reason: &'static str) {
    counter!("sentinel_rx_diagnosis_failures_total", "reason" => reason).increment(1);
}

/// Reads a summary document from a file, or from stdin when the path is `-`.
pub(crate) fn read_input(path: &Path) -> Result<String, AppError> {
    let mut raw = String::new();
    if path == Path::new("-") {
        std::io::stdin().read_to_string(&mut raw)?;
    } else {
        raw = std::fs::read_to_string(path)?;
    }
    Ok(raw)
}

/// Accepts either the HTTP request envelope `{"analysisResult": {...}}` or a
/// bare summary object.
pub(crate) fn parse_summary_document(raw: &str) -> Result<AnalysisSummary, AppError> {
    let mut document: serde_json::Value = serde_json::from_str(raw)?;
    let summary = match document
        .as_object_mut()
        .and_then(|fields| fields.remove("analysisResult"))
    {
        Some(inner) => inner,
        None => document,
    };
    Ok(serde_json::from_value(summary)?)
}
