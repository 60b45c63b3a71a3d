//! Performance diagnosis: rule evaluation, health scoring, and report assembly.
//!
//! Every call is a pure function of the [`AnalysisSummary`] it is given. Nothing
//! is cached or shared between calls beyond the immutable rule table.

mod demo;
pub mod domain;
pub mod prescription;
pub mod report;
mod rules;
pub mod score;
mod thresholds;

#[cfg(test)]
mod tests;

pub use demo::demo_summary;
pub use domain::{
    AnalysisSummary, Anomaly, AnomalyKind, AnomalySeverity, AnomalyTimestamp, LatencyProfile,
    PipelineStage, StageAttribution,
};
pub use prescription::{Category, Effort, Prescription, PrescriptionMetrics, Severity};
pub use report::{DiagnosisCounts, DiagnosisReport};
pub use rules::evaluate_rules;
pub use score::{assess_health, HealthAssessment, OverallHealth, ScoreAdjustment};
pub use thresholds::RuleThresholds;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagnosisError {
    #[error("invalid analysis summary: {field} {reason}")]
    InvalidSummary {
        field: &'static str,
        reason: &'static str,
    },
}

/// Timestamp-derived report id with a random suffix, e.g. `dx-1704067200123-1f2e3d4c`.
pub fn next_report_id(issued_at: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("dx-{}-{}", issued_at.timestamp_millis(), &suffix[..8])
}

/// Stateless engine applying a rule table to analysis summaries.
#[derive(Debug, Clone, Default)]
pub struct DiagnosisEngine {
    thresholds: RuleThresholds,
}

impl DiagnosisEngine {
    pub fn new(thresholds: RuleThresholds) -> Self {
        Self { thresholds }
    }

    pub fn diagnose(&self, summary: &AnalysisSummary) -> Result<DiagnosisReport, DiagnosisError> {
        let issued_at = Utc::now();
        self.diagnose_at(summary, next_report_id(issued_at), issued_at)
    }

    /// Same as [`diagnose`](Self::diagnose) with a caller-chosen id and timestamp.
    pub fn diagnose_at(
        &self,
        summary: &AnalysisSummary,
        report_id: impl Into<String>,
        issued_at: DateTime<Utc>,
    ) -> Result<DiagnosisReport, DiagnosisError> {
        self.evaluate(summary, report_id.into(), issued_at)
            .map(|(report, _)| report)
    }

    /// Report plus the score breakdown behind it, from a single rule pass.
    pub fn diagnose_with_assessment(
        &self,
        summary: &AnalysisSummary,
    ) -> Result<(DiagnosisReport, HealthAssessment), DiagnosisError> {
        let issued_at = Utc::now();
        self.evaluate(summary, next_report_id(issued_at), issued_at)
    }

    /// Score breakdown for a summary, without building a report.
    pub fn assess(&self, summary: &AnalysisSummary) -> Result<HealthAssessment, DiagnosisError> {
        summary.validate()?;
        let prescriptions = evaluate_rules(summary, &self.thresholds);
        Ok(assess_health(&prescriptions, summary, &self.thresholds))
    }

    fn evaluate(
        &self,
        summary: &AnalysisSummary,
        report_id: String,
        issued_at: DateTime<Utc>,
    ) -> Result<(DiagnosisReport, HealthAssessment), DiagnosisError> {
        summary.validate()?;

        let prescriptions = evaluate_rules(summary, &self.thresholds);
        let assessment = assess_health(&prescriptions, summary, &self.thresholds);
        let report =
            report::assemble_report(report_id, issued_at, prescriptions, summary, &assessment);

        info!(
            report_id = %report.id,
            health_score = report.health_score,
            overall_health = report.overall_health.label(),
            prescriptions = report.prescriptions.len(),
            "diagnosis generated"
        );

        Ok((report, assessment))
    }
}

/// Diagnose a live summary with the default rule table.
pub fn generate_diagnosis(summary: &AnalysisSummary) -> Result<DiagnosisReport, DiagnosisError> {
    DiagnosisEngine::default().diagnose(summary)
}

/// Diagnose the built-in demo summary.
pub fn generate_demo_diagnosis() -> Result<DiagnosisReport, DiagnosisError> {
    generate_diagnosis(&demo_summary())
}
