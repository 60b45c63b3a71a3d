use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::AnalysisSummary;
use super::prescription::{Prescription, Severity};
use super::score::{HealthAssessment, OverallHealth};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisCounts {
    pub total_issues: usize,
    pub critical_count: usize,
    pub warning_count: usize,
    pub optimization_count: usize,
}

impl DiagnosisCounts {
    pub fn from_prescriptions(prescriptions: &[Prescription]) -> Self {
        prescriptions
            .iter()
            .fold(Self::default(), |mut counts, prescription| {
                if prescription.is_issue() {
                    counts.total_issues += 1;
                }
                match prescription.severity {
                    Severity::Critical => counts.critical_count += 1,
                    Severity::Warning => counts.warning_count += 1,
                    Severity::Info | Severity::Success => {}
                }
                if prescription.is_optimization() {
                    counts.optimization_count += 1;
                }
                counts
            })
    }
}

/// Fully derived diagnosis output; rebuilt from scratch for every summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisReport {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub overall_health: OverallHealth,
    pub health_score: u8,
    pub summary: String,
    pub prescriptions: Vec<Prescription>,
    pub counts: DiagnosisCounts,
}

pub(crate) fn assemble_report(
    id: String,
    issued_at: DateTime<Utc>,
    prescriptions: Vec<Prescription>,
    summary: &AnalysisSummary,
    assessment: &HealthAssessment,
) -> DiagnosisReport {
    let counts = DiagnosisCounts::from_prescriptions(&prescriptions);
    let text = summarize(&prescriptions, summary, assessment.health_score);

    DiagnosisReport {
        id,
        timestamp: issued_at,
        overall_health: assessment.overall_health,
        health_score: assessment.health_score,
        summary: text,
        prescriptions,
        counts,
    }
}

fn count_severity(prescriptions: &[Prescription], severity: Severity) -> usize {
    prescriptions
        .iter()
        .filter(|prescription| prescription.severity == severity)
        .count()
}

fn counted(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

fn summarize(
    prescriptions: &[Prescription],
    summary: &AnalysisSummary,
    health_score: u8,
) -> String {
    let p99 = summary.latency.p99;
    let critical = count_severity(prescriptions, Severity::Critical);
    let warnings = count_severity(prescriptions, Severity::Warning);
    let successes = count_severity(prescriptions, Severity::Success);

    if critical > 0 {
        format!(
            "Found {} requiring immediate attention. Current P99 latency is {p99:.0}ns.",
            counted(critical, "critical issue", "critical issues")
        )
    } else if warnings > 0 {
        let budget_state = if summary.budget_met {
            "is being met"
        } else {
            "is being exceeded"
        };
        format!(
            "Found {} to address. The latency budget {budget_state}.",
            counted(warnings, "warning", "warnings")
        )
    } else if successes > 0 {
        format!(
            "System is performing well with {}. P99 latency is {p99:.0}ns with a health score \
             of {health_score}/100.",
            counted(successes, "healthy indicator", "healthy indicators")
        )
    } else {
        format!(
            "Analysis complete. P99 latency is {p99:.0}ns at {:.0} records/sec.",
            summary.latency.throughput
        )
    }
}

impl DiagnosisReport {
    pub fn prescriptions_with_severity(
        &self,
        severity: Severity,
    ) -> impl Iterator<Item = &Prescription> {
        self.prescriptions
            .iter()
            .filter(move |prescription| prescription.severity == severity)
    }
}
