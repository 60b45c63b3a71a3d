use serde::{Deserialize, Serialize};

use super::domain::AnalysisSummary;
use super::prescription::{Category, Prescription, Severity};
use super::thresholds::RuleThresholds;

const BASE_SCORE: i32 = 100;
const CRITICAL_PENALTY: i32 = 25;
const WARNING_PENALTY: i32 = 10;
const INFO_PENALTY: i32 = 2;
const BUDGET_MISS_PENALTY: i32 = 15;
const ELEVATED_P99_PENALTY: i32 = 10;
const EXCELLENT_P99_BONUS: i32 = 5;
const QUIET_TRACE_BONUS: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallHealth {
    Healthy,
    Warning,
    Critical,
}

impl OverallHealth {
    pub const fn from_score(score: u8) -> Self {
        if score >= 80 {
            Self::Healthy
        } else if score >= 50 {
            Self::Warning
        } else {
            Self::Critical
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

/// Discrete contribution to the health score, allowing transparent audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreAdjustment {
    pub reason: String,
    pub delta: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthAssessment {
    pub health_score: u8,
    pub overall_health: OverallHealth,
    /// Score before clamping to 0..=100.
    pub raw_score: i32,
    pub adjustments: Vec<ScoreAdjustment>,
}

fn prescription_penalty(prescription: &Prescription) -> i32 {
    match prescription.severity {
        Severity::Critical => -CRITICAL_PENALTY,
        Severity::Warning => -WARNING_PENALTY,
        Severity::Info if prescription.category != Category::Health => -INFO_PENALTY,
        Severity::Info | Severity::Success => 0,
    }
}

/// Folds findings and raw metrics into a bounded score.
///
/// A p99 above the warning threshold is penalised here on top of whatever the
/// p99 rule's own finding already cost.
pub fn assess_health(
    prescriptions: &[Prescription],
    summary: &AnalysisSummary,
    thresholds: &RuleThresholds,
) -> HealthAssessment {
    let mut adjustments: Vec<ScoreAdjustment> = prescriptions
        .iter()
        .filter_map(|prescription| {
            let delta = prescription_penalty(prescription);
            (delta != 0).then(|| ScoreAdjustment {
                reason: format!(
                    "{} {} ({})",
                    prescription.id,
                    prescription.title,
                    prescription.severity.label()
                ),
                delta,
            })
        })
        .collect();

    let p99 = summary.latency.p99;
    if !summary.budget_met {
        adjustments.push(ScoreAdjustment {
            reason: "latency budget not met".to_string(),
            delta: -BUDGET_MISS_PENALTY,
        });
    }
    if p99 > thresholds.p99_warning_ns {
        adjustments.push(ScoreAdjustment {
            reason: format!("p99 above {:.0}ns", thresholds.p99_warning_ns),
            delta: -ELEVATED_P99_PENALTY,
        });
    }
    if p99 <= thresholds.p99_excellent_ns {
        adjustments.push(ScoreAdjustment {
            reason: format!("p99 at or below {:.0}ns", thresholds.p99_excellent_ns),
            delta: EXCELLENT_P99_BONUS,
        });
    }
    if summary.anomalies.is_empty() {
        adjustments.push(ScoreAdjustment {
            reason: "no anomalies detected".to_string(),
            delta: QUIET_TRACE_BONUS,
        });
    }

    let raw_score = BASE_SCORE + adjustments.iter().map(|adj| adj.delta).sum::<i32>();
    let health_score = raw_score.clamp(0, 100) as u8;

    HealthAssessment {
        health_score,
        overall_health: OverallHealth::from_score(health_score),
        raw_score,
        adjustments,
    }
}
