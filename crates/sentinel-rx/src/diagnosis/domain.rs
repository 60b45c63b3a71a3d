use serde::{Deserialize, Serialize};
use std::fmt;

use super::DiagnosisError;

/// Pipeline stages latency is attributed to, in tie-breaking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Ingress,
    Core,
    Risk,
    Egress,
}

impl PipelineStage {
    pub const fn ordered() -> [Self; 4] {
        [Self::Ingress, Self::Core, Self::Risk, Self::Egress]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ingress => "Ingress",
            Self::Core => "Core",
            Self::Risk => "Risk",
            Self::Egress => "Egress",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ingress => "ingress",
            Self::Core => "core",
            Self::Risk => "risk",
            Self::Egress => "egress",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pre-computed latency distribution. Latencies in nanoseconds, throughput in records/sec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencyProfile {
    pub p50: f64,
    pub p90: f64,
    pub p99: f64,
    #[serde(rename = "p99_9", alias = "p999")]
    pub p99_9: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub throughput: f64,
}

impl LatencyProfile {
    /// p99 / p50. A zero median gives an infinite ratio unless p99 is zero too,
    /// in which case the ratio is undefined.
    pub fn tail_ratio(&self) -> Option<f64> {
        let ratio = self.p99 / self.p50;
        (!ratio.is_nan()).then_some(ratio)
    }

    fn fields(&self) -> [(&'static str, f64); 9] {
        [
            ("latency.p50", self.p50),
            ("latency.p90", self.p90),
            ("latency.p99", self.p99),
            ("latency.p99_9", self.p99_9),
            ("latency.min", self.min),
            ("latency.max", self.max),
            ("latency.mean", self.mean),
            ("latency.stdDev", self.std_dev),
            ("latency.throughput", self.throughput),
        ]
    }
}

/// Percentage of end-to-end latency spent in each stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageAttribution {
    pub ingress: f64,
    pub core: f64,
    pub risk: f64,
    pub egress: f64,
}

impl StageAttribution {
    pub fn share(&self, stage: PipelineStage) -> f64 {
        match stage {
            PipelineStage::Ingress => self.ingress,
            PipelineStage::Core => self.core,
            PipelineStage::Risk => self.risk,
            PipelineStage::Egress => self.egress,
        }
    }

    /// Stage with the largest share; ties go to the earliest stage.
    pub fn dominant(&self) -> (PipelineStage, f64) {
        let mut best = (PipelineStage::Ingress, self.ingress);
        for stage in PipelineStage::ordered().into_iter().skip(1) {
            let share = self.share(stage);
            if share > best.1 {
                best = (stage, share);
            }
        }
        best
    }

    /// Difference between the largest and smallest share.
    pub fn spread(&self) -> f64 {
        let shares = PipelineStage::ordered().map(|stage| self.share(stage));
        let max = shares.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = shares.iter().copied().fold(f64::INFINITY, f64::min);
        max - min
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalySeverity {
    Low,
    Medium,
    High,
}

/// Anomaly classification reported by the upstream detector.
///
/// Unrecognised kinds are carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnomalyKind {
    LatencySpike,
    Backpressure,
    Other(String),
}

impl AnomalyKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::LatencySpike => "latency_spike",
            Self::Backpressure => "backpressure",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for AnomalyKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "latency_spike" => Self::LatencySpike,
            "backpressure" => Self::Backpressure,
            _ => Self::Other(value),
        }
    }
}

impl From<AnomalyKind> for String {
    fn from(value: AnomalyKind) -> Self {
        match value {
            AnomalyKind::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detector timestamps arrive either as epoch numbers or formatted strings.
///
/// Integer epochs are kept exact; nanosecond values exceed what an `f64` holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnomalyTimestamp {
    Epoch(u64),
    FractionalEpoch(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
    pub severity: AnomalySeverity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<AnomalyTimestamp>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_stage: Option<PipelineStage>,
}

/// Read-only input to the engine, produced by the upstream trace pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub latency: LatencyProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<StageAttribution>,
    #[serde(default)]
    pub anomalies: Vec<Anomaly>,
    /// Latency ceiling in nanoseconds.
    pub budget: f64,
    pub budget_met: bool,
    #[serde(default)]
    pub total_records: u64,
}

impl AnalysisSummary {
    /// `budget - p99`; negative when over budget.
    pub fn headroom(&self) -> f64 {
        self.budget - self.latency.p99
    }

    /// Headroom as a fraction of the budget; `None` for a non-positive budget.
    pub fn headroom_fraction(&self) -> Option<f64> {
        (self.budget > 0.0).then(|| self.headroom() / self.budget)
    }

    /// `p99 - budget`; negative when under budget.
    pub fn overage(&self) -> f64 {
        self.latency.p99 - self.budget
    }

    /// Overage as a percentage of the budget; `None` for a non-positive budget.
    pub fn overage_pct(&self) -> Option<f64> {
        (self.budget > 0.0).then(|| self.overage() / self.budget * 100.0)
    }

    /// Rejects non-finite numbers. Any finite value, including a negative
    /// latency or a zero budget, is diagnosed as given.
    pub fn validate(&self) -> Result<(), DiagnosisError> {
        for (field, value) in self.latency.fields() {
            if !value.is_finite() {
                return Err(DiagnosisError::InvalidSummary {
                    field,
                    reason: "must be a finite number",
                });
            }
        }

        if !self.budget.is_finite() {
            return Err(DiagnosisError::InvalidSummary {
                field: "budget",
                reason: "must be a finite number",
            });
        }

        if let Some(attribution) = &self.attribution {
            let non_finite = PipelineStage::ordered()
                .into_iter()
                .find(|stage| !attribution.share(*stage).is_finite());
            if non_finite.is_some() {
                return Err(DiagnosisError::InvalidSummary {
                    field: "attribution",
                    reason: "stage shares must be finite percentages",
                });
            }
        }

        Ok(())
    }
}
