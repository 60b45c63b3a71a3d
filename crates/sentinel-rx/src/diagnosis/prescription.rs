use serde::{Deserialize, Serialize};

use super::domain::PipelineStage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
    Success,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Success => "success",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Bottleneck,
    Anomaly,
    Optimization,
    Configuration,
    Health,
}

impl Category {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bottleneck => "bottleneck",
            Self::Anomaly => "anomaly",
            Self::Optimization => "optimization",
            Self::Configuration => "configuration",
            Self::Health => "health",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

impl Effort {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Where a metric sits today and where the remediation should take it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionMetrics {
    pub current: f64,
    pub target: f64,
    pub unit: String,
}

/// One actionable finding in a diagnosis report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub id: String,
    pub title: String,
    pub severity: Severity,
    pub category: Category,
    pub diagnosis: String,
    pub prescription: String,
    pub impact: String,
    pub effort: Effort,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_stage: Option<PipelineStage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<PrescriptionMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_hint: Option<String>,
}

impl Prescription {
    pub fn is_issue(&self) -> bool {
        self.severity != Severity::Success
    }

    /// Optimisation opportunities include every informational finding.
    pub fn is_optimization(&self) -> bool {
        self.category == Category::Optimization || self.severity == Severity::Info
    }
}

/// A rule's finding before the report assigns it an id.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PrescriptionDraft {
    title: String,
    severity: Severity,
    category: Category,
    effort: Effort,
    diagnosis: String,
    prescription: String,
    impact: String,
    affected_stage: Option<PipelineStage>,
    metrics: Option<PrescriptionMetrics>,
    code_hint: Option<String>,
}

impl PrescriptionDraft {
    pub(crate) fn new(
        title: impl Into<String>,
        severity: Severity,
        category: Category,
        effort: Effort,
    ) -> Self {
        Self {
            title: title.into(),
            severity,
            category,
            effort,
            diagnosis: String::new(),
            prescription: String::new(),
            impact: String::new(),
            affected_stage: None,
            metrics: None,
            code_hint: None,
        }
    }

    pub(crate) fn diagnosis(mut self, text: impl Into<String>) -> Self {
        self.diagnosis = text.into();
        self
    }

    pub(crate) fn prescription(mut self, text: impl Into<String>) -> Self {
        self.prescription = text.into();
        self
    }

    pub(crate) fn impact(mut self, text: impl Into<String>) -> Self {
        self.impact = text.into();
        self
    }

    pub(crate) fn stage(mut self, stage: Option<PipelineStage>) -> Self {
        self.affected_stage = stage;
        self
    }

    pub(crate) fn metrics(mut self, current: f64, target: f64, unit: &str) -> Self {
        self.metrics = Some(PrescriptionMetrics {
            current,
            target,
            unit: unit.to_string(),
        });
        self
    }

    pub(crate) fn code_hint(mut self, hint: impl Into<String>) -> Self {
        self.code_hint = Some(hint.into());
        self
    }

    pub(crate) fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn into_prescription(self, id: String) -> Prescription {
        Prescription {
            id,
            title: self.title,
            severity: self.severity,
            category: self.category,
            diagnosis: self.diagnosis,
            prescription: self.prescription,
            impact: self.impact,
            effort: self.effort,
            affected_stage: self.affected_stage,
            metrics: self.metrics,
            code_hint: self.code_hint,
        }
    }
}
