use std::collections::BTreeMap;

use super::super::domain::{AnalysisSummary, Anomaly, AnomalyKind, AnomalySeverity};
use super::super::prescription::{Category, Effort, PrescriptionDraft, Severity};
use super::super::thresholds::RuleThresholds;
use super::plural;

/// Anomalies grouped by severity and by kind, preserving input order within a kind.
struct AnomalyTally<'a> {
    by_severity: BTreeMap<AnomalySeverity, usize>,
    by_kind: BTreeMap<&'a AnomalyKind, Vec<&'a Anomaly>>,
}

impl<'a> AnomalyTally<'a> {
    fn from_anomalies(anomalies: &'a [Anomaly]) -> Self {
        let mut by_severity = BTreeMap::new();
        let mut by_kind: BTreeMap<&AnomalyKind, Vec<&Anomaly>> = BTreeMap::new();
        for anomaly in anomalies {
            *by_severity.entry(anomaly.severity).or_insert(0) += 1;
            by_kind.entry(&anomaly.kind).or_default().push(anomaly);
        }
        Self {
            by_severity,
            by_kind,
        }
    }

    fn severity_count(&self, severity: AnomalySeverity) -> usize {
        self.by_severity.get(&severity).copied().unwrap_or(0)
    }

    fn of_kind(&self, kind: &AnomalyKind) -> &[&'a Anomaly] {
        self.by_kind.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    fn high_severity_kinds(&self) -> Vec<&str> {
        self.by_kind
            .iter()
            .filter(|(_, items)| {
                items
                    .iter()
                    .any(|anomaly| anomaly.severity == AnomalySeverity::High)
            })
            .map(|(kind, _)| kind.as_str())
            .collect()
    }
}

pub(super) fn anomalies(
    summary: &AnalysisSummary,
    thresholds: &RuleThresholds,
) -> Vec<PrescriptionDraft> {
    if summary.anomalies.is_empty() {
        return vec![PrescriptionDraft::new(
            "No Anomalies Detected",
            Severity::Success,
            Category::Health,
            Effort::Low,
        )
        .diagnosis(format!(
            "No latency spikes, backpressure or other anomalies across {} analysed records.",
            summary.total_records
        ))
        .prescription("No action required. Keep anomaly detection enabled on production traces.")
        .impact("Stable behaviour with no transient disruptions.")];
    }

    let tally = AnomalyTally::from_anomalies(&summary.anomalies);
    let mut drafts = Vec::new();

    let high = tally.severity_count(AnomalySeverity::High);
    if high >= thresholds.high_severity_anomaly_count {
        drafts.push(
            PrescriptionDraft::new(
                "Multiple High-Severity Anomalies",
                Severity::Critical,
                Category::Anomaly,
                Effort::High,
            )
            .diagnosis(format!(
                "{high} high-severity anomalies detected ({}); {} medium and {} low.",
                tally.high_severity_kinds().join(", "),
                tally.severity_count(AnomalySeverity::Medium),
                tally.severity_count(AnomalySeverity::Low)
            ))
            .prescription(
                "1. Triage anomalies in timestamp order and look for a shared trigger.\n\
                 2. Check recent deployments and configuration changes.\n\
                 3. Hold further rollouts until the anomaly rate drops.",
            )
            .impact("Resolving the shared root cause removes the largest source of instability.")
            .metrics(high as f64, 0.0, "anomalies"),
        );
    }

    let spikes = tally.of_kind(&AnomalyKind::LatencySpike);
    if let Some(first) = spikes.first() {
        let count = spikes.len();
        drafts.push(
            PrescriptionDraft::new(
                "Latency Spikes Detected",
                repeated_severity(count, thresholds),
                Category::Anomaly,
                Effort::Medium,
            )
            .diagnosis(format!(
                "{count} latency spike{} detected{}.",
                plural(count),
                stage_suffix(first)
            ))
            .prescription(
                "1. Line spike timestamps up against GC pauses, timers and network bursts.\n\
                 2. Check whether spikes follow bursts of inbound volume.\n\
                 3. Pre-warm caches and allocators ahead of expected bursts.",
            )
            .impact("Removing spikes tightens the tail without changing median latency.")
            .stage(first.affected_stage)
            .metrics(count as f64, 0.0, "events"),
        );
    }

    let backpressure = tally.of_kind(&AnomalyKind::Backpressure);
    if let Some(first) = backpressure.first() {
        let count = backpressure.len();
        drafts.push(
            PrescriptionDraft::new(
                "Backpressure Events Detected",
                repeated_severity(count, thresholds),
                Category::Anomaly,
                Effort::Medium,
            )
            .diagnosis(format!(
                "{count} backpressure event{} detected{}; a downstream consumer is not \
                 keeping up.",
                plural(count),
                stage_suffix(first)
            ))
            .prescription(
                "1. Increase queue depth between the producing and consuming stages.\n\
                 2. Check the consumer for blocking I/O.\n\
                 3. Add flow control so producers slow down before queues fill.",
            )
            .impact("Clearing backpressure prevents stalls from propagating upstream.")
            .stage(first.affected_stage)
            .metrics(count as f64, 0.0, "events"),
        );
    }

    drafts
}

fn repeated_severity(count: usize, thresholds: &RuleThresholds) -> Severity {
    if count >= thresholds.repeated_anomaly_count {
        Severity::Warning
    } else {
        Severity::Info
    }
}

fn stage_suffix(anomaly: &Anomaly) -> String {
    match anomaly.affected_stage {
        Some(stage) => format!(" in the {stage} stage"),
        None => String::new(),
    }
}
