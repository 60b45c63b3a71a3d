use crate::diagnosis::{
    AnalysisSummary, Anomaly, AnomalyKind, AnomalySeverity, LatencyProfile, PipelineStage,
    Prescription, RuleThresholds, StageAttribution,
};

pub(crate) fn thresholds() -> RuleThresholds {
    RuleThresholds::default()
}

pub(crate) fn latency(p50: f64, p99: f64, throughput: f64) -> LatencyProfile {
    LatencyProfile {
        p50,
        p90: (p50 + p99) / 2.0,
        p99,
        p99_9: p99 * 1.1,
        min: p50 / 2.0,
        max: p99 * 1.5,
        mean: p50 * 1.05,
        std_dev: (p99 - p50).abs() / 3.0,
        throughput,
    }
}

/// Summary that trips no rule at all: mid-band p99, tail ratio 3.0, mid throughput,
/// small budget headroom, and a single anomaly of an unrecognised kind.
pub(crate) fn quiet_summary() -> AnalysisSummary {
    AnalysisSummary {
        latency: latency(100.0, 300.0, 200_000.0),
        attribution: None,
        anomalies: vec![anomaly("clock_drift", AnomalySeverity::Low, None)],
        budget: 350.0,
        budget_met: true,
        total_records: 50_000,
    }
}

pub(crate) fn clean_summary() -> AnalysisSummary {
    AnalysisSummary {
        latency: LatencyProfile {
            p50: 40.0,
            p90: 45.0,
            p99: 50.0,
            p99_9: 60.0,
            min: 20.0,
            max: 80.0,
            mean: 42.0,
            std_dev: 5.0,
            throughput: 350_000.0,
        },
        attribution: Some(attribution(25.0, 25.0, 25.0, 25.0)),
        anomalies: Vec::new(),
        budget: 850.0,
        budget_met: true,
        total_records: 2_000_000,
    }
}

pub(crate) fn severe_summary() -> AnalysisSummary {
    AnalysisSummary {
        latency: latency(300.0, 1500.0, 150_000.0),
        attribution: None,
        anomalies: vec![
            anomaly("latency_spike", AnomalySeverity::High, Some(PipelineStage::Risk)),
            anomaly("backpressure", AnomalySeverity::High, Some(PipelineStage::Egress)),
            anomaly("queue_overflow", AnomalySeverity::High, None),
        ],
        budget: 1000.0,
        budget_met: false,
        total_records: 750_000,
    }
}

pub(crate) fn attribution(ingress: f64, core: f64, risk: f64, egress: f64) -> StageAttribution {
    StageAttribution {
        ingress,
        core,
        risk,
        egress,
    }
}

pub(crate) fn anomaly(
    kind: &str,
    severity: AnomalySeverity,
    stage: Option<PipelineStage>,
) -> Anomaly {
    Anomaly {
        kind: AnomalyKind::from(kind.to_string()),
        severity,
        timestamp: None,
        description: format!("{kind} observed"),
        affected_stage: stage,
    }
}

pub(crate) fn titles(prescriptions: &[Prescription]) -> Vec<&str> {
    prescriptions
        .iter()
        .map(|prescription| prescription.title.as_str())
        .collect()
}

pub(crate) fn find<'a>(prescriptions: &'a [Prescription], title: &str) -> &'a Prescription {
    prescriptions
        .iter()
        .find(|prescription| prescription.title == title)
        .unwrap_or_else(|| panic!("expected '{title}' in {:?}", titles(prescriptions)))
}
