use super::domain::{
    AnalysisSummary, Anomaly, AnomalyKind, AnomalySeverity, AnomalyTimestamp, LatencyProfile,
    PipelineStage, StageAttribution,
};

/// Reference trace served when no live summary is supplied: healthy overall,
/// with an elevated tail and a core-stage hotspot.
pub fn demo_summary() -> AnalysisSummary {
    AnalysisSummary {
        latency: LatencyProfile {
            p50: 423.0,
            p90: 712.0,
            p99: 847.0,
            p99_9: 923.0,
            min: 89.0,
            max: 1247.0,
            mean: 456.0,
            std_dev: 124.0,
            throughput: 284_535.0,
        },
        attribution: Some(StageAttribution {
            ingress: 9.0,
            core: 52.0,
            risk: 31.0,
            egress: 8.0,
        }),
        anomalies: vec![
            Anomaly {
                kind: AnomalyKind::LatencySpike,
                severity: AnomalySeverity::Medium,
                timestamp: Some(AnomalyTimestamp::Epoch(1_704_067_200_123)),
                description: "P99 spiked to 1247ns for 12 consecutive records".to_string(),
                affected_stage: Some(PipelineStage::Core),
            },
            Anomaly {
                kind: AnomalyKind::Backpressure,
                severity: AnomalySeverity::Low,
                timestamp: Some(AnomalyTimestamp::Epoch(1_704_067_200_456)),
                description: "Egress queue reached 80% occupancy".to_string(),
                affected_stage: Some(PipelineStage::Egress),
            },
        ],
        budget: 850.0,
        budget_met: true,
        total_records: 1_000_000,
    }
}
