use serde::{Deserialize, Serialize};

/// Rule table shared by the evaluators and the score aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleThresholds {
    /// p99 at or below this is excellent (ns).
    pub p99_excellent_ns: f64,
    /// p99 above this is elevated, and costs an extra score penalty (ns).
    pub p99_warning_ns: f64,
    /// p99 above this is critical (ns).
    pub p99_critical_ns: f64,
    pub p99_target_ns: f64,
    pub tail_ratio_consistent: f64,
    pub tail_ratio_high: f64,
    /// Minimum stage share, in percent, that counts as a bottleneck.
    pub bottleneck_share_pct: f64,
    pub balanced_spread_pct: f64,
    pub stage_target_pct: f64,
    pub high_severity_anomaly_count: usize,
    /// Occurrences of one anomaly kind that escalate it from info to warning.
    pub repeated_anomaly_count: usize,
    pub throughput_low: f64,
    pub throughput_target: f64,
    pub throughput_excellent: f64,
    /// Headroom, as a fraction of the budget, worth calling out.
    pub budget_headroom_fraction: f64,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            p99_excellent_ns: 100.0,
            p99_warning_ns: 500.0,
            p99_critical_ns: 1000.0,
            p99_target_ns: 200.0,
            tail_ratio_consistent: 2.0,
            tail_ratio_high: 5.0,
            bottleneck_share_pct: 40.0,
            balanced_spread_pct: 20.0,
            stage_target_pct: 25.0,
            high_severity_anomaly_count: 3,
            repeated_anomaly_count: 3,
            throughput_low: 100_000.0,
            throughput_target: 200_000.0,
            throughput_excellent: 300_000.0,
            budget_headroom_fraction: 0.20,
        }
    }
}
