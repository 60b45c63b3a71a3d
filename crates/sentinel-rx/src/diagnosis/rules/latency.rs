use super::super::domain::AnalysisSummary;
use super::super::prescription::{Category, Effort, PrescriptionDraft, Severity};
use super::super::thresholds::RuleThresholds;

pub(super) fn p99_latency(
    summary: &AnalysisSummary,
    thresholds: &RuleThresholds,
) -> Vec<PrescriptionDraft> {
    let p99 = summary.latency.p99;

    let draft = if p99 <= thresholds.p99_excellent_ns {
        PrescriptionDraft::new(
            "Excellent P99 Latency",
            Severity::Success,
            Category::Health,
            Effort::Low,
        )
        .diagnosis(format!(
            "P99 latency of {p99:.0}ns is inside the {:.0}ns excellence band.",
            thresholds.p99_excellent_ns
        ))
        .prescription(
            "No action required. Pin the current build and configuration as a latency \
             baseline and gate future changes on it.",
        )
        .impact("Preserves deterministic tail behaviour under the current load profile.")
        .metrics(p99, thresholds.p99_excellent_ns, "ns")
    } else if p99 > thresholds.p99_critical_ns {
        PrescriptionDraft::new(
            "Critical P99 Latency",
            Severity::Critical,
            Category::Bottleneck,
            Effort::High,
        )
        .diagnosis(format!(
            "P99 latency of {p99:.0}ns exceeds the {:.0}ns critical threshold. One in a \
             hundred records waits more than {:.1}x the target.",
            thresholds.p99_critical_ns,
            p99 / thresholds.p99_target_ns
        ))
        .prescription(
            "1. Capture a stage attribution breakdown to locate the slow path.\n\
             2. Remove allocations and locks from the hot path.\n\
             3. Check for queueing behind a saturated downstream consumer.\n\
             4. Re-run the trace after each change to confirm the tail moves.",
        )
        .impact(format!(
            "Bringing P99 to {:.0}ns removes roughly {:.0}ns from worst-case order latency.",
            thresholds.p99_target_ns,
            p99 - thresholds.p99_target_ns
        ))
        .metrics(p99, thresholds.p99_target_ns, "ns")
        .code_hint("sentinel-rx diagnose --input summary.json --explain")
    } else if p99 > thresholds.p99_warning_ns {
        PrescriptionDraft::new(
            "Elevated P99 Latency",
            Severity::Warning,
            Category::Bottleneck,
            Effort::Medium,
        )
        .diagnosis(format!(
            "P99 latency of {p99:.0}ns is above the {:.0}ns warning threshold.",
            thresholds.p99_warning_ns
        ))
        .prescription(
            "1. Review the dominant stage in the attribution breakdown.\n\
             2. Look for cache misses and branch-heavy code on the critical path.\n\
             3. Prefer pre-allocated buffers over per-record allocation.",
        )
        .impact(format!(
            "Reaching the {:.0}ns target would cut tail latency by about {:.0}%.",
            thresholds.p99_target_ns,
            (p99 - thresholds.p99_target_ns) / p99 * 100.0
        ))
        .metrics(p99, thresholds.p99_target_ns, "ns")
    } else {
        return Vec::new();
    };

    vec![draft]
}

pub(super) fn tail_ratio(
    summary: &AnalysisSummary,
    thresholds: &RuleThresholds,
) -> Vec<PrescriptionDraft> {
    let Some(ratio) = summary.latency.tail_ratio() else {
        return Vec::new();
    };
    let latency = &summary.latency;

    if ratio > thresholds.tail_ratio_high {
        let spread = if ratio.is_finite() {
            format!("{ratio:.1}x")
        } else {
            "unbounded against".to_string()
        };
        vec![PrescriptionDraft::new(
            "High Tail Latency Variance",
            Severity::Warning,
            Category::Anomaly,
            Effort::Medium,
        )
        .diagnosis(format!(
            "P99 ({:.0}ns) is {spread} the median ({:.0}ns). Occasional records take a \
             much slower path than the common case.",
            latency.p99, latency.p50
        ))
        .prescription(
            "1. Correlate slow records with anomaly timestamps.\n\
             2. Check for periodic work (GC, timers, log flushes) on the hot thread.\n\
             3. Isolate the pipeline on dedicated cores to remove scheduler jitter.",
        )
        .impact(format!(
            "Tightening the ratio to {:.1}x makes latency predictable for risk checks.",
            thresholds.tail_ratio_consistent
        ))
        .metrics(ratio, thresholds.tail_ratio_consistent, "x")]
    } else if ratio <= thresholds.tail_ratio_consistent {
        vec![PrescriptionDraft::new(
            "Consistent Latency Distribution",
            Severity::Success,
            Category::Health,
            Effort::Low,
        )
        .diagnosis(format!(
            "P99/P50 ratio of {ratio:.2}x shows a tight latency distribution."
        ))
        .prescription("No action required. Keep monitoring the ratio for regressions.")
        .impact("Predictable latency simplifies capacity planning and risk limits.")
        .metrics(ratio, thresholds.tail_ratio_consistent, "x")]
    } else {
        Vec::new()
    }
}
