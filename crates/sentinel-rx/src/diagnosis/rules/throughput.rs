use super::super::domain::AnalysisSummary;
use super::super::prescription::{Category, Effort, PrescriptionDraft, Severity};
use super::super::thresholds::RuleThresholds;

pub(super) fn throughput(
    summary: &AnalysisSummary,
    thresholds: &RuleThresholds,
) -> Vec<PrescriptionDraft> {
    let throughput = summary.latency.throughput;

    if throughput < thresholds.throughput_low {
        vec![PrescriptionDraft::new(
            "Low Throughput",
            Severity::Warning,
            Category::Optimization,
            Effort::Medium,
        )
        .diagnosis(format!(
            "Throughput of {throughput:.0} records/sec is below the {:.0} records/sec floor.",
            thresholds.throughput_low
        ))
        .prescription(
            "1. Batch records through the pipeline instead of handling them one at a time.\n\
             2. Check for a single-threaded stage limiting the whole pipeline.\n\
             3. Reduce per-record syscalls on ingress and egress.",
        )
        .impact(format!(
            "Reaching {:.0} records/sec gives {:.1}x the current capacity.",
            thresholds.throughput_target,
            thresholds.throughput_target / throughput.max(1.0)
        ))
        .metrics(throughput, thresholds.throughput_target, "records/sec")]
    } else if throughput >= thresholds.throughput_excellent {
        vec![PrescriptionDraft::new(
            "Excellent Throughput",
            Severity::Success,
            Category::Health,
            Effort::Low,
        )
        .diagnosis(format!(
            "Throughput of {throughput:.0} records/sec exceeds the {:.0} records/sec mark.",
            thresholds.throughput_excellent
        ))
        .prescription("No action required. Capacity is sufficient for current load.")
        .impact("Ample headroom to absorb bursts without queueing.")]
    } else {
        Vec::new()
    }
}
