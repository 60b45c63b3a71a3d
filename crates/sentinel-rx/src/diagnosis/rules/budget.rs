use super::super::domain::AnalysisSummary;
use super::super::prescription::{Category, Effort, PrescriptionDraft, Severity};
use super::super::thresholds::RuleThresholds;

pub(super) fn latency_budget(
    summary: &AnalysisSummary,
    thresholds: &RuleThresholds,
) -> Vec<PrescriptionDraft> {
    let p99 = summary.latency.p99;
    let budget = summary.budget;

    if !summary.budget_met {
        let overage = summary.overage();
        let relative = summary
            .overage_pct()
            .map(|pct| format!(" ({pct:.1}% over)"))
            .unwrap_or_default();
        return vec![PrescriptionDraft::new(
            "Latency Budget Exceeded",
            Severity::Critical,
            Category::Configuration,
            Effort::High,
        )
        .diagnosis(format!(
            "P99 latency of {p99:.0}ns exceeds the {budget:.0}ns budget \
             by {overage:.0}ns{relative}."
        ))
        .prescription(
            "1. Address the critical and bottleneck findings in this report first.\n\
             2. Confirm the budget reflects current venue and strategy requirements.\n\
             3. Add a latency gate to CI so regressions are caught before release.",
        )
        .impact("Meeting the budget is required for the pipeline to stay within its SLA.")
        .metrics(p99, budget, "ns")];
    }

    let headroom = summary.headroom();
    if headroom > budget * thresholds.budget_headroom_fraction {
        let relative = summary
            .headroom_fraction()
            .map(|fraction| format!(" ({:.0}%)", fraction * 100.0))
            .unwrap_or_default();
        vec![PrescriptionDraft::new(
            "Latency Budget Met with Headroom",
            Severity::Success,
            Category::Health,
            Effort::Low,
        )
        .diagnosis(format!(
            "P99 latency of {p99:.0}ns leaves {headroom:.0}ns{relative} of the {budget:.0}ns \
             budget unused."
        ))
        .prescription("No action required. The headroom can absorb new features or load growth.")
        .impact("Room to add functionality without breaching the latency budget.")
        .metrics(p99, budget, "ns")]
    } else {
        Vec::new()
    }
}
