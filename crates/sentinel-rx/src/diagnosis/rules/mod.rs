//! The six rule families, evaluated in a fixed order so prescription ids are stable.

mod anomalies;
mod attribution;
mod budget;
mod latency;
mod throughput;

use super::domain::AnalysisSummary;
use super::prescription::{Prescription, PrescriptionDraft};
use super::thresholds::RuleThresholds;
use tracing::debug;

type RuleFn = fn(&AnalysisSummary, &RuleThresholds) -> Vec<PrescriptionDraft>;

/// A named evaluator over one dimension of the summary.
#[derive(Clone, Copy)]
pub(crate) struct Rule {
    pub(crate) name: &'static str,
    evaluate: RuleFn,
}

pub(crate) const RULES: [Rule; 6] = [
    Rule {
        name: "p99_latency",
        evaluate: latency::p99_latency,
    },
    Rule {
        name: "tail_ratio",
        evaluate: latency::tail_ratio,
    },
    Rule {
        name: "attribution",
        evaluate: attribution::stage_attribution,
    },
    Rule {
        name: "anomalies",
        evaluate: anomalies::anomalies,
    },
    Rule {
        name: "throughput",
        evaluate: throughput::throughput,
    },
    Rule {
        name: "budget",
        evaluate: budget::latency_budget,
    },
];

/// Runs every rule in order and numbers the findings `rx-1`, `rx-2`, ...
pub fn evaluate_rules(summary: &AnalysisSummary, thresholds: &RuleThresholds) -> Vec<Prescription> {
    RULES
        .iter()
        .flat_map(|rule| {
            let drafts = (rule.evaluate)(summary, thresholds);
            debug!(
                rule = rule.name,
                findings = drafts.len(),
                titles = ?drafts.iter().map(PrescriptionDraft::title).collect::<Vec<_>>(),
                "rule evaluated"
            );
            drafts
        })
        .enumerate()
        .map(|(index, draft)| draft.into_prescription(format!("rx-{}", index + 1)))
        .collect()
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
