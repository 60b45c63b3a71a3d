use super::super::domain::{AnalysisSummary, PipelineStage};
use super::super::prescription::{Category, Effort, PrescriptionDraft, Severity};
use super::super::thresholds::RuleThresholds;

struct StageRemediation {
    symptom: &'static str,
    steps: &'static str,
    effort: Effort,
    code_hint: &'static str,
}

fn remediation(stage: PipelineStage) -> StageRemediation {
    match stage {
        PipelineStage::Ingress => StageRemediation {
            symptom: "Message parsing and validation dominate the pipeline.",
            steps: "1. Profile the decoder and drop redundant validation passes.\n\
                    2. Parse fixed-layout fields with zero-copy reads.\n\
                    3. Move checksum and schema validation off the critical path where \
                    the protocol allows it.",
            effort: Effort::Medium,
            code_hint: "let header = Header::read_from_prefix(&frame)?; // zero-copy view",
        },
        PipelineStage::Core => StageRemediation {
            symptom: "Core processing logic dominates the pipeline.",
            steps: "1. Pipeline independent computations instead of running them serially.\n\
                    2. Cache derived values that are recomputed per record.\n\
                    3. Add fast paths for the most common message types.",
            effort: Effort::High,
            code_hint: "match msg.kind { Kind::Quote => fast_path(msg), _ => full_path(msg) }",
        },
        PipelineStage::Risk => StageRemediation {
            symptom: "Pre-trade risk checks dominate the pipeline.",
            steps: "1. Precompute position and limit lookups before the order arrives.\n\
                    2. Cache per-instrument risk parameters.\n\
                    3. Shard risk state by instrument so checks do not contend.",
            effort: Effort::Medium,
            code_hint: "let limits = limit_cache.get(&order.instrument); // precomputed",
        },
        PipelineStage::Egress => StageRemediation {
            symptom: "Output serialization and transmission dominate the pipeline.",
            steps: "1. Size output buffers to the largest message to avoid reallocation.\n\
                    2. Review the serializer for per-field allocations.\n\
                    3. Batch small writes where latency targets allow.",
            effort: Effort::Low,
            code_hint: "let mut buf = Vec::with_capacity(MAX_MESSAGE_LEN);",
        },
    }
}

pub(super) fn stage_attribution(
    summary: &AnalysisSummary,
    thresholds: &RuleThresholds,
) -> Vec<PrescriptionDraft> {
    let Some(attribution) = &summary.attribution else {
        return Vec::new();
    };

    let (stage, share) = attribution.dominant();
    let spread = attribution.spread();
    let mut drafts = Vec::new();

    if share >= thresholds.bottleneck_share_pct {
        let template = remediation(stage);
        drafts.push(
            PrescriptionDraft::new(
                format!("{} Stage Bottleneck", stage.label()),
                Severity::Warning,
                Category::Bottleneck,
                template.effort,
            )
            .diagnosis(format!(
                "The {stage} stage accounts for {share:.0}% of total latency. {}",
                template.symptom
            ))
            .prescription(template.steps)
            .impact(format!(
                "Halving {stage} stage latency would reduce total latency by roughly {:.0}%.",
                share / 2.0
            ))
            .stage(Some(stage))
            .metrics(share, thresholds.stage_target_pct, "%")
            .code_hint(template.code_hint),
        );
    }

    if spread < thresholds.balanced_spread_pct && share < thresholds.bottleneck_share_pct {
        drafts.push(
            PrescriptionDraft::new(
                "Well-Balanced Pipeline",
                Severity::Success,
                Category::Health,
                Effort::Low,
            )
            .diagnosis(format!(
                "No stage exceeds {share:.0}% of total latency and stage shares differ by \
                 only {spread:.0} points."
            ))
            .prescription(
                "No single stage to target. Further gains need improvements across all stages.",
            )
            .impact("Balanced stages keep latency stable when load shifts between them."),
        );
    }

    drafts
}
