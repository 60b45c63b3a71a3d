use super::common::*;
use crate::diagnosis::rules::RULES;
use crate::diagnosis::{
    demo_summary, evaluate_rules, AnomalySeverity, Category, Effort, PipelineStage, Severity,
};

#[test]
fn rules_run_in_documented_order() {
    let names: Vec<&str> = RULES.iter().map(|rule| rule.name).collect();
    assert_eq!(
        names,
        [
            "p99_latency",
            "tail_ratio",
            "attribution",
            "anomalies",
            "throughput",
            "budget"
        ]
    );
}

#[test]
fn reference_trace_yields_expected_findings() {
    let prescriptions = evaluate_rules(&demo_summary(), &thresholds());

    assert_eq!(
        titles(&prescriptions),
        [
            "Elevated P99 Latency",
            "Core Stage Bottleneck",
            "Latency Spikes Detected",
            "Backpressure Events Detected",
        ]
    );
    let ids: Vec<&str> = prescriptions.iter().map(|rx| rx.id.as_str()).collect();
    assert_eq!(ids, ["rx-1", "rx-2", "rx-3", "rx-4"]);

    let spike = find(&prescriptions, "Latency Spikes Detected");
    assert_eq!(spike.severity, Severity::Info);
    assert_eq!(spike.affected_stage, Some(PipelineStage::Core));
    assert_eq!(spike.metrics.as_ref().map(|m| m.current), Some(1.0));

    let backpressure = find(&prescriptions, "Backpressure Events Detected");
    assert_eq!(backpressure.severity, Severity::Info);
    assert_eq!(backpressure.affected_stage, Some(PipelineStage::Egress));
}

#[test]
fn tail_ratio_just_above_two_emits_nothing() {
    let summary = demo_summary();
    let ratio = summary.latency.tail_ratio().expect("median is positive");
    assert!(ratio > 2.0 && ratio < 2.01, "ratio was {ratio}");

    let prescriptions = evaluate_rules(&summary, &thresholds());
    assert!(prescriptions.iter().all(|rx| {
        rx.title != "High Tail Latency Variance" && rx.title != "Consistent Latency Distribution"
    }));
}

#[test]
fn p99_bands_are_mutually_exclusive() {
    let cases = [
        (100.0, Some("Excellent P99 Latency")),
        (100.5, None),
        (500.0, None),
        (500.5, Some("Elevated P99 Latency")),
        (1000.0, Some("Elevated P99 Latency")),
        (1000.5, Some("Critical P99 Latency")),
    ];

    for (p99, expected) in cases {
        let mut summary = quiet_summary();
        summary.latency = latency(p99 / 3.0, p99, 200_000.0);
        summary.budget = p99 * 1.1;
        let prescriptions = evaluate_rules(&summary, &thresholds());
        let p99_titles: Vec<&str> = titles(&prescriptions)
            .into_iter()
            .filter(|title| title.contains("P99"))
            .collect();

        match expected {
            Some(title) => assert_eq!(p99_titles, [title], "p99 {p99}"),
            None => assert!(p99_titles.is_empty(), "p99 {p99} gave {p99_titles:?}"),
        }
    }
}

#[test]
fn critical_p99_targets_two_hundred_nanoseconds() {
    let prescriptions = evaluate_rules(&severe_summary(), &thresholds());
    let critical = find(&prescriptions, "Critical P99 Latency");

    assert_eq!(critical.severity, Severity::Critical);
    assert_eq!(critical.category, Category::Bottleneck);
    let metrics = critical.metrics.as_ref().expect("metrics attached");
    assert_eq!(metrics.current, 1500.0);
    assert_eq!(metrics.target, 200.0);
    assert_eq!(metrics.unit, "ns");
}

#[test]
fn tail_ratio_boundaries() {
    let cases = [
        (2.0, Some("Consistent Latency Distribution")),
        (5.0, None),
        (5.5, Some("High Tail Latency Variance")),
    ];

    for (ratio, expected) in cases {
        let mut summary = quiet_summary();
        summary.latency.p50 = 60.0;
        summary.latency.p99 = 60.0 * ratio;
        summary.budget = 1000.0;
        let prescriptions = evaluate_rules(&summary, &thresholds());
        let found: Vec<&str> = titles(&prescriptions)
            .into_iter()
            .filter(|title| title.contains("Latency Distribution") || title.contains("Tail"))
            .collect();

        match expected {
            Some(title) => assert_eq!(found, [title], "ratio {ratio}"),
            None => assert!(found.is_empty(), "ratio {ratio} gave {found:?}"),
        }
    }
}

#[test]
fn high_tail_variance_is_an_anomaly_warning() {
    let mut summary = quiet_summary();
    summary.latency.p50 = 50.0;
    summary.latency.p99 = 400.0;
    let prescriptions = evaluate_rules(&summary, &thresholds());
    let variance = find(&prescriptions, "High Tail Latency Variance");

    assert_eq!(variance.severity, Severity::Warning);
    assert_eq!(variance.category, Category::Anomaly);
}

#[test]
fn zero_median_is_unbounded_tail_variance() {
    let mut summary = quiet_summary();
    summary.latency.p50 = 0.0;
    let prescriptions = evaluate_rules(&summary, &thresholds());
    assert_eq!(titles(&prescriptions), ["High Tail Latency Variance"]);
    assert!(prescriptions[0]
        .diagnosis
        .starts_with("P99 (300ns) is unbounded against the median (0ns)."));
}

#[test]
fn all_zero_percentiles_skip_tail_ratio() {
    let mut summary = quiet_summary();
    summary.latency.p50 = 0.0;
    summary.latency.p99 = 0.0;
    let prescriptions = evaluate_rules(&summary, &thresholds());
    assert!(prescriptions
        .iter()
        .all(|rx| !rx.title.contains("Tail") && !rx.title.contains("Latency Distribution")));
}

#[test]
fn each_stage_has_its_own_bottleneck_template() {
    let cases = [
        (attribution(45.0, 20.0, 20.0, 15.0), PipelineStage::Ingress, "Ingress Stage Bottleneck"),
        (attribution(9.0, 52.0, 31.0, 8.0), PipelineStage::Core, "Core Stage Bottleneck"),
        (attribution(10.0, 20.0, 60.0, 10.0), PipelineStage::Risk, "Risk Stage Bottleneck"),
        (attribution(10.0, 10.0, 10.0, 70.0), PipelineStage::Egress, "Egress Stage Bottleneck"),
    ];

    let mut seen_steps = Vec::new();
    for (shares, stage, title) in cases {
        let mut summary = quiet_summary();
        summary.attribution = Some(shares);
        let prescriptions = evaluate_rules(&summary, &thresholds());
        let bottleneck = find(&prescriptions, title);

        assert_eq!(bottleneck.severity, Severity::Warning);
        assert_eq!(bottleneck.category, Category::Bottleneck);
        assert_eq!(bottleneck.affected_stage, Some(stage));
        assert_eq!(bottleneck.metrics.as_ref().map(|m| m.target), Some(25.0));
        assert!(bottleneck.code_hint.is_some());
        seen_steps.push(bottleneck.prescription.clone());
    }

    seen_steps.sort();
    seen_steps.dedup();
    assert_eq!(seen_steps.len(), 4, "templates must differ per stage");
}

#[test]
fn bottleneck_impact_quotes_half_the_share() {
    let mut summary = quiet_summary();
    summary.attribution = Some(attribution(9.0, 52.0, 31.0, 8.0));
    let prescriptions = evaluate_rules(&summary, &thresholds());
    let bottleneck = find(&prescriptions, "Core Stage Bottleneck");

    assert!(bottleneck.impact.contains("26%"), "{}", bottleneck.impact);
    assert_eq!(bottleneck.effort, Effort::High);
}

#[test]
fn bottleneck_fires_at_exactly_forty_percent() {
    let mut summary = quiet_summary();
    summary.attribution = Some(attribution(40.0, 20.0, 20.0, 20.0));
    let prescriptions = evaluate_rules(&summary, &thresholds());

    assert_eq!(titles(&prescriptions), ["Ingress Stage Bottleneck"]);
}

#[test]
fn tied_maximum_prefers_earlier_stage() {
    let mut summary = quiet_summary();
    summary.attribution = Some(attribution(10.0, 45.0, 45.0, 0.0));
    let prescriptions = evaluate_rules(&summary, &thresholds());

    assert_eq!(titles(&prescriptions), ["Core Stage Bottleneck"]);
}

#[test]
fn balanced_pipeline_requires_small_spread_and_no_hotspot() {
    let mut summary = quiet_summary();
    summary.attribution = Some(attribution(30.0, 25.0, 25.0, 20.0));
    let balanced = evaluate_rules(&summary, &thresholds());
    assert_eq!(titles(&balanced), ["Well-Balanced Pipeline"]);
    assert_eq!(balanced[0].severity, Severity::Success);
    assert_eq!(balanced[0].category, Category::Health);

    summary.attribution = Some(attribution(39.0, 35.0, 16.0, 10.0));
    let uneven = evaluate_rules(&summary, &thresholds());
    assert!(uneven.is_empty(), "got {:?}", titles(&uneven));
}

#[test]
fn missing_attribution_skips_only_attribution_rule() {
    let mut summary = clean_summary();
    summary.attribution = None;
    let prescriptions = evaluate_rules(&summary, &thresholds());

    assert!(prescriptions
        .iter()
        .all(|rx| !rx.title.contains("Bottleneck") && rx.title != "Well-Balanced Pipeline"));
    assert_eq!(
        titles(&prescriptions),
        [
            "Excellent P99 Latency",
            "Consistent Latency Distribution",
            "No Anomalies Detected",
            "Excellent Throughput",
            "Latency Budget Met with Headroom",
        ]
    );
}

#[test]
fn empty_anomalies_yield_single_success_entry() {
    let prescriptions = evaluate_rules(&clean_summary(), &thresholds());
    let anomaly_entries: Vec<_> = prescriptions
        .iter()
        .filter(|rx| rx.title.contains("Anomal") || rx.category == Category::Anomaly)
        .collect();

    assert_eq!(anomaly_entries.len(), 1);
    assert_eq!(anomaly_entries[0].title, "No Anomalies Detected");
    assert_eq!(anomaly_entries[0].severity, Severity::Success);
}

#[test]
fn repeated_anomalies_escalate_to_warning() {
    let mut summary = quiet_summary();
    summary.anomalies = vec![
        anomaly("latency_spike", AnomalySeverity::Low, Some(PipelineStage::Risk)),
        anomaly("latency_spike", AnomalySeverity::Medium, Some(PipelineStage::Core)),
        anomaly("latency_spike", AnomalySeverity::Low, None),
        anomaly("backpressure", AnomalySeverity::Low, None),
        anomaly("backpressure", AnomalySeverity::Low, Some(PipelineStage::Egress)),
    ];
    let prescriptions = evaluate_rules(&summary, &thresholds());

    let spikes = find(&prescriptions, "Latency Spikes Detected");
    assert_eq!(spikes.severity, Severity::Warning);
    assert_eq!(spikes.affected_stage, Some(PipelineStage::Risk));
    assert!(spikes.diagnosis.starts_with("3 latency spikes"));

    let backpressure = find(&prescriptions, "Backpressure Events Detected");
    assert_eq!(backpressure.severity, Severity::Info);
    assert_eq!(backpressure.affected_stage, None);
}

#[test]
fn three_high_severity_anomalies_are_critical() {
    let prescriptions = evaluate_rules(&severe_summary(), &thresholds());
    let anomaly_titles: Vec<&str> = prescriptions
        .iter()
        .filter(|rx| rx.category == Category::Anomaly)
        .map(|rx| rx.title.as_str())
        .collect();

    assert_eq!(
        anomaly_titles,
        [
            "Multiple High-Severity Anomalies",
            "Latency Spikes Detected",
            "Backpressure Events Detected",
        ]
    );
    let multiple = find(&prescriptions, "Multiple High-Severity Anomalies");
    assert_eq!(multiple.severity, Severity::Critical);
    assert!(multiple.diagnosis.contains("queue_overflow"));
}

#[test]
fn unrecognised_anomalies_produce_no_findings() {
    let prescriptions = evaluate_rules(&quiet_summary(), &thresholds());
    assert!(prescriptions.is_empty(), "got {:?}", titles(&prescriptions));
}

#[test]
fn throughput_bands() {
    let cases = [
        (99_999.0, Some("Low Throughput")),
        (100_000.0, None),
        (299_999.0, None),
        (300_000.0, Some("Excellent Throughput")),
    ];

    for (throughput, expected) in cases {
        let mut summary = quiet_summary();
        summary.latency.throughput = throughput;
        let found = titles(&evaluate_rules(&summary, &thresholds()))
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        match expected {
            Some(title) => assert_eq!(found, [title], "throughput {throughput}"),
            None => assert!(found.is_empty(), "throughput {throughput} gave {found:?}"),
        }
    }
}

#[test]
fn low_throughput_is_an_optimization_warning() {
    let mut summary = quiet_summary();
    summary.latency.throughput = 50_000.0;
    let prescriptions = evaluate_rules(&summary, &thresholds());
    let low = find(&prescriptions, "Low Throughput");

    assert_eq!(low.severity, Severity::Warning);
    assert_eq!(low.category, Category::Optimization);
    assert_eq!(low.metrics.as_ref().map(|m| m.target), Some(200_000.0));
}

#[test]
fn exceeded_budget_reports_overage() {
    let mut summary = quiet_summary();
    summary.budget = 250.0;
    summary.budget_met = false;
    let prescriptions = evaluate_rules(&summary, &thresholds());
    let exceeded = find(&prescriptions, "Latency Budget Exceeded");

    assert_eq!(exceeded.severity, Severity::Critical);
    assert_eq!(exceeded.category, Category::Configuration);
    assert!(exceeded.diagnosis.contains("by 50ns"), "{}", exceeded.diagnosis);
    assert!(exceeded.diagnosis.contains("20.0% over"), "{}", exceeded.diagnosis);
}

#[test]
fn headroom_must_exceed_twenty_percent() {
    let mut summary = quiet_summary();
    summary.budget = 375.0;
    let at_threshold = evaluate_rules(&summary, &thresholds());
    assert!(at_threshold.is_empty(), "got {:?}", titles(&at_threshold));

    summary.budget = 400.0;
    let above = evaluate_rules(&summary, &thresholds());
    assert_eq!(titles(&above), ["Latency Budget Met with Headroom"]);
}
