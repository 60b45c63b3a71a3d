use crate::infra::{parse_summary_document, read_input};
use crate::routes::DiagnosisResponse;
use clap::{Args, ValueEnum};
use sentinel_rx::config::{load_rule_thresholds, rules_file_from_env};
use sentinel_rx::diagnosis::{
    demo_summary, AnalysisSummary, DiagnosisEngine, DiagnosisReport, HealthAssessment,
    PipelineStage, Prescription,
};
use sentinel_rx::error::AppError;
use std::io::Write;
use std::path::PathBuf;

const CSV_HEADER: [&str; 9] = [
    "id",
    "severity",
    "category",
    "title",
    "effort",
    "affected_stage",
    "current",
    "target",
    "unit",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ReportArgs {
    /// Output format for the report
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
    /// Print the score adjustments behind the health score
    #[arg(long)]
    pub(crate) explain: bool,
    /// JSON rule table to use instead of APP_RULES_FILE or the defaults
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
}

impl ReportArgs {
    fn engine(&self) -> Result<DiagnosisEngine, AppError> {
        match self.rules.clone().or_else(rules_file_from_env) {
            Some(path) => Ok(DiagnosisEngine::new(load_rule_thresholds(&path)?)),
            None => Ok(DiagnosisEngine::default()),
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct DiagnoseArgs {
    /// Path to an analysis summary JSON document, or `-` for stdin
    #[arg(long, short)]
    pub(crate) input: PathBuf,
    #[command(flatten)]
    pub(crate) report: ReportArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    #[command(flatten)]
    pub(crate) report: ReportArgs,
}

pub(crate) fn run_diagnose(args: DiagnoseArgs) -> Result<(), AppError> {
    let raw = read_input(&args.input)?;
    let summary = parse_summary_document(&raw)?;
    emit(&summary, false, &args.report)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    emit(&demo_summary(), true, &args.report)
}

fn emit(summary: &AnalysisSummary, demo: bool, args: &ReportArgs) -> Result<(), AppError> {
    let (report, assessment) = args.engine()?.diagnose_with_assessment(summary)?;
    let assessment = args.explain.then_some(&assessment);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render(&report, assessment, demo, args.format, &mut out)
}

/// Writes the report in the requested format. CSV has no room for the score
/// breakdown, so `assessment` only affects text and JSON output.
pub(crate) fn render<W: Write>(
    report: &DiagnosisReport,
    assessment: Option<&HealthAssessment>,
    demo: bool,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), AppError> {
    match format {
        OutputFormat::Text => render_text(report, assessment, demo, out),
        OutputFormat::Json => render_json(report, assessment, demo, out),
        OutputFormat::Csv => render_csv(report, out),
    }
}

fn render_text<W: Write>(
    report: &DiagnosisReport,
    assessment: Option<&HealthAssessment>,
    demo: bool,
    out: &mut W,
) -> Result<(), AppError> {
    let source = if demo { " (demo trace)" } else { "" };
    writeln!(out, "Sentinel-RX diagnosis {}{}", report.id, source)?;
    writeln!(out, "Issued {}", report.timestamp.to_rfc3339())?;
    writeln!(
        out,
        "Health: {} ({}/100)",
        report.overall_health.label(),
        report.health_score
    )?;
    writeln!(out, "{}", report.summary)?;
    writeln!(
        out,
        "Issues: {} | critical {} | warnings {} | optimizations {}",
        report.counts.total_issues,
        report.counts.critical_count,
        report.counts.warning_count,
        report.counts.optimization_count
    )?;

    for prescription in &report.prescriptions {
        writeln!(out)?;
        render_prescription(prescription, out)?;
    }

    if let Some(assessment) = assessment {
        writeln!(out, "\nScore breakdown")?;
        writeln!(out, "  100 base")?;
        for adjustment in &assessment.adjustments {
            writeln!(out, "  {:+} {}", adjustment.delta, adjustment.reason)?;
        }
        writeln!(
            out,
            "  = {} raw, reported as {}/100",
            assessment.raw_score, assessment.health_score
        )?;
    }

    Ok(())
}

fn render_prescription<W: Write>(prescription: &Prescription, out: &mut W) -> Result<(), AppError> {
    writeln!(
        out,
        "[{}] {} {}",
        prescription.id,
        prescription.severity.label().to_uppercase(),
        prescription.title
    )?;

    let stage = prescription
        .affected_stage
        .map(|stage| format!(" | stage {stage}"))
        .unwrap_or_default();
    writeln!(
        out,
        "  category {} | effort {}{}",
        prescription.category.label(),
        prescription.effort.label(),
        stage
    )?;
    writeln!(out, "  Diagnosis: {}", prescription.diagnosis)?;
    if let Some(metrics) = &prescription.metrics {
        writeln!(
            out,
            "  Metric: {} {} -> target {} {}",
            metrics.current, metrics.unit, metrics.target, metrics.unit
        )?;
    }
    writeln!(out, "  Prescription:")?;
    for line in prescription.prescription.lines() {
        writeln!(out, "    {}", line.trim())?;
    }
    writeln!(out, "  Impact: {}", prescription.impact)?;
    if let Some(hint) = &prescription.code_hint {
        writeln!(out, "  Hint: {hint}")?;
    }
    Ok(())
}

fn render_json<W: Write>(
    report: &DiagnosisReport,
    assessment: Option<&HealthAssessment>,
    demo: bool,
    out: &mut W,
) -> Result<(), AppError> {
    let mut response = DiagnosisResponse::new(report.clone(), demo);
    response.score_breakdown = assessment.map(|assessment| assessment.adjustments.clone());

    serde_json::to_writer_pretty(&mut *out, &response)?;
    writeln!(out)?;
    Ok(())
}

fn render_csv<W: Write>(report: &DiagnosisReport, out: &mut W) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(CSV_HEADER)
        .map_err(std::io::Error::from)?;

    for prescription in &report.prescriptions {
        let (current, target, unit) = match &prescription.metrics {
            Some(metrics) => (
                metrics.current.to_string(),
                metrics.target.to_string(),
                metrics.unit.as_str(),
            ),
            None => (String::new(), String::new(), ""),
        };
        writer
            .write_record([
                prescription.id.as_str(),
                prescription.severity.label(),
                prescription.category.label(),
                prescription.title.as_str(),
                prescription.effort.label(),
                prescription
                    .affected_stage
                    .map(PipelineStage::as_str)
                    .unwrap_or(""),
                current.as_str(),
                target.as_str(),
                unit,
            ])
            .map_err(std::io::Error::from)?;
    }

    writer.flush()?;
    Ok(())
}
