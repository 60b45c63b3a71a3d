use crate::render::{run_demo, run_diagnose, DemoArgs, DiagnoseArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use sentinel_rx::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sentinel-rx",
    about = "Diagnose pipeline latency summaries and serve prescriptions over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Diagnose an analysis summary read from a file or stdin
    Diagnose(DiagnoseArgs),
    /// Diagnose the built-in reference trace
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// JSON rule table to use instead of APP_RULES_FILE
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Diagnose(args) => run_diagnose(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::OutputFormat;
    use clap::CommandFactory;
    use std::path::Path;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["sentinel-rx"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn diagnose_accepts_format_explain_and_rules() {
        let cli = Cli::try_parse_from([
            "sentinel-rx",
            "diagnose",
            "--input",
            "-",
            "--format",
            "csv",
            "--explain",
            "--rules",
            "rules.json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Diagnose(args)) => {
                assert_eq!(args.input.to_str(), Some("-"));
                assert_eq!(args.report.format, OutputFormat::Csv);
                assert!(args.report.explain);
                assert_eq!(args.report.rules.as_deref(), Some(Path::new("rules.json")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn diagnose_requires_input() {
        assert!(Cli::try_parse_from(["sentinel-rx", "diagnose"]).is_err());
    }

    #[test]
    fn serve_accepts_rules_override() {
        let cli = Cli::try_parse_from(["sentinel-rx", "serve", "--rules", "/etc/rx/rules.json"])
            .expect("parses");

        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.rules.as_deref(), Some(Path::new("/etc/rx/rules.json")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
