use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use content_schema_core::ValidationError;
use content_schema_corpus::{DEFAULT_CONFIG_NAME, Progress, RunReport, Runner};
use tracing_subscriber::EnvFilter;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum CliOutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "content-schema", version)]
#[command(about = "Validate the YAML metadata of a content repository against its schema")]
struct Cli {
    /// Root directory of the content repository.
    #[arg(env = "GITHUB_WORKSPACE", default_value = ".")]
    root: PathBuf,
    /// Name of the configuration file inside the root directory.
    #[arg(long, default_value = DEFAULT_CONFIG_NAME)]
    config_name: String,
    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: CliOutputFormat,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let runner = Runner::new(&cli.root).with_config_name(&cli.config_name);
    let result = match cli.format {
        CliOutputFormat::Text => {
            println!("🌶 Running content schema validation");
            runner.run_with_progress(print_progress)
        }
        CliOutputFormat::Json => runner.run(),
    };

    match (result, cli.format) {
        (Ok(report), CliOutputFormat::Text) => {
            print_summary(&report);
            ExitCode::SUCCESS
        }
        (Ok(report), CliOutputFormat::Json) => emit_json(&report, ExitCode::SUCCESS),
        (Err(err), CliOutputFormat::Text) => {
            eprintln!("❌ {err}");
            failure_code(&err)
        }
        (Err(err), CliOutputFormat::Json) => emit_json(&err, failure_code(&err)),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_progress(event: Progress<'_>) {
    match event {
        Progress::ConfigLoaded {
            config_path,
            collections,
        } => println!(
            "✅ Configuration validated: {} ({collections} collection(s))",
            config_path.display()
        ),
        Progress::PhasePassed { filepattern, phase } => println!("✅ {filepattern}: {phase}"),
    }
}

fn print_summary(report: &RunReport) {
    println!(
        "😇 All checks pass: {} collection(s), {} file(s), {} document(s)",
        report.collections.len(),
        report.total_files(),
        report.total_documents()
    );
}

fn failure_code(err: &ValidationError) -> ExitCode {
    let code = u8::try_from(err.kind.exit_code()).unwrap_or(1);
    ExitCode::from(code)
}

fn emit_json<T: serde::Serialize>(value: &T, code: ExitCode) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(raw) => {
            println!("{raw}");
            code
        }
        Err(err) => {
            eprintln!("error: failed to serialize output: {err}");
            ExitCode::FAILURE
        }
    }
}
