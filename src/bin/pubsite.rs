use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use pubsite::app::{self, FetchResult};
use pubsite::output::{JsonOutput, OutputMode};
use pubsite::scholar::ScholarHttpClient;
use pubsite::watchdog;

#[derive(Parser)]
#[command(name = "pubsite")]
#[command(about = "Generate _data files for a static academic site")]
#[command(version, author)]
struct Cli {
    /// Print machine-readable run summaries
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Convert a BibTeX file into the publications data file")]
    Convert {
        input: PathBuf,
        output: PathBuf,
    },
    #[command(about = "Refresh the citations data file from a Scholar profile")]
    Fetch {
        user: String,

        #[arg(long, default_value = "_data/citations.yml")]
        out: PathBuf,
    },
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match cli.command {
        Commands::Convert { input, output } => {
            let result = app::convert_bibliography(&input, &output).into_diagnostic()?;
            match mode {
                OutputMode::Json => JsonOutput::print_convert(&result).into_diagnostic()?,
                OutputMode::Human => {
                    println!("Wrote {} with {} entries.", result.output, result.records);
                }
            }
            Ok(())
        }
        Commands::Fetch { user, out } => {
            watchdog::arm(watchdog::HARD_TIMEOUT);
            let outcome = ScholarHttpClient::new()
                .and_then(|client| app::refresh_citations(&client, &user, &out));
            match outcome {
                Ok(result) => print_fetch(&result, mode).into_diagnostic(),
                Err(err) => {
                    // a failed refresh must not break the calling pipeline
                    eprintln!("WARNING: citation refresh failed: {err}");
                    Ok(())
                }
            }
        }
    }
}

fn print_fetch(result: &FetchResult, mode: OutputMode) -> std::io::Result<()> {
    match mode {
        OutputMode::Json => JsonOutput::print_fetch(result),
        OutputMode::Human => {
            match result.action.as_str() {
                "updated" => println!("Updated {} with {} years.", result.output, result.years),
                "kept-existing" => println!("Keeping existing {}.", result.output),
                _ => println!("{} missing; wrote empty list placeholder.", result.output),
            }
            Ok(())
        }
    }
}
