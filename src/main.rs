//! wac CLI - render CI workflows and check them for drift

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use wac::error::{FixSuggestion, WacError, REGENERATE_HINT};
use wac::sync::{self, Mode};
use wac::{Report, WacConfig};

#[derive(Parser)]
#[command(name = "wac")]
#[command(about = "wac - CI workflows as code")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the rendered workflow files
    #[arg(short, long, global = true, env = "WAC_WORKFLOWS_DIR")]
    dir: Option<PathBuf>,

    /// Config file [default: wac.toml]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Only process these workflows (by slug)
    #[arg(short, long = "workflow", global = true)]
    workflows: Vec<String>,

    /// Report format
    #[arg(short, long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render all workflows and write them to their files
    Generate,

    /// Render all workflows and compare them with the committed files
    Check,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mode = match cli.command {
        Commands::Generate => Mode::Generate,
        Commands::Check => Mode::Check,
    };

    match run(&cli, mode) {
        Ok(report) => {
            if !report.is_success() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            print_error(&e);
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli, mode: Mode) -> Result<Report, WacError> {
    let config = match &cli.config {
        Some(path) => WacConfig::load(path, true)?,
        None => WacConfig::load(&PathBuf::from(wac::config::DEFAULT_CONFIG_FILE), false)?,
    };
    let layout = config.layout(cli.dir.clone());

    let registry = wac::workflows::registry()?;
    let selected = registry.select(&cli.workflows)?;

    let report = sync::run(mode, selected, &layout);

    match cli.format {
        Format::Json => println!("{}", report.to_json()?),
        Format::Text => print_report(&report),
    }
    Ok(report)
}

fn print_report(report: &Report) {
    for outcome in report.outcomes() {
        match (&outcome.error, report.mode()) {
            (None, Mode::Generate) => println!(
                "{} Workflow generated at {}",
                "✓".green(),
                outcome.path.display()
            ),
            (None, Mode::Check) => println!(
                "{} {} is in sync ({})",
                "✓".green(),
                outcome.workflow.bold(),
                outcome.path.display()
            ),
            (Some(e), _) => {
                eprintln!("{} {}", "✗".red(), outcome.workflow.bold());
                eprintln!("  {} {}", "Error:".red().bold(), e);
                if let Some(suggestion) = e.fix_suggestion() {
                    if !e.is_out_of_sync() {
                        eprintln!("  {} {}", "Fix:".yellow(), suggestion);
                    }
                }
            }
        }
    }

    let failed = report.failures().count();
    if failed == 0 {
        if report.mode() == Mode::Check {
            println!("{}", "Workflows are ok!".green());
        }
        return;
    }

    eprintln!(
        "{} {} of {} workflows failed to {}",
        "Error:".red().bold(),
        failed,
        report.outcomes().len(),
        report.mode().as_str()
    );
    if report.has_drift() {
        eprintln!("  {} {}", "Fix:".yellow(), REGENERATE_HINT);
    }
}

fn print_error(e: &WacError) {
    eprintln!("{} {}", "Error:".red().bold(), e);
    if let Some(suggestion) = e.fix_suggestion() {
        eprintln!("  {} {}", "Fix:".yellow(), suggestion);
    }
}
