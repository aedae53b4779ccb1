//! BoxKit command-line front end
//!
//! - `boxkit generate <snapshot> [--output <file>]` writes the generation
//!   report as JSON.
//! - `boxkit validate <snapshot>` prints overlap findings and failed panels
//!   and exits non-zero when there are any.

use anyhow::{Context, Result};
use boxkit::{generate, init_logging, AssemblySnapshot, GenerationReport};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "boxkit")]
#[command(about = "Finger-joint box panel generator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate panels and write the report as JSON
    Generate {
        /// Snapshot file (.json or .toml)
        snapshot: PathBuf,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a snapshot for failed panels and corner overlaps
    Validate {
        /// Snapshot file (.json or .toml)
        snapshot: PathBuf,
    },
}

fn run_generation(path: &Path) -> Result<GenerationReport> {
    let snapshot = AssemblySnapshot::load(path)
        .with_context(|| format!("failed to load snapshot {}", path.display()))?;
    let report = generate(&snapshot).context("generation failed")?;
    Ok(report)
}

fn main() -> Result<ExitCode> {
    init_logging()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { snapshot, output } => {
            let report = run_generation(&snapshot)?;
            let json = serde_json::to_string_pretty(&report)?;
            match output {
                Some(path) => std::fs::write(&path, json)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => println!("{}", json),
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate { snapshot } => {
            let report = run_generation(&snapshot)?;
            for failure in &report.failures {
                println!("FAILED  {}: {}", failure.panel, failure.error);
            }
            for finding in &report.findings {
                println!(
                    "{:<18} {} / {} towards {} (expected winner {})",
                    serde_json::to_string(&finding.rule)?.trim_matches('"'),
                    finding.panels[0],
                    finding.panels[1],
                    finding.toward,
                    finding.details.expected_winner
                );
            }
            if report.is_clean() {
                println!("OK  {} panels", report.panels.len());
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
