//! Compare command
//!
//! Usage: certsuite compare --config <FILE> [--output <FILE>]

use certsuite_core::logging_facility;
use certsuite_core::{run_comparison, RunConfig};
use clap::Args;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Run configuration (TOML)
    #[arg(short, long)]
    pub config: PathBuf,

    /// Output file for the result document (default: stdout, with the run
    /// report on stderr)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute compare command
///
/// Differences never fail the command; only an unreadable configuration or
/// an unwritable output does.
pub fn execute(args: CompareArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = RunConfig::load(&args.config)?;
    logging_facility::init(config.logging_profile);

    let outcome = run_comparison(&config)?;
    let bytes = outcome.result.to_json_bytes()?;
    let digest = outcome.result.document_digest()?;

    // Without --output stdout carries only the document.
    let mut report: Box<dyn Write> = match &args.output {
        Some(output_path) => {
            std::fs::write(output_path, &bytes)?;
            println!("✓ Wrote {}", output_path.display());
            Box::new(io::stdout())
        }
        None => {
            io::stdout().write_all(&bytes)?;
            Box::new(io::stderr())
        }
    };

    writeln!(report, "run_id: {}", outcome.run_id)?;
    writeln!(report, "digest: {}", digest)?;
    writeln!(report, "sections: {}", outcome.result.len())?;
    for warning in &outcome.warnings {
        writeln!(report, "warning: {}", warning)?;
    }
    for err in &outcome.infrastructure_errors {
        writeln!(report, "infrastructure error: {}", err)?;
    }

    Ok(())
}
