//! Summary command
//!
//! Usage: certsuite summary --results <FILE>

use super::read_result;
use certsuite_core::diff::summary::render_summary;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Result document from `certsuite compare`
    #[arg(short, long)]
    pub results: PathBuf,
}

/// Execute summary command
pub fn execute(args: SummaryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let result = read_result(&args.results)?;
    print!("{}", render_summary(&result));
    Ok(())
}
