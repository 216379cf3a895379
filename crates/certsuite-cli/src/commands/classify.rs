//! Classify command
//!
//! Usage: certsuite classify --log <FILE> [--results <FILE>] [--name <NAME>]

use super::read_result;
use certsuite_core::{classify, SubsuiteResults};
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Structured test log of the subsuite
    #[arg(short, long)]
    pub log: PathBuf,

    /// Result document from `certsuite compare`
    #[arg(short, long)]
    pub results: Option<PathBuf>,

    /// Subsuite name
    #[arg(short, long, default_value = "subsuite")]
    pub name: String,
}

/// Execute classify command
pub fn execute(args: ClassifyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(&args.log)?;
    let results = SubsuiteResults::from_structured_log(&args.name, &text);

    let aggregated = match &args.results {
        Some(path) => Some(read_result(path)?),
        None => None,
    };

    let category = classify(&results, aggregated.as_ref());
    println!("{}: {} ({})", results.name, category, category.indicator());
    println!(
        "tests: {} failed: {} errored: {}",
        results.tests.len(),
        results.failed_count(),
        results.errored_count()
    );
    for message in &results.infrastructure_errors {
        println!("infrastructure error: {}", message);
    }

    Ok(())
}
