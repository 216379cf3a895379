//! certsuite CLI
//!
//! Command-line interface for comparing a device against a reference build

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "certsuite")]
#[command(about = "certsuite - Device certification comparison", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare device artifacts against the reference build
    Compare(commands::compare::CompareArgs),
    /// Classify a subsuite run as pass, partial_fail or error
    Classify(commands::classify::ClassifyArgs),
    /// Summarize a result document
    Summary(commands::summary::SummaryArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compare(args) => commands::compare::execute(args),
        Commands::Classify(args) => commands::classify::execute(args),
        Commands::Summary(args) => commands::summary::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
