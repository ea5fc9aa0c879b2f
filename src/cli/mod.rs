// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All work is delegated to Layer 2 (application); this layer
// only routes and prints.
//
// Four commands are supported:
//   1. `package`  : filter JSONL records into Parquet shards
//   2. `check`    : verdict for one text
//   3. `scan`     : contamination tally over JSONL files
//   4. `estimate` : training capacity from a stats.json

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{CheckArgs, Commands, EstimateArgs, PackageArgs, ScanArgs};

use crate::application::inspect_use_case::{estimate, InspectUseCase};
use crate::application::package_use_case::PackageUseCase;

/// The main CLI struct.
#[derive(Parser, Debug)]
#[command(
    name = "temporal-corpus",
    version,
    about = "Build cutoff-bounded pretraining corpora as Parquet shards."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Package(args)  => run_package(args),
            Commands::Check(args)    => run_check(args),
            Commands::Scan(args)     => run_scan(args),
            Commands::Estimate(args) => run_estimate(args),
        }
    }
}

fn run_package(args: PackageArgs) -> Result<()> {
    let use_case = PackageUseCase::new(args.into());
    let stats = use_case.execute()?;

    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<()> {
    let text = match (&args.text, &args.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?,
        (None, None) => anyhow::bail!("Pass --text or --file"),
    };

    let inspector = InspectUseCase::new(args.detector.into())?;
    let verdict = if args.gutenberg {
        inspector.check_gutenberg(&text)
    } else {
        inspector.check(&text)
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
        return Ok(());
    }

    println!("Cutoff:       {}", inspector.cutoff_year());
    println!("Contaminated: {}", verdict.is_contaminated);
    println!("Confidence:   {:.2}", verdict.confidence);
    for reason in verdict.reason_strings() {
        println!("  - {}", reason);
    }
    Ok(())
}

fn run_scan(args: ScanArgs) -> Result<()> {
    let inspector = InspectUseCase::new(args.detector.into())?;
    let outcome = match &args.clean_output {
        Some(path) => inspector.scan_to_file(&args.input, path)?,
        None => inspector.scan(&args.input)?,
    };

    if outcome.load.missing_files > 0 || outcome.load.malformed_lines > 0 {
        tracing::warn!(
            "Skipped {} missing files and {} malformed lines",
            outcome.load.missing_files,
            outcome.load.malformed_lines
        );
    }
    println!("{}", serde_json::to_string_pretty(&outcome.report)?);
    Ok(())
}

fn run_estimate(args: EstimateArgs) -> Result<()> {
    let (stats, est) = estimate(&args.stats)?;

    println!("Documents:        {}", stats.total_docs);
    println!("Characters:       {}", stats.total_chars);
    println!("Shards:           {}", stats.num_shards);
    println!("Avg chars/shard:  {}", stats.average_chars_per_shard());
    println!("Estimated tokens: {}", est.total_tokens);
    println!("Optimal params:   {}", est.optimal_params);
    match (est.recommended_depth, est.training_hours_8xh100) {
        (Some(depth), Some(hours)) => {
            println!("Recommended depth: d{}", depth);
            println!("Training time:     ~{:.1} h on 8xH100", hours);
        }
        _ => println!("Corpus is below the smallest model preset (d20)."),
    }
    Ok(())
}
