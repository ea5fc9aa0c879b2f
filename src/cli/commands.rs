// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the subcommands `package`, `check`, `scan` and
// `estimate` and all their configurable flags.
//
// Every packaging knob can also come from the environment
// (e.g. TEMPORAL_CUTOFF=1900), which is how the batch jobs set
// them. An explicit flag wins over the environment.

use clap::{ArgAction, Args, Subcommand};
use std::path::PathBuf;

use crate::application::inspect_use_case::DetectorConfig;
use crate::application::package_use_case::PackageConfig;

/// The top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filter JSONL records and pack them into Parquet shards
    Package(PackageArgs),

    /// Check one text for post-cutoff contamination
    Check(CheckArgs),

    /// Check every record in JSONL files and print a tally
    Scan(ScanArgs),

    /// Estimate model size and training time from a stats.json
    Estimate(EstimateArgs),
}

/// Cutoff and detector flags shared by every detecting command.
#[derive(Args, Debug, Clone)]
pub struct DetectorArgs {
    /// Knowledge cutoff: one of 1850, 1900, 1913, 1950
    #[arg(long, env = "TEMPORAL_CUTOFF")]
    pub cutoff: String,

    /// Confidence at or above which a text counts as contaminated
    #[arg(long, env = "TEMPORAL_CONTAMINATION_THRESHOLD", default_value_t = 0.3)]
    pub contamination_threshold: f64,

    /// JSON lexicon to use instead of the built-in table
    #[arg(long, env = "TEMPORAL_LEXICON")]
    pub lexicon: Option<PathBuf>,
}

impl From<DetectorArgs> for DetectorConfig {
    fn from(a: DetectorArgs) -> Self {
        DetectorConfig {
            cutoff:    a.cutoff,
            threshold: a.contamination_threshold,
            lexicon:   a.lexicon,
        }
    }
}

/// All arguments for the `package` command.
#[derive(Args, Debug)]
pub struct PackageArgs {
    /// JSONL files to read, in order
    #[arg(long, required = true, num_args = 1..)]
    pub input: Vec<PathBuf>,

    /// Directory for shard_NNNNN.parquet files and stats.json
    #[arg(long, env = "TEMPORAL_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub detector: DetectorArgs,

    /// Minimum characters per shard before it may be sealed
    #[arg(long, env = "TEMPORAL_CHARS_PER_SHARD", default_value_t = 250_000_000)]
    pub chars_per_shard: usize,

    /// Documents per Parquet row group
    #[arg(long, env = "TEMPORAL_ROW_GROUP_SIZE", default_value_t = 1024)]
    pub row_group_size: usize,

    /// Seed for the document shuffle
    #[arg(long, env = "TEMPORAL_SHUFFLE_SEED", default_value_t = 42)]
    pub shuffle_seed: u64,

    /// Stop after this many shards
    #[arg(long, env = "TEMPORAL_MAX_SHARDS")]
    pub max_shards: Option<usize>,

    /// Strip Project Gutenberg headers and footers
    #[arg(long, env = "TEMPORAL_CLEAN_HEADERS", default_value_t = true, action = ArgAction::Set)]
    pub clean_headers: bool,

    /// Reject documents that reference post-cutoff knowledge
    #[arg(long, env = "TEMPORAL_CHECK_CONTAMINATION", default_value_t = true, action = ArgAction::Set)]
    pub check_contamination: bool,

    /// Skip records shorter than this many characters
    #[arg(long, env = "TEMPORAL_MIN_CHARS", default_value_t = 100)]
    pub min_chars: usize,

    /// Drop exact duplicate texts before shuffling
    #[arg(long, env = "TEMPORAL_DEDUP", default_value_t = true, action = ArgAction::Set)]
    pub dedup: bool,
}

/// Convert CLI PackageArgs into the application-layer PackageConfig.
/// The application layer never sees clap types.
impl From<PackageArgs> for PackageConfig {
    fn from(a: PackageArgs) -> Self {
        PackageConfig {
            inputs:                  a.input,
            output_dir:              a.output_dir,
            cutoff:                  a.detector.cutoff,
            chars_per_shard:         a.chars_per_shard,
            row_group_size:          a.row_group_size,
            shuffle_seed:            a.shuffle_seed,
            max_shards:              a.max_shards,
            clean_headers:           a.clean_headers,
            check_contamination:     a.check_contamination,
            contamination_threshold: a.detector.contamination_threshold,
            min_chars:               a.min_chars,
            dedup:                   a.dedup,
            lexicon:                 a.detector.lexicon,
        }
    }
}

/// All arguments for the `check` command
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub detector: DetectorArgs,

    /// Text to check
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub text: Option<String>,

    /// File whose whole contents are checked as one text
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Strip Project Gutenberg headers and footers before checking
    #[arg(long)]
    pub gutenberg: bool,

    /// Print the verdict as JSON
    #[arg(long)]
    pub json: bool,
}

/// All arguments for the `scan` command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// JSONL files to scan
    #[arg(long, required = true, num_args = 1..)]
    pub input: Vec<PathBuf>,

    #[command(flatten)]
    pub detector: DetectorArgs,

    /// Write the texts that passed to this JSONL file
    #[arg(long)]
    pub clean_output: Option<PathBuf>,
}

/// All arguments for the `estimate` command
#[derive(Args, Debug)]
pub struct EstimateArgs {
    /// stats.json written by a `package` run
    #[arg(long, default_value = "data/shards/stats.json")]
    pub stats: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn parse(args: &[&str]) -> Commands {
        Cli::try_parse_from(args).unwrap().command
    }

    #[test]
    fn package_defaults() {
        let cmd = parse(&[
            "temporal-corpus", "package",
            "--input", "a.jsonl", "b.jsonl",
            "--output-dir", "out",
            "--cutoff", "1913",
        ]);
        let Commands::Package(args) = cmd else {
            panic!("expected package");
        };
        let cfg = PackageConfig::from(args);
        assert_eq!(cfg.inputs, vec![PathBuf::from("a.jsonl"), PathBuf::from("b.jsonl")]);
        assert_eq!(
            cfg,
            PackageConfig {
                inputs: cfg.inputs.clone(),
                output_dir: PathBuf::from("out"),
                ..PackageConfig::default()
            }
        );
    }

    #[test]
    fn package_flags_override_defaults() {
        let cmd = parse(&[
            "temporal-corpus", "package",
            "--input", "a.jsonl",
            "--output-dir", "out",
            "--cutoff", "1850",
            "--chars-per-shard", "5000",
            "--row-group-size", "16",
            "--max-shards", "3",
            "--dedup", "false",
            "--clean-headers", "false",
        ]);
        let Commands::Package(args) = cmd else {
            panic!("expected package");
        };
        let cfg = PackageConfig::from(args);
        assert_eq!(cfg.cutoff, "1850");
        assert_eq!(cfg.chars_per_shard, 5000);
        assert_eq!(cfg.row_group_size, 16);
        assert_eq!(cfg.max_shards, Some(3));
        assert!(!cfg.dedup);
        assert!(!cfg.clean_headers);
        assert!(cfg.check_contamination);
    }

    #[test]
    fn check_needs_text_or_file() {
        assert!(Cli::try_parse_from(["temporal-corpus", "check", "--cutoff", "1913"]).is_err());
        assert!(Cli::try_parse_from([
            "temporal-corpus", "check", "--cutoff", "1913",
            "--text", "x", "--file", "y",
        ])
        .is_err());

        let Commands::Check(args) = parse(&["temporal-corpus", "check", "--cutoff", "1900", "--text", "hello"]) else {
            panic!("expected check");
        };
        assert_eq!(args.text.as_deref(), Some("hello"));
        assert_eq!(DetectorConfig::from(args.detector).cutoff, "1900");
    }

    #[test]
    fn package_requires_input() {
        assert!(Cli::try_parse_from([
            "temporal-corpus", "package", "--output-dir", "out", "--cutoff", "1913",
        ])
        .is_err());
    }
}
