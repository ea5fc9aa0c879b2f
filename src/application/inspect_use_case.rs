// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Read-only workflows that look at text without packaging it:
//
//   check    → verdict for a single text
//   scan     → batch verdicts over JSONL files, plus a tally
//   estimate → model sizing from a finished run's stats.json
//
// `scan` scores raw record text: no length filter and no
// boilerplate stripping, so it shows what the detector alone
// would reject.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::data::{
    detector::{BatchReport, ContaminationDetector, DEFAULT_CONTEXT_WINDOW, DEFAULT_THRESHOLD},
    lexicon::{parse_cutoff, Lexicon},
    loader::JsonlLoader,
    normalizer::strip_boilerplate,
};
use crate::domain::error::ConfigError;
use crate::domain::stats::{RunStats, TrainingEstimate};
use crate::domain::traits::{DocumentSource, LoadReport};
use crate::domain::verdict::ContaminationVerdict;
use crate::infra::{jsonl_writer::write_jsonl, shard_writer::load_stats};

/// Which detector to build and how strict it is.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    pub cutoff:    String,
    pub threshold: f64,
    pub lexicon:   Option<PathBuf>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            cutoff:    "1913".to_string(),
            threshold: DEFAULT_THRESHOLD,
            lexicon:   None,
        }
    }
}

/// Result of scanning a set of files.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub report: BatchReport,
    pub load:   LoadReport,
    /// Texts that passed, in input order
    pub clean:  Vec<String>,
}

pub struct InspectUseCase {
    detector:    ContaminationDetector,
    cutoff_year: i32,
    threshold:   f64,
}

impl InspectUseCase {
    /// Validate the config and load the lexicon.
    pub fn new(config: DetectorConfig) -> Result<Self> {
        let cutoff_year = parse_cutoff(&config.cutoff)?;
        if !(0.0..=1.0).contains(&config.threshold) {
            return Err(ConfigError::ThresholdOutOfRange(config.threshold).into());
        }

        let lexicon = match &config.lexicon {
            Some(path) => Lexicon::from_json_file(path)?,
            None => Lexicon::builtin(),
        };

        let detector = ContaminationDetector::new(lexicon);
        tracing::debug!(
            "Lexicon {} with {} terms for cutoff {}",
            detector.lexicon().version,
            detector.lexicon().anachronistic_terms(cutoff_year).len(),
            cutoff_year
        );

        Ok(Self {
            detector,
            cutoff_year,
            threshold: config.threshold,
        })
    }

    pub fn cutoff_year(&self) -> i32 {
        self.cutoff_year
    }

    pub fn check(&self, text: &str) -> ContaminationVerdict {
        self.detector
            .check(text, self.cutoff_year, DEFAULT_CONTEXT_WINDOW, self.threshold)
    }

    /// Strip Project Gutenberg boilerplate, then check what remains.
    pub fn check_gutenberg(&self, text: &str) -> ContaminationVerdict {
        self.check(&strip_boilerplate(text))
    }

    /// Score every record in `inputs`.
    pub fn scan(&self, inputs: &[PathBuf]) -> Result<ScanOutcome> {
        let mut texts = Vec::new();
        let load = JsonlLoader::new(inputs.iter().cloned())
            .for_each_record(&mut |record| texts.push(record.text))?;

        tracing::info!(
            "Scanning {} records against cutoff {}",
            texts.len(),
            self.cutoff_year
        );
        let (clean, report) = self
            .detector
            .check_batch(texts, self.cutoff_year, self.threshold);

        Ok(ScanOutcome { report, load, clean })
    }

    /// Scan, then write the clean subset to `output` as JSONL.
    pub fn scan_to_file(&self, inputs: &[PathBuf], output: &Path) -> Result<ScanOutcome> {
        let outcome = self.scan(inputs)?;
        write_jsonl(output, &outcome.clean)?;
        Ok(outcome)
    }
}

/// Load a run's statistics and derive a training estimate from them.
pub fn estimate(stats_path: &Path) -> Result<(RunStats, TrainingEstimate)> {
    let stats = load_stats(stats_path)?;
    let estimate = TrainingEstimate::from_stats(&stats);
    Ok((stats, estimate))
}
