// ============================================================
// Layer 2 — PackageUseCase
// ============================================================
// Orchestrates a full corpus build in order:
//
//   Step 1: Validate the configuration     (before any I/O)
//   Step 2: Load the lexicon               (Layer 4 - data)
//   Step 3: Prepare the output directory   (Layer 6 - infra)
//   Step 4: Stream + filter records        (Layer 4 - data)
//   Step 5: Drop exact duplicates          (Layer 4 - data)
//   Step 6: Shuffle and pack into shards   (Layer 4 - data)
//   Step 7: Write final statistics         (Layer 6 - infra)
//
// Per-record problems (missing files, malformed lines, short or
// contaminated texts, duplicates) are counted and skipped.
// Anything that would leave the output incomplete aborts the run.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{
    dedup::dedup_exact,
    detector::{ContaminationDetector, DEFAULT_THRESHOLD},
    filter::{CorpusFilter, FilterOutcome, FilterSettings},
    lexicon::{parse_cutoff, Lexicon},
    loader::JsonlLoader,
    packer::{PackerSettings, ShardPacker},
};
use crate::domain::error::ConfigError;
use crate::domain::stats::RunStats;
use crate::domain::traits::{DocumentSource, ShardSink};
use crate::infra::shard_writer::ParquetShardWriter;

/// Log a progress line every this many records.
const PROGRESS_EVERY: usize = 10_000;

// ─── Package Configuration ───────────────────────────────────────────────────
// Everything a packaging run needs. Serialisable so a run's exact
// settings can be logged or stored next to its output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageConfig {
    pub inputs:                  Vec<PathBuf>,
    pub output_dir:              PathBuf,
    /// Cutoff identifier, e.g. "1913"
    pub cutoff:                  String,
    pub chars_per_shard:         usize,
    pub row_group_size:          usize,
    pub shuffle_seed:            u64,
    pub max_shards:              Option<usize>,
    pub clean_headers:           bool,
    pub check_contamination:     bool,
    pub contamination_threshold: f64,
    pub min_chars:               usize,
    pub dedup:                   bool,
    /// Replacement lexicon in JSON form (built-in table when None)
    pub lexicon:                 Option<PathBuf>,
}

impl Default for PackageConfig {
    fn default() -> Self {
        let packer = PackerSettings::default();
        Self {
            inputs:                  Vec::new(),
            output_dir:              PathBuf::from("data/shards"),
            cutoff:                  "1913".to_string(),
            chars_per_shard:         packer.chars_per_shard,
            row_group_size:          packer.row_group_size,
            shuffle_seed:            packer.shuffle_seed,
            max_shards:              packer.max_shards,
            clean_headers:           true,
            check_contamination:     true,
            contamination_threshold: DEFAULT_THRESHOLD,
            min_chars:               100,
            dedup:                   true,
            lexicon:                 None,
        }
    }
}

impl PackageConfig {
    /// Check every knob and resolve the cutoff identifier to a year.
    pub fn validate(&self) -> Result<i32, ConfigError> {
        let cutoff_year = parse_cutoff(&self.cutoff)?;
        self.packer_settings().validate()?;
        if !(0.0..=1.0).contains(&self.contamination_threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.contamination_threshold));
        }
        Ok(cutoff_year)
    }

    pub fn packer_settings(&self) -> PackerSettings {
        PackerSettings {
            chars_per_shard: self.chars_per_shard,
            row_group_size:  self.row_group_size,
            shuffle_seed:    self.shuffle_seed,
            max_shards:      self.max_shards,
        }
    }

    pub fn filter_settings(&self, cutoff_year: i32) -> FilterSettings {
        FilterSettings {
            min_chars:           self.min_chars,
            clean_headers:       self.clean_headers,
            check_contamination: self.check_contamination,
            threshold:           self.contamination_threshold,
            ..FilterSettings::for_cutoff(cutoff_year)
        }
    }
}

// ─── PackageUseCase ──────────────────────────────────────────────────────────
pub struct PackageUseCase {
    config: PackageConfig,
}

impl PackageUseCase {
    pub fn new(config: PackageConfig) -> Self {
        Self { config }
    }

    /// Build the corpus from the configured JSONL files into Parquet shards.
    pub fn execute(&self) -> Result<RunStats> {
        let cfg = &self.config;

        // ── Step 1: Validate ─────────────────────────────────────────────────
        let cutoff_year = cfg.validate()?;

        // ── Step 2: Lexicon ──────────────────────────────────────────────────
        let lexicon = match &cfg.lexicon {
            Some(path) => Lexicon::from_json_file(path)?,
            None => Lexicon::builtin(),
        };

        // ── Step 3: Output directory ─────────────────────────────────────────
        let mut sink = ParquetShardWriter::create(&cfg.output_dir)?;

        let source = JsonlLoader::new(cfg.inputs.iter().cloned());
        let stats = self.run(cutoff_year, lexicon, &source, &mut sink)?;

        tracing::info!(
            "Done: {} documents, {} chars in {} shards under '{}'",
            stats.total_docs,
            stats.total_chars,
            stats.num_shards,
            cfg.output_dir.display()
        );
        Ok(stats)
    }

    /// Steps 4 to 7 against any source and sink.
    pub fn run(
        &self,
        cutoff_year: i32,
        lexicon: Lexicon,
        source: &dyn DocumentSource,
        sink: &mut dyn ShardSink,
    ) -> Result<RunStats> {
        let cfg = &self.config;
        tracing::info!(
            "Packaging with cutoff {} ({} anachronistic terms, lexicon {})",
            cutoff_year,
            lexicon.anachronistic_terms(cutoff_year).len(),
            lexicon.version
        );

        let filter = CorpusFilter::new(
            cfg.filter_settings(cutoff_year),
            ContaminationDetector::new(lexicon),
        );

        // ── Step 4: Stream + filter ──────────────────────────────────────────
        let mut stats = RunStats::new();
        let mut accepted: Vec<String> = Vec::new();

        let report = source.for_each_record(&mut |record| {
            stats.records_seen += 1;
            match filter.admit(record) {
                FilterOutcome::Accepted(text) => accepted.push(text),
                FilterOutcome::TooShort => stats.rejected_too_short += 1,
                FilterOutcome::Contaminated(verdict) => {
                    tracing::debug!(
                        "Rejected record {} (confidence {:.2}): {}",
                        stats.records_seen,
                        verdict.confidence,
                        verdict.reason_strings().join("; ")
                    );
                    stats.record_contaminated(verdict.reasons.iter().map(|r| r.label()));
                }
            }
            if stats.records_seen % PROGRESS_EVERY == 0 {
                tracing::info!(
                    "Read {} records, {} accepted",
                    stats.records_seen,
                    accepted.len()
                );
            }
        })?;

        stats.missing_files = report.missing_files;
        stats.rejected_malformed = report.malformed_lines;

        tracing::info!(
            "Accepted {} of {} records ({} too short, {} contaminated, {} malformed)",
            accepted.len(),
            stats.records_seen,
            stats.rejected_too_short,
            stats.rejected_contamination,
            stats.rejected_malformed
        );

        // ── Step 5: Dedup ────────────────────────────────────────────────────
        if cfg.dedup {
            stats.rejected_duplicate = dedup_exact(&mut accepted);
        }

        // ── Steps 6 + 7: Pack and write statistics ───────────────────────────
        package(accepted, cfg.packer_settings(), sink, &mut stats)?;
        Ok(stats)
    }
}

/// Shuffle and pack already accepted documents into `sink`, then
/// write `stats` next to the shards.
///
/// No filtering or dedup happens here. Counters already in `stats`
/// are kept and written out with the packing totals.
pub fn package(
    documents: Vec<String>,
    settings: PackerSettings,
    sink: &mut dyn ShardSink,
    stats: &mut RunStats,
) -> Result<()> {
    settings.validate()?;
    ShardPacker::new(settings).pack(documents, sink, stats)?;
    sink.write_stats(stats)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::{DocumentRecord, Source};
    use crate::domain::traits::LoadReport;
    use crate::infra::shard_writer::load_stats;
    use pretty_assertions::assert_eq;
    use std::{collections::BTreeMap, fs, path::Path};

    const CLEAN: &str = "The magistrate heard the matter of the stolen mare at the spring assizes, \
                         and the jury returned its verdict before the candles were lit.";

    fn clean_text(n: usize) -> String {
        format!("{CLEAN} Entry {n}.")
    }

    fn jsonl(records: &[(&str, String)]) -> String {
        records
            .iter()
            .map(|(source, text)| serde_json::json!({ "source": source, "text": text }).to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn shard_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".parquet"))
            .collect();
        names.sort();
        names
    }

    /// Serves records from memory.
    struct VecSource(Vec<DocumentRecord>);

    impl DocumentSource for VecSource {
        fn for_each_record(&self, visit: &mut dyn FnMut(DocumentRecord)) -> Result<LoadReport> {
            for r in &self.0 {
                visit(r.clone());
            }
            Ok(LoadReport::default())
        }
    }

    #[test]
    fn default_config_validates() {
        assert_eq!(PackageConfig::default().validate(), Ok(1913));
    }

    #[test]
    fn bad_config_is_rejected() {
        let cfg = PackageConfig { cutoff: "1920".into(), ..PackageConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::UnknownCutoff { .. })));

        let cfg = PackageConfig { row_group_size: 0, ..PackageConfig::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::non_positive("row_group_size", 0)));

        let cfg = PackageConfig { contamination_threshold: 1.5, ..PackageConfig::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::ThresholdOutOfRange(1.5)));
    }

    #[test]
    fn filter_settings_follow_config() {
        let cfg = PackageConfig {
            min_chars: 10,
            clean_headers: false,
            ..PackageConfig::default()
        };
        assert_eq!(
            cfg.filter_settings(1900),
            FilterSettings {
                min_chars: 10,
                clean_headers: false,
                ..FilterSettings::for_cutoff(1900)
            }
        );
    }

    #[test]
    fn config_error_aborts_before_output_exists() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let cfg = PackageConfig {
            output_dir: out.clone(),
            cutoff: "bogus".into(),
            ..PackageConfig::default()
        };
        assert!(PackageUseCase::new(cfg).execute().is_err());
        assert!(!out.exists());
    }

    #[test]
    fn end_to_end_from_jsonl_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("records.jsonl");
        let out = dir.path().join("shards");

        let mut records: Vec<(&str, String)> = (0..8).map(|i| ("oldbailey", clean_text(i))).collect();
        records.push(("caselaw", clean_text(0))); // duplicate
        records.push(("caselaw", "too short".to_string()));
        records.push(("chronicling_america", format!("{CLEAN} Hitler spoke in 1939.")));
        records.push((
            "gutenberg",
            format!(
                "The Project Gutenberg EBook\n*** START OF THIS PROJECT GUTENBERG EBOOK ***\n{}\n*** END OF THIS PROJECT GUTENBERG EBOOK ***\nwww.gutenberg.org",
                clean_text(100)
            ),
        ));
        let mut body = jsonl(&records);
        body.push_str("\n{not json}\n\n");
        fs::write(&input, body).unwrap();

        let cfg = PackageConfig {
            inputs: vec![input, dir.path().join("missing.jsonl")],
            output_dir: out.clone(),
            chars_per_shard: 300,
            row_group_size: 2,
            ..PackageConfig::default()
        };
        let stats = PackageUseCase::new(cfg).execute().unwrap();

        assert_eq!(stats.records_seen, 12);
        assert_eq!(stats.missing_files, 1);
        assert_eq!(stats.rejected_malformed, 1);
        assert_eq!(stats.rejected_too_short, 1);
        assert_eq!(stats.rejected_contamination, 1);
        assert_eq!(stats.rejected_duplicate, 1);
        assert_eq!(stats.total_docs, 9);

        let mut reasons = BTreeMap::new();
        reasons.insert("anachronistic_term".to_string(), 1);
        reasons.insert("year_reference".to_string(), 1);
        assert_eq!(stats.contamination_reasons, reasons);

        assert_eq!(shard_files(&out).len(), stats.num_shards);
        assert_eq!(load_stats(&out.join("stats.json")).unwrap(), stats);
    }

    #[test]
    fn dedup_can_be_disabled() {
        let records = vec![
            DocumentRecord::new(Source::Caselaw, clean_text(1)),
            DocumentRecord::new(Source::Caselaw, clean_text(1)),
        ];
        let dir = tempfile::tempdir().unwrap();
        let mut sink = ParquetShardWriter::create(dir.path()).unwrap();
        let cfg = PackageConfig { dedup: false, ..PackageConfig::default() };

        let stats = PackageUseCase::new(cfg)
            .run(1913, Lexicon::builtin(), &VecSource(records), &mut sink)
            .unwrap();
        assert_eq!(stats.rejected_duplicate, 0);
        assert_eq!(stats.total_docs, 2);
        assert_eq!(stats.num_shards, 1);
    }

    #[test]
    fn empty_corpus_still_writes_stats() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = ParquetShardWriter::create(dir.path()).unwrap();
        let mut stats = RunStats::new();
        package(Vec::new(), PackerSettings::default(), &mut sink, &mut stats).unwrap();
        assert_eq!(stats, RunStats::new());
        assert!(shard_files(dir.path()).is_empty());
        assert_eq!(load_stats(&dir.path().join("stats.json")).unwrap(), stats);
    }

    #[test]
    fn package_writes_one_file_per_shard() {
        let dir = tempfile::tempdir().unwrap();
        let docs: Vec<String> = (0..10).map(|i| format!("{i}").repeat(100)).collect();
        let settings = PackerSettings {
            chars_per_shard: 200,
            row_group_size: 2,
            shuffle_seed: 42,
            max_shards: None,
        };

        let mut sink = ParquetShardWriter::create(dir.path()).unwrap();
        let mut stats = RunStats::new();
        package(docs, settings, &mut sink, &mut stats).unwrap();
        assert_eq!(stats.num_shards, 5);
        assert_eq!(stats.total_docs, 10);
        assert_eq!(stats.total_chars, 1000);
        assert_eq!(
            shard_files(dir.path()),
            vec![
                "shard_00000.parquet",
                "shard_00001.parquet",
                "shard_00002.parquet",
                "shard_00003.parquet",
                "shard_00004.parquet",
            ]
        );
    }
}
