// ============================================================
// Layer 3 — Run Statistics and Capacity Estimates
// ============================================================
// RunStats is the single mutable aggregate of a packaging run.
// It is serialised as `stats.json` next to the shards:
//
//   {
//     "total_docs": 10000,
//     "total_chars": 2500000000,
//     "num_shards": 10,
//     "rejected_contamination": 412,
//     ...
//   }
//
// The first four fields are the contract with downstream
// tooling; the rest explain where the other records went.
//
// TrainingEstimate turns total_chars into rough model-size
// guidance using the Chinchilla 20-tokens-per-parameter rule.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Documents written into shards
    pub total_docs: usize,
    /// Characters written into shards
    pub total_chars: usize,
    /// Shards sealed and written
    pub num_shards: usize,
    /// Records rejected by the contamination detector
    pub rejected_contamination: usize,

    /// Well-formed records read from the inputs
    #[serde(default)]
    pub records_seen: usize,
    /// Records with empty or too-short text
    #[serde(default)]
    pub rejected_too_short: usize,
    /// Lines that were not valid JSON records
    #[serde(default)]
    pub rejected_malformed: usize,
    /// Exact duplicates of an earlier accepted text
    #[serde(default)]
    pub rejected_duplicate: usize,
    /// Accepted documents left over once max_shards was reached
    #[serde(default)]
    pub dropped_by_shard_cap: usize,
    /// Input paths that did not exist
    #[serde(default)]
    pub missing_files: usize,
    /// Reason label -> number of rejected documents carrying it
    #[serde(default)]
    pub contamination_reasons: BTreeMap<String, usize>,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one document written into a shard.
    pub fn record_emitted(&mut self, chars: usize) {
        self.total_docs += 1;
        self.total_chars += chars;
    }

    /// Count one contamination rejection and each distinct reason label on it.
    pub fn record_contaminated<'a>(&mut self, labels: impl IntoIterator<Item = &'a str>) {
        self.rejected_contamination += 1;
        let mut seen: Vec<&str> = Vec::new();
        for label in labels {
            if seen.contains(&label) {
                continue;
            }
            seen.push(label);
            *self.contamination_reasons.entry(label.to_string()).or_insert(0) += 1;
        }
    }

    /// Mean characters per shard (0 when nothing was written).
    pub fn average_chars_per_shard(&self) -> usize {
        self.total_chars / self.num_shards.max(1)
    }
}

// ─── Capacity estimates ──────────────────────────────────────────────────────

/// Characters per token observed for the target tokenizer.
pub const CHARS_PER_TOKEN: f64 = 4.8;

/// Chinchilla-optimal training tokens per model parameter.
pub const TOKENS_PER_PARAM: f64 = 20.0;

/// Depth presets and their approximate parameter counts, ascending.
pub const DEPTH_PARAMS: [(u32, u64); 4] = [
    (20, 561_000_000),
    (26, 1_100_000_000),
    (32, 1_800_000_000),
    (34, 2_200_000_000),
];

/// Throughput of the reference 8xH100 node (11B tokens in 3h).
pub const TOKENS_PER_HOUR_8XH100: f64 = 11_000_000_000.0 / 3.0;

/// Rough model sizing derived from a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingEstimate {
    pub total_tokens: u64,
    pub optimal_params: u64,
    /// Largest depth preset the corpus can train optimally
    pub recommended_depth: Option<u32>,
    pub training_hours_8xh100: Option<f64>,
}

impl TrainingEstimate {
    pub fn from_stats(stats: &RunStats) -> Self {
        let total_tokens = stats.total_chars as f64 / CHARS_PER_TOKEN;
        let optimal_params = total_tokens / TOKENS_PER_PARAM;

        let recommended_depth = DEPTH_PARAMS
            .iter()
            .filter(|(_, params)| optimal_params >= *params as f64)
            .map(|(depth, _)| *depth)
            .last();

        let training_hours_8xh100 =
            recommended_depth.map(|_| total_tokens / TOKENS_PER_HOUR_8XH100);

        Self {
            total_tokens: total_tokens as u64,
            optimal_params: optimal_params as u64,
            recommended_depth,
            training_hours_8xh100,
        }
    }
}
