// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The two I/O seams of the pipeline:
//
//   DocumentSource → where raw records come from
//                    (JsonlLoader reads .jsonl files)
//   ShardSink      → where sealed shards and stats go
//                    (ParquetShardWriter writes to a directory)
//
// The packer and the use case only see these traits, so tests
// can feed records from memory and capture shards in a Vec.

use anyhow::Result;
use std::path::PathBuf;

use crate::domain::document::DocumentRecord;
use crate::domain::shard::Shard;
use crate::domain::stats::RunStats;

// ─── LoadReport ───────────────────────────────────────────────────────────────
/// Per-item problems a source skipped over while loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Input paths that did not exist
    pub missing_files: usize,
    /// Lines that could not be parsed into a DocumentRecord
    pub malformed_lines: usize,
}

// ─── DocumentSource ───────────────────────────────────────────────────────────
/// Any component that can stream raw document records.
pub trait DocumentSource {
    /// Call `visit` once per well-formed record, in input order.
    ///
    /// Missing inputs and malformed lines are skipped and reported,
    /// not returned as errors. Errors are reserved for failures that
    /// make the rest of the input unreadable.
    fn for_each_record(&self, visit: &mut dyn FnMut(DocumentRecord)) -> Result<LoadReport>;
}

// ─── ShardSink ────────────────────────────────────────────────────────────────
/// Any component that can persist sealed shards and run statistics.
///
/// Implementations must be atomic per call: on error nothing new is
/// visible at the final location.
pub trait ShardSink {
    /// Persist one sealed shard, returning where it was written.
    fn write_shard(&mut self, shard: &Shard, row_group_size: usize) -> Result<PathBuf>;

    /// Persist a snapshot of the run statistics.
    fn write_stats(&mut self, stats: &RunStats) -> Result<()>;
}
