// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File formats the other layers write to:
//
//   shard_writer.rs : Parquet shard and stats.json persistence
//                     Implements ShardSink. Every file goes to
//                     a temp file first and is renamed into
//                     place once complete, so readers never see
//                     a partial shard.
//
//   jsonl_writer.rs : Filtered text subsets as JSONL, in the
//                     shape the loader reads back.
//
// Reference: parquet crate documentation
//            tempfile crate documentation (NamedTempFile::persist)

/// Parquet shard writer and stats.json persistence
pub mod shard_writer;

/// Atomic JSONL output for filtered subsets
pub mod jsonl_writer;
