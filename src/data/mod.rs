// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between raw downloader output and sealed shards.
//
// The pipeline flows in this order:
//
//   .jsonl files
//       │
//       ▼
//   JsonlLoader       → streams DocumentRecords, skips bad lines
//       │
//       ▼
//   CorpusFilter      → length check, then
//       │                 Normalizer (Gutenberg wrapper removal)
//       │                 ContaminationDetector (uses the Lexicon)
//       ▼
//   dedup_exact       → drops repeated texts
//       │
//       ▼
//   ShardPacker       → seeded shuffle + greedy bin packing
//       │
//       ▼
//   ShardSink         → Parquet files (Layer 6)
//
// Each module owns exactly one step and is tested on its own.

/// Cutoff-indexed table of anachronistic terms
pub mod lexicon;

/// Project Gutenberg header/footer removal
pub mod normalizer;

/// Scores text for post-cutoff knowledge
pub mod detector;

/// Reads JSONL record files
pub mod loader;

/// Per-record admission policy
pub mod filter;

/// Exact duplicate removal
pub mod dedup;

/// Reproducible permutation
pub mod shuffler;

/// Greedy shard accumulation
pub mod packer;
