// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain structs, enums and traits describing what the pipeline
// works with. No file I/O, no Parquet, no regexes here.

// A raw JSONL document record
pub mod document;

// The detector's per-document verdict
pub mod verdict;

// An in-memory batch of documents destined for one file
pub mod shard;

// Run counters and capacity estimates
pub mod stats;

// Configuration validation errors
pub mod error;

// I/O seams implemented by the data and infra layers
pub mod traits;
