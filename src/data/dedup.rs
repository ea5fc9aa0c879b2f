// ============================================================
// Layer 4 — Exact Deduplication
// ============================================================
// The same book often arrives twice (two Gutenberg editions with
// identical bodies once the wrapper is stripped, or a newspaper
// page re-published). Exact duplicates are removed before the
// shuffle so the permutation depends only on distinct texts.
//
// Texts are compared by SHA-256 digest, so the seen-set costs
// 32 bytes per document instead of a second copy of the corpus.

use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Drop exact duplicates, keeping first occurrences in order.
/// Returns how many documents were removed.
pub fn dedup_exact(docs: &mut Vec<String>) -> usize {
    let before = docs.len();
    let mut seen: HashSet<[u8; 32]> = HashSet::with_capacity(before);

    docs.retain(|text| seen.insert(Sha256::digest(text.as_bytes()).into()));

    let removed = before - docs.len();
    if removed > 0 {
        tracing::info!("Removed {} duplicate documents", removed);
    }
    removed
}
