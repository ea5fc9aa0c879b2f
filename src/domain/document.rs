// ============================================================
// Layer 3 — Document Record
// ============================================================
// One raw record as emitted by the upstream downloaders, one
// JSON object per line:
//
//   {"text": "...", "source": "gutenberg", "title": "...", ...}
//
// `text` and `source` are the only fields the pipeline reads.
// Everything else is kept verbatim in `metadata` so a record
// can be re-serialised without losing information.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Where a record came from. Unknown or missing values collapse
/// into `Unknown` instead of failing the whole line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Gutenberg,
    Caselaw,
    ChroniclingAmerica,
    Oldbailey,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Source {
    /// True for sources wrapped in distribution-platform boilerplate.
    pub fn has_boilerplate(self) -> bool {
        matches!(self, Source::Gutenberg)
    }
}

/// A raw document record read from a JSONL input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// The authored text, possibly still wrapped in boilerplate
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,

    /// Which collection produced the record
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: Source,

    /// Every other field of the JSON object
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl DocumentRecord {
    /// Create a record with no extra metadata.
    #[cfg(test)]
    pub fn new(source: Source, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source,
            metadata: Map::new(),
        }
    }

    /// Parse one JSONL line.
    pub fn from_json_line(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }
}

/// `null` reads the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
