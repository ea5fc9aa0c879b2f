// ============================================================
// Layer 4 — Temporal Lexicon
// ============================================================
// A table of terms that cannot appear in authentic text written
// before a given cutoff year. Each entry says "from cutoff
// `threshold_year` downwards, these terms are anachronistic":
//
//   threshold 1913, person,     {"hitler", "stalin", ...}
//   threshold 1900, technology, {"airplane", "radio", ...}
//   threshold 1850, technology, {"telephone", ...}
//
// For cutoff C the anachronistic set is the union of every entry
// with threshold_year >= C, so an earlier cutoff always sees a
// superset of what a later cutoff sees.
//
// The table is data: the built-in one is constructed once and
// passed to the detector explicitly, and a replacement can be
// loaded from JSON without touching detection code.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fs, path::Path};

use crate::domain::error::ConfigError;

/// Version tag of the built-in table.
pub const BUILTIN_LEXICON_VERSION: &str = "2024.1";

/// Cutoff identifiers accepted on the command line.
pub const CUTOFF_PRESETS: [(&str, i32, &str); 4] = [
    ("1850", 1850, "Pre-industrial/early Victorian"),
    ("1900", 1900, "Victorian/pre-Edwardian"),
    ("1913", 1913, "Pre-WWI"),
    ("1950", 1950, "Pre-Cold War"),
];

/// Resolve a cutoff identifier such as `"1913"` to its year.
pub fn parse_cutoff(id: &str) -> Result<i32, ConfigError> {
    let id = id.trim();
    CUTOFF_PRESETS
        .iter()
        .find(|(name, _, _)| *name == id)
        .map(|(_, year, _)| *year)
        .ok_or_else(|| ConfigError::UnknownCutoff {
            given: id.to_string(),
            supported: CUTOFF_PRESETS
                .iter()
                .map(|(name, _, _)| *name)
                .collect::<Vec<_>>()
                .join(", "),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Event,
    Person,
    Technology,
    Concept,
}

/// One row of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub threshold_year: i32,
    pub category: Category,
    pub terms: Vec<String>,
}

/// Immutable cutoff-year → anachronistic-term table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexicon {
    pub version: String,
    pub entries: Vec<LexiconEntry>,
}

/// Accepted on-disk shapes of a lexicon file.
#[derive(Deserialize)]
#[serde(untagged)]
enum LexiconFile {
    Versioned(Lexicon),
    Entries(Vec<LexiconEntry>),
}

impl Lexicon {
    pub fn new(version: impl Into<String>, entries: Vec<LexiconEntry>) -> Self {
        Self {
            version: version.into(),
            entries,
        }
    }

    /// Read a lexicon from a JSON file.
    ///
    /// The file is either `{"version": ..., "entries": [...]}` or a bare
    /// array of entries, in which case the file stem becomes the version.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read lexicon '{}'", path.display()))?;
        let file: LexiconFile = serde_json::from_str(&json)
            .with_context(|| format!("Invalid lexicon JSON in '{}'", path.display()))?;
        let lexicon = match file {
            LexiconFile::Versioned(lexicon) => lexicon,
            LexiconFile::Entries(entries) => {
                let version = path
                    .file_stem()
                    .map_or_else(|| "custom".to_string(), |s| s.to_string_lossy().into_owned());
                Lexicon::new(version, entries)
            }
        };
        tracing::info!(
            "Loaded lexicon '{}' ({} entries) from '{}'",
            lexicon.version,
            lexicon.entries.len(),
            path.display()
        );
        Ok(lexicon)
    }

    /// Every term anachronistic for `cutoff_year`, lower-cased, sorted,
    /// with empty placeholders removed.
    pub fn anachronistic_terms(&self, cutoff_year: i32) -> BTreeSet<String> {
        self.entries
            .iter()
            .filter(|entry| entry.threshold_year >= cutoff_year)
            .flat_map(|entry| entry.terms.iter())
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect()
    }

    /// The table shipped with the crate.
    pub fn builtin() -> Self {
        let entries = BUILTIN_ENTRIES
            .iter()
            .map(|(threshold_year, category, terms)| LexiconEntry {
                threshold_year: *threshold_year,
                category: *category,
                terms: terms.iter().map(|t| t.to_string()).collect(),
            })
            .collect();
        Self::new(BUILTIN_LEXICON_VERSION, entries)
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

const BUILTIN_ENTRIES: &[(i32, Category, &[&str])] = &[
    // ── Events ──
    (
        1913,
        Category::Event,
        &[
            "world war i", "world war 1", "the great war", "wwi",
            "world war ii", "world war 2", "wwii", "second world war",
            "russian revolution", "bolshevik revolution",
            "treaty of versailles", "league of nations",
            "great depression", "stock market crash 1929",
            "pearl harbor", "d-day", "hiroshima", "nagasaki",
            "holocaust", "concentration camp", "auschwitz",
            "cold war", "korean war", "vietnam war",
            "cuban missile crisis", "bay of pigs",
            "moon landing", "apollo 11",
        ],
    ),
    (
        1900,
        Category::Event,
        &[
            "wright brothers", "kitty hawk", "first flight",
            "world war", "wwi", "wwii",
            "russian revolution", "bolshevik",
            "relativity", "quantum mechanics",
            "radio broadcast", "television",
        ],
    ),
    (
        1850,
        Category::Event,
        &[
            "darwin's origin of species",
            "telephone", "electric light", "light bulb",
            "automobile", "motor car", "internal combustion",
            "airplane", "aeroplane",
            "world war", "wwi", "wwii",
        ],
    ),
    // ── People ──
    (
        1913,
        Category::Person,
        &[
            "adolf hitler", "hitler",
            "benito mussolini", "mussolini",
            "joseph stalin", "stalin",
            "franklin roosevelt", "fdr",
            "mao zedong", "mao tse-tung",
            "fidel castro",
            "john f kennedy", "jfk",
            "martin luther king",
            "nelson mandela",
        ],
    ),
    (1900, Category::Person, &["wright brothers", "albert einstein"]),
    // ── Technology ──
    (1950, Category::Technology, &["internet", "smartphone", "website", "sputnik"]),
    (
        1913,
        Category::Technology,
        &[
            "television", "tv set",
            "radio broadcast", "wireless radio",
            "computer", "computing machine",
            "atomic bomb", "nuclear weapon", "hydrogen bomb",
            "jet engine", "jet aircraft",
            "helicopter",
            "penicillin", "antibiotic",
            "plastic",
            "nylon",
        ],
    ),
    (
        1900,
        Category::Technology,
        &[
            "airplane", "aeroplane", "aircraft",
            "radio", "wireless telegraphy",
            "automobile", "motor car",
            "moving picture", "cinema",
        ],
    ),
    (
        1850,
        Category::Technology,
        &[
            "telephone",
            "phonograph", "gramophone",
            "electric light", "incandescent",
            "typewriter",
            "photograph",
        ],
    ),
    // ── Concepts ──
    (
        1913,
        Category::Concept,
        &[
            "nazi", "nazism", "fascism", "fascist",
            "soviet union", "ussr", "soviet",
            "communist party",
            "united nations",
            "genocide",
            "existentialism",
        ],
    ),
    (
        1900,
        Category::Concept,
        &["radioactivity", "radiation", "x-ray", "electron", "relativity", "quantum"],
    ),
];
