// ============================================================
// Layer 4 — Corpus Filter
// ============================================================
// Per-record admission policy, applied in this order:
//
//   1. empty or shorter than `min_chars`    → TooShort
//   2. Gutenberg record + clean_headers     → strip boilerplate
//   3. check_contamination                  → Contaminated(verdict)
//   4. otherwise                            → Accepted(text)
//
// The length check runs on the raw text, before stripping.

use crate::data::detector::{ContaminationDetector, DEFAULT_CONTEXT_WINDOW, DEFAULT_THRESHOLD};
use crate::data::normalizer::Normalizer;
use crate::domain::document::DocumentRecord;
use crate::domain::verdict::ContaminationVerdict;

/// Knobs for the admission policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSettings {
    pub cutoff_year: i32,
    pub min_chars: usize,
    pub clean_headers: bool,
    pub check_contamination: bool,
    pub threshold: f64,
    pub context_window: usize,
}

impl FilterSettings {
    pub fn for_cutoff(cutoff_year: i32) -> Self {
        Self {
            cutoff_year,
            min_chars: 100,
            clean_headers: true,
            check_contamination: true,
            threshold: DEFAULT_THRESHOLD,
            context_window: DEFAULT_CONTEXT_WINDOW,
        }
    }
}

/// What happened to one record.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    Accepted(String),
    TooShort,
    Contaminated(ContaminationVerdict),
}

pub struct CorpusFilter {
    settings: FilterSettings,
    normalizer: Normalizer,
    detector: ContaminationDetector,
}

impl CorpusFilter {
    pub fn new(settings: FilterSettings, detector: ContaminationDetector) -> Self {
        Self {
            settings,
            normalizer: Normalizer::default(),
            detector,
        }
    }

    /// Apply the admission policy to one record, consuming it.
    pub fn admit(&self, record: DocumentRecord) -> FilterOutcome {
        let s = &self.settings;

        if record.text.is_empty() || record.text.chars().count() < s.min_chars {
            return FilterOutcome::TooShort;
        }

        let text = if s.clean_headers && record.source.has_boilerplate() {
            self.normalizer.strip(&record.text)
        } else {
            record.text
        };

        if s.check_contamination {
            let verdict = self
                .detector
                .check(&text, s.cutoff_year, s.context_window, s.threshold);
            if verdict.is_contaminated {
                return FilterOutcome::Contaminated(verdict);
            }
        }

        FilterOutcome::Accepted(text)
    }
}
