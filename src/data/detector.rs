// ============================================================
// Layer 4 — Contamination Detector
// ============================================================
// Scores one document for evidence of post-cutoff knowledge.
// Every signal adds a fixed amount to a confidence score that
// is clamped to 1.0:
//
//   lexicon term present            +0.2 per distinct term
//   year token > cutoff (1900-2099) +0.3 per occurrence
//   d/m/yyyy date                   +0.3 once
//   URL / email                     +0.3 once
//   $1,000,000-style amount         +0.3 once
//   editorial marker near banner    +0.1 per marker
//
// The document is contaminated when confidence >= threshold.
// The score is a heuristic, not a probability, and it only
// ever grows as signals are added.
//
// Known limitation: the `context_window` characters around a
// term are extracted and reported on the reason, but nothing
// looks at them to tell a historical mention apart from a
// modern one.
//
// The detector is a pure function of (text, cutoff, options)
// and the lexicon it was built with. It never fails.

use regex::Regex;
use std::collections::BTreeMap;

use crate::data::lexicon::Lexicon;
use crate::domain::verdict::{ContaminationVerdict, Reason};

pub const TERM_WEIGHT: f64 = 0.2;
pub const PATTERN_WEIGHT: f64 = 0.3;
pub const ANNOTATION_WEIGHT: f64 = 0.1;

pub const DEFAULT_THRESHOLD: f64 = 0.3;
pub const DEFAULT_CONTEXT_WINDOW: usize = 100;

/// Characters at the start of a document searched for a platform banner.
pub const BANNER_SCAN_CHARS: usize = 2000;
/// Characters at the start of a document searched for editorial markers.
pub const ANNOTATION_SCAN_CHARS: usize = 5000;

const BANNER: &str = "project gutenberg";

/// Markers of front matter added by a modern editor.
pub const ANNOTATION_MARKERS: [&str; 5] = [
    "introduction by",
    "edited by",
    "annotated by",
    "foreword by",
    "notes by",
];

/// Lexicon + pattern based anachronism detector.
#[derive(Debug, Clone)]
pub struct ContaminationDetector {
    lexicon: Lexicon,
    patterns: ModernPatterns,
}

#[derive(Debug, Clone)]
struct ModernPatterns {
    year: Regex,
    slash_date: Regex,
    url_or_email: Regex,
    currency: Regex,
}

impl ModernPatterns {
    fn new() -> Self {
        Self {
            year: Regex::new(r"\b(19[0-9]{2}|20[0-9]{2})\b").expect("year pattern"),
            slash_date: Regex::new(r"\b[0-9]{1,2}/[0-9]{1,2}/(?:19|20)[0-9]{2}\b")
                .expect("date pattern"),
            url_or_email: Regex::new(r"https?://|www\.|\.com|\.org|@\w+\.\w+")
                .expect("url pattern"),
            currency: Regex::new(r"\$[0-9]{1,3}(?:,[0-9]{3})+").expect("currency pattern"),
        }
    }
}

impl ContaminationDetector {
    /// Build a detector over an explicit lexicon.
    pub fn new(lexicon: Lexicon) -> Self {
        Self {
            lexicon,
            patterns: ModernPatterns::new(),
        }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Score `text` against `cutoff_year`.
    pub fn check(
        &self,
        text: &str,
        cutoff_year: i32,
        context_window: usize,
        threshold: f64,
    ) -> ContaminationVerdict {
        let mut score = Score::default();
        let lower = text.to_lowercase();

        // ── Lexicon terms ────────────────────────────────────────────────────
        for term in self.lexicon.anachronistic_terms(cutoff_year) {
            let Some(idx) = lower.find(term.as_str()) else {
                continue;
            };
            let context = context_around(&lower, idx, idx + term.len(), context_window);
            score.add(
                Reason::AnachronisticTerm {
                    term: term.clone(),
                    context: context.to_string(),
                },
                TERM_WEIGHT,
            );
            score.matched_terms.push(term);
        }

        // ── Modern references ────────────────────────────────────────────────
        for reason in self.modern_references(text, &lower, cutoff_year) {
            score.add(reason, PATTERN_WEIGHT);
        }

        // ── Editorial front matter ───────────────────────────────────────────
        if prefix_chars(&lower, BANNER_SCAN_CHARS).contains(BANNER) {
            let front = prefix_chars(&lower, ANNOTATION_SCAN_CHARS);
            for marker in ANNOTATION_MARKERS {
                if front.contains(marker) {
                    score.add(
                        Reason::ModernAnnotation {
                            marker: marker.to_string(),
                        },
                        ANNOTATION_WEIGHT,
                    );
                }
            }
        }

        score.into_verdict(threshold)
    }

    /// Year tokens are reported per occurrence, the other
    /// categories at most once each.
    fn modern_references(&self, text: &str, lower: &str, cutoff_year: i32) -> Vec<Reason> {
        let mut found = Vec::new();

        for cap in self.patterns.year.captures_iter(text) {
            let Ok(year) = cap[1].parse::<u16>() else {
                continue;
            };
            if i32::from(year) > cutoff_year {
                found.push(Reason::YearReference { year });
            }
        }

        if self.patterns.slash_date.is_match(text) {
            found.push(Reason::ModernDate);
        }
        if self.patterns.url_or_email.is_match(lower) {
            found.push(Reason::UrlOrEmail);
        }
        if self.patterns.currency.is_match(text) {
            found.push(Reason::ModernCurrency);
        }

        found
    }

    /// Check many texts, keeping the clean ones.
    pub fn check_batch<I, S>(
        &self,
        texts: I,
        cutoff_year: i32,
        threshold: f64,
    ) -> (Vec<String>, BatchReport)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut clean = Vec::new();
        let mut report = BatchReport::default();

        for text in texts {
            let text = text.into();
            let verdict = self.check(&text, cutoff_year, DEFAULT_CONTEXT_WINDOW, threshold);
            report.record(&verdict);
            if !verdict.is_contaminated {
                clean.push(text);
            }
        }

        (clean, report)
    }
}

impl Default for ContaminationDetector {
    fn default() -> Self {
        Self::new(Lexicon::builtin())
    }
}

// ─── Batch report ─────────────────────────────────────────────────────────────

/// Tally over a batch of verdicts.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub clean: usize,
    pub contaminated: usize,
    /// Reason label -> occurrences across contaminated documents
    pub contamination_reasons: BTreeMap<String, usize>,
}

impl BatchReport {
    pub fn record(&mut self, verdict: &ContaminationVerdict) {
        self.total += 1;
        if !verdict.is_contaminated {
            self.clean += 1;
            return;
        }
        self.contaminated += 1;
        for reason in &verdict.reasons {
            *self
                .contamination_reasons
                .entry(reason.label().to_string())
                .or_insert(0) += 1;
        }
    }
}

// ─── Scoring helpers ──────────────────────────────────────────────────────────

#[derive(Default)]
struct Score {
    confidence: f64,
    reasons: Vec<Reason>,
    matched_terms: Vec<String>,
}

impl Score {
    fn add(&mut self, reason: Reason, weight: f64) {
        self.reasons.push(reason);
        self.confidence = (self.confidence + weight).min(1.0);
    }

    fn into_verdict(self, threshold: f64) -> ContaminationVerdict {
        ContaminationVerdict {
            is_contaminated: self.confidence >= threshold,
            confidence: self.confidence,
            reasons: self.reasons,
            matched_terms: self.matched_terms,
        }
    }
}

/// First `n` characters of `s`.
fn prefix_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// `window` characters either side of the byte range `start..end`.
fn context_around(s: &str, start: usize, end: usize, window: usize) -> &str {
    let from = s[..start]
        .char_indices()
        .rev()
        .take(window)
        .last()
        .map_or(start, |(idx, _)| idx);
    let to = s[end..]
        .char_indices()
        .nth(window)
        .map_or(s.len(), |(idx, _)| end + idx);
    &s[from..to]
}
