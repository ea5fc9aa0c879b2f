// ============================================================
// Layer 3 — Contamination Verdict
// ============================================================
// The detector's answer for one document. A verdict is created
// once per document, used for the accept/reject decision, and
// then only its reason labels survive (as aggregate counters).

use serde::Serialize;
use std::fmt;

/// One piece of evidence that a document leaks post-cutoff content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reason {
    /// A lexicon term was found. `context` is the text around the
    /// first occurrence; it is reported, never used to suppress.
    AnachronisticTerm { term: String, context: String },
    /// A 4-digit year later than the cutoff.
    YearReference { year: u16 },
    /// `d/m/yyyy`-style date.
    ModernDate,
    /// URL, domain suffix or email address.
    UrlOrEmail,
    /// `$1,000,000`-style amount.
    ModernCurrency,
    /// Editorial marker near a distribution banner.
    ModernAnnotation { marker: String },
}

impl Reason {
    /// Stable key used when tallying rejections across a run.
    pub fn label(&self) -> &'static str {
        match self {
            Reason::AnachronisticTerm { .. } => "anachronistic_term",
            Reason::YearReference { .. } => "year_reference",
            Reason::ModernDate => "modern_date",
            Reason::UrlOrEmail => "url_or_email",
            Reason::ModernCurrency => "modern_currency",
            Reason::ModernAnnotation { .. } => "modern_annotation",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::AnachronisticTerm { term, .. } => write!(f, "Anachronistic term '{term}' found"),
            Reason::YearReference { year } => write!(f, "Year reference: {year}"),
            Reason::ModernDate => write!(f, "Modern date format"),
            Reason::UrlOrEmail => write!(f, "URL or email address"),
            Reason::ModernCurrency => write!(f, "Modern currency format"),
            Reason::ModernAnnotation { marker } => {
                write!(f, "Possible modern annotation: '{marker}'")
            }
        }
    }
}

/// Result of checking one document against a cutoff year.
///
/// `confidence` is an additive heuristic score clamped to [0, 1],
/// not a probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContaminationVerdict {
    pub is_contaminated: bool,
    pub confidence: f64,
    /// Evidence in the order it was found
    pub reasons: Vec<Reason>,
    /// Lexicon terms that matched, in match order
    pub matched_terms: Vec<String>,
}

impl ContaminationVerdict {
    /// Verdict for a document with no evidence at all.
    #[cfg(test)]
    pub fn clean() -> Self {
        Self {
            is_contaminated: false,
            confidence: 0.0,
            reasons: Vec::new(),
            matched_terms: Vec::new(),
        }
    }

    /// Reasons rendered as display strings.
    pub fn reason_strings(&self) -> Vec<String> {
        self.reasons.iter().map(ToString::to_string).collect()
    }
}
