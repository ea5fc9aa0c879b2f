// ============================================================
// Layer 4 — Header/Footer Normalizer
// ============================================================
// Removes distribution-platform wrappers (licence preambles,
// "END OF THE PROJECT GUTENBERG EBOOK" postambles) before the
// detector sees a document. The wrapper is modern text, so
// leaving it in would flag every old book as contaminated.
//
// One pass:
//   1. Find the first header-end marker (priority order,
//      case-insensitive). Drop everything up to and including
//      the line it sits on.
//   2. In what remains, find the first footer-start marker and
//      drop everything from it onwards.
//   3. Trim surrounding whitespace.
//
// Passes repeat until nothing changes, so stripping is
// idempotent even for files with stacked wrappers.

/// Header-end markers, highest priority first.
pub const HEADER_END_MARKERS: [&str; 4] = [
    "*** START OF THIS PROJECT GUTENBERG",
    "*** START OF THE PROJECT GUTENBERG",
    "*END*THE SMALL PRINT",
    "END OF THE PROJECT GUTENBERG HEADER",
];

/// Footer-start markers, highest priority first.
pub const FOOTER_START_MARKERS: [&str; 4] = [
    "*** END OF THIS PROJECT GUTENBERG",
    "*** END OF THE PROJECT GUTENBERG",
    "End of Project Gutenberg",
    "End of the Project Gutenberg",
];

/// Strips boilerplate using the built-in marker lists.
pub fn strip_boilerplate(text: &str) -> String {
    Normalizer::default().strip(text)
}

/// Boilerplate stripper over ordered, ASCII marker lists.
#[derive(Debug, Clone)]
pub struct Normalizer {
    // Stored upper-cased; matching upper-cases the haystack too.
    header_end: Vec<String>,
    footer_start: Vec<String>,
}

impl Normalizer {
    pub fn new<H, F>(header_end: H, footer_start: F) -> Self
    where
        H: IntoIterator,
        H::Item: AsRef<str>,
        F: IntoIterator,
        F::Item: AsRef<str>,
    {
        Self {
            header_end: header_end
                .into_iter()
                .map(|m| m.as_ref().to_ascii_uppercase())
                .collect(),
            footer_start: footer_start
                .into_iter()
                .map(|m| m.as_ref().to_ascii_uppercase())
                .collect(),
        }
    }

    /// Remove header and footer wrappers and trim the result.
    pub fn strip(&self, text: &str) -> String {
        let mut current = text;
        loop {
            let next = self.strip_once(current);
            // `next` is a sub-slice of `current`; equal length means unchanged.
            if next.len() == current.len() {
                return next.to_string();
            }
            current = next;
        }
    }

    fn strip_once<'t>(&self, text: &'t str) -> &'t str {
        // ASCII upper-casing keeps byte offsets aligned with `text`.
        let upper = text.to_ascii_uppercase();

        let mut start = 0usize;
        for marker in &self.header_end {
            if let Some(idx) = upper.find(marker.as_str()) {
                // A marker on the last, unterminated line leaves the header alone.
                if let Some(nl) = text[idx..].find('\n') {
                    start = idx + nl + 1;
                }
                break;
            }
        }

        let mut end = text.len();
        for marker in &self.footer_start {
            if let Some(idx) = upper[start..].find(marker.as_str()) {
                end = start + idx;
                break;
            }
        }

        text[start..end].trim()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(HEADER_END_MARKERS, FOOTER_START_MARKERS)
    }
}
