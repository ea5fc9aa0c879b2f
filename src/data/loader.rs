// ============================================================
// Layer 4 — JSONL Record Loader
// ============================================================
// Reads the files produced by the per-source downloaders. Each
// non-blank line is one JSON object:
//
//   {"text": "...", "source": "oldbailey", "trial_id": "t1780..."}
//
// Failure policy (per item, never per run):
//   - a path that does not exist is logged and skipped
//   - a line that is not UTF-8 or not a valid record is skipped
//     and counted as malformed
//
// Anything else (e.g. a permission error on an existing file)
// is a real I/O problem and is returned to the caller.

use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::domain::document::DocumentRecord;
use crate::domain::traits::{DocumentSource, LoadReport};

/// Streams records from a list of JSONL files, in order.
pub struct JsonlLoader {
    paths: Vec<PathBuf>,
}

impl JsonlLoader {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl DocumentSource for JsonlLoader {
    fn for_each_record(&self, visit: &mut dyn FnMut(DocumentRecord)) -> Result<LoadReport> {
        let mut report = LoadReport::default();

        for path in &self.paths {
            if !path.exists() {
                tracing::warn!("Input file not found, skipping: '{}'", path.display());
                report.missing_files += 1;
                continue;
            }

            tracing::info!("Processing: '{}'", path.display());
            let malformed = read_jsonl(path, visit)?;
            if malformed > 0 {
                tracing::debug!(
                    "Skipped {} malformed lines in '{}'",
                    malformed,
                    path.display()
                );
            }
            report.malformed_lines += malformed;
        }

        Ok(report)
    }
}

/// Visit every well-formed record in one file; returns the malformed count.
fn read_jsonl(path: &Path, visit: &mut dyn FnMut(DocumentRecord)) -> Result<usize> {
    let file = File::open(path).with_context(|| format!("Cannot open '{}'", path.display()))?;
    let mut reader = BufReader::new(file);

    let mut malformed = 0usize;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;
        if read == 0 {
            break;
        }

        // Bytes first, so one bad encoding only costs one line.
        let Ok(line) = std::str::from_utf8(&buf) else {
            malformed += 1;
            continue;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match DocumentRecord::from_json_line(line) {
            Ok(record) => visit(record),
            Err(_) => malformed += 1,
        }
    }

    Ok(malformed)
}
