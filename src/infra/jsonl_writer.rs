// ============================================================
// Layer 6 — JSONL Writer
// ============================================================
// Writes plain texts back out in the same one-object-per-line
// shape the loader reads, so a filtered subset can be fed to a
// later `package` run:
//
//   {"text": "..."}
//
// Same atomic publish as the shard writer: temp file in the
// target directory, then rename.

use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    fs,
    io::{BufWriter, Write},
    path::Path,
};

#[derive(Serialize)]
struct TextLine<'a> {
    text: &'a str,
}

/// Write `texts` to `path` as JSONL, replacing any existing file.
pub fn write_jsonl<'a, I>(path: &Path, texts: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a String>,
{
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("Cannot create directory '{}'", dir.display()))?;

    let tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Cannot create temp file in '{}'", dir.display()))?;

    let mut count = 0usize;
    {
        let mut out = BufWriter::new(tmp.as_file());
        for text in texts {
            serde_json::to_writer(&mut out, &TextLine { text })?;
            out.write_all(b"\n")?;
            count += 1;
        }
        out.flush()
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
    }

    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("Cannot move finished file to '{}'", path.display()))?;

    tracing::info!("Wrote {} records to '{}'", count, path.display());
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::JsonlLoader;
    use crate::domain::document::Source;
    use crate::domain::traits::DocumentSource;

    #[test]
    fn output_reads_back_through_the_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clean/subset.jsonl");
        let texts = vec!["first line".to_string(), "second \"quoted\"\nline".to_string()];

        assert_eq!(write_jsonl(&path, &texts).unwrap(), 2);

        let mut seen = Vec::new();
        let report = JsonlLoader::new([&path])
            .for_each_record(&mut |r| seen.push((r.source, r.text)))
            .unwrap();
        assert_eq!(report.malformed_lines, 0);
        assert_eq!(
            seen,
            vec![
                (Source::Unknown, texts[0].clone()),
                (Source::Unknown, texts[1].clone()),
            ]
        );
    }

    #[test]
    fn replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        fs::write(&path, "old contents\n").unwrap();

        write_jsonl(&path, &Vec::new()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }
}
