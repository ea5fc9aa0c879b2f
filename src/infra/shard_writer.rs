// ============================================================
// Layer 6 — Parquet Shard Writer
// ============================================================
// Writes sealed shards and run statistics into one directory:
//
//   out/
//     shard_00000.parquet
//     shard_00001.parquet
//     ...
//     stats.json
//
// Shard layout (what the training data loader expects):
//   - one non-null Utf8 column named `text`
//   - dictionary encoding off
//   - zstd level 3
//   - no column statistics
//   - row groups of `row_group_size` rows
//
// Every file is written to a hidden temp file in the same
// directory and renamed into place only after it is complete.
// On any error the temp file is deleted, so a reader never sees
// a truncated shard or a half-written stats.json.
//
// Reference: parquet crate documentation (ArrowWriter, WriterProperties)

use anyhow::{Context, Result};
use arrow_array::{ArrayRef, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use parquet::{
    arrow::ArrowWriter,
    basic::{Compression, ZstdLevel},
    file::properties::{EnabledStatistics, WriterProperties},
};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};
use tempfile::NamedTempFile;

use crate::domain::shard::Shard;
use crate::domain::stats::RunStats;
use crate::domain::traits::ShardSink;

pub const TEXT_COLUMN: &str = "text";
pub const STATS_FILE: &str = "stats.json";
pub const ZSTD_LEVEL: i32 = 3;

const TEMP_PREFIX: &str = ".partial_";
const TEMP_SUFFIX: &str = ".tmp";

/// ShardSink that writes Parquet files into a directory.
pub struct ParquetShardWriter {
    dir: PathBuf,
    schema: SchemaRef,
}

impl ParquetShardWriter {
    /// Create the output directory (like `mkdir -p`) and clear temp
    /// files left behind by an earlier run that was killed mid-write.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;

        let removed = remove_stale_temp_files(&dir)?;
        if removed > 0 {
            tracing::warn!(
                "Removed {} stale temp files from '{}'",
                removed,
                dir.display()
            );
        }

        let schema = Arc::new(Schema::new(vec![Field::new(
            TEXT_COLUMN,
            DataType::Utf8,
            false,
        )]));

        Ok(Self { dir, schema })
    }

    pub fn stats_path(&self) -> PathBuf {
        self.dir.join(STATS_FILE)
    }

    fn properties(row_group_size: usize) -> Result<WriterProperties> {
        Ok(WriterProperties::builder()
            .set_dictionary_enabled(false)
            .set_compression(Compression::ZSTD(ZstdLevel::try_new(ZSTD_LEVEL)?))
            .set_statistics_enabled(EnabledStatistics::None)
            .set_max_row_group_size(row_group_size.max(1))
            .build())
    }

    fn temp_file(&self) -> Result<NamedTempFile> {
        tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(&self.dir)
            .with_context(|| format!("Cannot create temp file in '{}'", self.dir.display()))
    }
}

impl ShardSink for ParquetShardWriter {
    fn write_shard(&mut self, shard: &Shard, row_group_size: usize) -> Result<PathBuf> {
        let path = self.dir.join(shard.file_name());

        let column: ArrayRef = Arc::new(StringArray::from_iter_values(shard.documents.iter()));
        let batch = RecordBatch::try_new(self.schema.clone(), vec![column])
            .context("Cannot build record batch")?;

        let mut tmp = self.temp_file()?;
        {
            let mut writer = ArrowWriter::try_new(
                tmp.as_file_mut(),
                self.schema.clone(),
                Some(Self::properties(row_group_size)?),
            )?;
            writer
                .write(&batch)
                .with_context(|| format!("Cannot encode shard {}", shard.index))?;
            writer
                .close()
                .with_context(|| format!("Cannot finish shard {}", shard.index))?;
        }

        publish(tmp, &path)?;
        Ok(path)
    }

    fn write_stats(&mut self, stats: &RunStats) -> Result<()> {
        let path = self.stats_path();
        let json = serde_json::to_string_pretty(stats)?;

        let mut tmp = self.temp_file()?;
        tmp.write_all(json.as_bytes())
            .with_context(|| format!("Cannot write '{}'", path.display()))?;

        publish(tmp, &path)?;
        tracing::debug!("Saved run statistics to '{}'", path.display());
        Ok(())
    }
}

/// Flush a finished temp file to disk and rename it to `path`.
fn publish(tmp: NamedTempFile, path: &Path) -> Result<()> {
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("Cannot sync data for '{}'", path.display()))?;
    // Dropping the PersistError's file handle deletes the temp file.
    tmp.persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("Cannot move finished file to '{}'", path.display()))?;
    Ok(())
}

fn remove_stale_temp_files(dir: &Path) -> Result<usize> {
    let mut removed = 0usize;
    for entry in fs::read_dir(dir).with_context(|| format!("Cannot read '{}'", dir.display()))? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(TEMP_PREFIX) && name.ends_with(TEMP_SUFFIX) {
            fs::remove_file(entry.path())
                .with_context(|| format!("Cannot remove '{}'", entry.path().display()))?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Read the run statistics written next to a set of shards.
pub fn load_stats(path: &Path) -> Result<RunStats> {
    let file = File::open(path).with_context(|| {
        format!(
            "Cannot read statistics from '{}'. Has a packaging run finished there?",
            path.display()
        )
    })?;
    serde_json::from_reader(file)
        .with_context(|| format!("Invalid statistics JSON in '{}'", path.display()))
}
