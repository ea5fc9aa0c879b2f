// ============================================================
// Layer 3 — Shard
// ============================================================
// An in-memory batch of documents on its way to becoming one
// `shard_NNNNN.parquet` file. The packer grows a shard one
// document at a time, seals it, hands it to a ShardSink and
// then drops it.

/// A bounded, ordered batch of documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shard {
    /// Position in the output sequence (0, 1, 2, ...)
    pub index: usize,
    pub documents: Vec<String>,
    /// Sum of the documents' lengths in Unicode scalar values
    pub total_chars: usize,
}

impl Shard {
    /// An empty shard that will be written at `index`.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            documents: Vec::new(),
            total_chars: 0,
        }
    }

    /// Append a document whose length has already been counted.
    pub fn push(&mut self, text: String, chars: usize) {
        self.total_chars += chars;
        self.documents.push(text);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Output file name, e.g. `shard_00007.parquet`.
    pub fn file_name(&self) -> String {
        shard_file_name(self.index)
    }
}

pub fn shard_file_name(index: usize) -> String {
    format!("shard_{index:05}.parquet")
}
