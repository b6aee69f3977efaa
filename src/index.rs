use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::reader::{self, IndexBuilder, IndexOptions, ReaderResult};
#[cfg(feature = "mmap")]
use crate::reader::ReaderMode;
use crate::record::AnnotationRecord;

/// Annotation records keyed by transcript identifier.
///
/// The index is filled once from a refFlat table and never changes
/// afterwards, so lookups are safe from any number of threads. When an
/// identifier appears on several rows the last row wins.
///
/// # Example
///
/// ```
/// use cdsmap::AnnotationIndex;
///
/// let table = b"Gene1\tNM_000001\tchr1\t+\t0\t10\t0\t6\t1\t0,\t10,\n\
///               Gene2\tNR_000002\tchr1\t+\t0\t10\t0\t0\t1\t0,\t10,\n";
/// let index = AnnotationIndex::from_bytes(table);
///
/// assert_eq!(index.len(), 1);
/// assert!(index.get("NM_000001").is_some());
/// assert!(index.get("NR_000002").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AnnotationIndex {
    records: HashMap<String, AnnotationRecord>,
    skipped: usize,
}

impl AnnotationIndex {
    /// Creates a new `IndexBuilder` to configure how a table is read.
    pub fn builder() -> IndexBuilder {
        IndexBuilder::default()
    }

    /// Indexes a refFlat file with default options.
    ///
    /// Compressed inputs are recognised by extension when the matching
    /// feature is enabled.
    pub fn from_path<P: AsRef<Path>>(path: P) -> ReaderResult<Self> {
        Self::builder().from_path(path).build()
    }

    /// Indexes a refFlat table from any reader with default options.
    pub fn from_reader<T>(reader: T) -> ReaderResult<Self>
    where
        T: Read + Send + 'static,
    {
        Self::builder().from_reader(reader).build()
    }

    /// Indexes an in-memory refFlat table with default options.
    pub fn from_bytes(data: &[u8]) -> Self {
        reader::index_bytes(data, &IndexOptions::default())
    }

    /// Indexes a refFlat file through a memory map.
    ///
    /// This requires the `mmap` feature.
    #[cfg(feature = "mmap")]
    pub fn from_mmap<P: AsRef<Path>>(path: P) -> ReaderResult<Self> {
        Self::builder()
            .from_path(path)
            .mode(ReaderMode::Mmap)
            .build()
    }

    /// Returns the record for a transcript identifier.
    #[inline]
    pub fn get(&self, transcript_id: &str) -> Option<&AnnotationRecord> {
        self.records.get(transcript_id)
    }

    /// Returns `true` if the transcript identifier is indexed.
    #[inline]
    pub fn contains(&self, transcript_id: &str) -> bool {
        self.records.contains_key(transcript_id)
    }

    /// Returns the number of indexed transcripts.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing was indexed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of malformed rows skipped while indexing.
    #[inline]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Iterates over indexed records in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnnotationRecord)> {
        self.records.iter().map(|(id, record)| (id.as_str(), record))
    }

    /// Inserts a record, replacing any earlier row with the same identifier.
    pub(crate) fn insert(&mut self, record: AnnotationRecord) {
        let id = record.transcript_id().to_string();
        if let Some(previous) = self.records.insert(id, record) {
            log::debug!(
                "{} appears more than once; keeping the later row",
                previous.transcript_id()
            );
        }
    }

    pub(crate) fn mark_skipped(&mut self) {
        self.skipped += 1;
    }
}
