use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

#[cfg(feature = "bz2")]
use bzip2::read::BzDecoder;
#[cfg(feature = "gzip")]
use flate2::read::MultiGzDecoder;
use memchr::memchr;
#[cfg(feature = "mmap")]
use memmap2::MmapOptions;
#[cfg(feature = "zstd")]
use zstd::stream::read::Decoder as ZstdDecoder;

use crate::index::AnnotationIndex;
use crate::record::{AnnotationRecord, FIELD_COUNT, ID_COLUMN};

/// Identifier prefix indexed by default (curated RefSeq mRNAs).
pub const DEFAULT_ID_PREFIX: &str = "NM";

/// Result alias for reader operations.
pub type ReaderResult<T> = Result<T, ReaderError>;

/// An error that can occur when reading an annotation table.
#[derive(Debug)]
pub enum ReaderError {
    /// An I/O error.
    Io(io::Error),
    /// An error that occurred when memory-mapping a file.
    #[cfg(feature = "mmap")]
    Mmap(io::Error),
    /// An error that occurred when decoding a line.
    InvalidEncoding {
        /// The line number where the error occurred.
        line: usize,
        /// The error message.
        message: String,
    },
    /// An error that occurred when a row has too few fields.
    UnexpectedFieldCount {
        /// The line number where the error occurred.
        line: usize,
        /// The expected number of fields.
        expected: usize,
        /// The actual number of fields.
        actual: usize,
    },
    /// An error that occurred when building an index.
    Builder(String),
}

impl fmt::Display for ReaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReaderError::Io(err) => write!(f, "I/O error: {err}"),
            #[cfg(feature = "mmap")]
            ReaderError::Mmap(err) => write!(f, "mmap error: {err}"),
            ReaderError::InvalidEncoding { line, message } => {
                write!(f, "invalid UTF-8 at line {line}: {message}")
            }
            ReaderError::UnexpectedFieldCount {
                line,
                expected,
                actual,
            } => write!(f, "line {line} had {actual} fields, expected {expected}"),
            ReaderError::Builder(msg) => write!(f, "builder error: {msg}"),
        }
    }
}

impl std::error::Error for ReaderError {
    /// Returns the source error, if any.
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReaderError::Io(err) => Some(err),
            #[cfg(feature = "mmap")]
            ReaderError::Mmap(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ReaderError {
    /// Creates a new `ReaderError` from an `io::Error`.
    fn from(err: io::Error) -> Self {
        ReaderError::Io(err)
    }
}

impl ReaderError {
    /// Creates a new `ReaderError` for an unexpected field count.
    pub(crate) fn unexpected_field_count(
        line: usize,
        expected: usize,
        actual: usize,
    ) -> ReaderError {
        ReaderError::UnexpectedFieldCount {
            line,
            expected,
            actual,
        }
    }

    /// Creates a new `ReaderError` for an invalid encoding.
    fn invalid_encoding(line: usize, message: impl Into<String>) -> ReaderError {
        ReaderError::InvalidEncoding {
            line,
            message: message.into(),
        }
    }
}

/// Configuration for which rows end up in an index.
///
/// # Example
///
/// ```
/// use cdsmap::IndexOptions;
///
/// // index predicted RefSeq models instead of curated ones
/// let options = IndexOptions::new().id_prefix("XM");
/// ```
#[derive(Clone, Debug)]
pub struct IndexOptions {
    /// Only identifiers starting with this prefix are indexed; `None` keeps all
    id_prefix: Option<String>,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            id_prefix: Some(DEFAULT_ID_PREFIX.to_string()),
        }
    }
}

impl IndexOptions {
    /// Creates a new options builder with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the index to identifiers starting with `prefix`.
    pub fn id_prefix<P: Into<String>>(mut self, prefix: P) -> Self {
        self.id_prefix = Some(prefix.into());
        self
    }

    /// Removes the identifier filter, indexing every row.
    pub fn any_prefix(mut self) -> Self {
        self.id_prefix = None;
        self
    }

    /// Returns `true` if rows with this identifier are indexed.
    pub(crate) fn accepts(&self, transcript_id: &str) -> bool {
        self.id_prefix
            .as_deref()
            .map_or(true, |prefix| transcript_id.starts_with(prefix))
    }
}

/// The mode to use when reading an annotation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderMode {
    /// Read the file line by line. This is the default.
    Default,
    /// Memory-map the file. This can be faster for large files, but requires
    /// the `mmap` feature.
    Mmap,
}

/// The compression format of the input file.
#[cfg(any(feature = "gzip", feature = "zstd", feature = "bz2"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Automatically detect the compression format from the file extension.
    ///
    /// This is the default.
    #[default]
    Auto,
    /// No compression.
    None,
    /// Gzip compression.
    Gzip,
    /// Zstandard compression.
    Zstd,
    /// Bzip2 compression.
    Bzip2,
}

/// Detect compression from file extension
#[cfg(any(feature = "gzip", feature = "zstd", feature = "bz2"))]
fn detect_compression_from_extension(path: &Path) -> Compression {
    let ext = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
    match ext {
        "gz" => Compression::Gzip,
        "zst" | "zstd" => Compression::Zstd,
        "bz2" | "bzip2" => Compression::Bzip2,
        _ => Compression::None,
    }
}

/// Returns `true` if the path carries a compressed-file extension.
#[cfg_attr(
    all(
        any(feature = "gzip", feature = "zstd", feature = "bz2"),
        not(feature = "mmap")
    ),
    allow(dead_code)
)]
fn has_compressed_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| {
        matches!(ext.to_str(), Some("gz" | "zst" | "zstd" | "bz2" | "bzip2"))
    })
}

/// A builder for creating an [`AnnotationIndex`].
///
/// # Example
///
/// ```rust,no_run,ignore
/// use cdsmap::{AnnotationIndex, ReaderMode};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let index = AnnotationIndex::builder()
///         .from_path("data/refFlat.txt.gz")
///         .id_prefix("NM")
///         .mode(ReaderMode::Default)
///         .buffer_capacity(128 * 1024)
///         .build()?;
///
///     println!("{} transcripts", index.len());
///     Ok(())
/// }
/// ```
pub struct IndexBuilder {
    source: Option<ReaderSource>,
    options: IndexOptions,
    mode: ReaderMode,
    buffer_capacity: usize,
    #[cfg(any(feature = "gzip", feature = "zstd", feature = "bz2"))]
    compression: Compression,
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self {
            source: None,
            options: IndexOptions::default(),
            mode: ReaderMode::Default,
            buffer_capacity: 64 * 1024,
            #[cfg(any(feature = "gzip", feature = "zstd", feature = "bz2"))]
            compression: Compression::default(),
        }
    }
}

impl IndexBuilder {
    /// Reads the table from a path.
    pub fn from_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source = Some(ReaderSource::Path(path.as_ref().into()));
        self
    }

    /// Reads the table from a reader.
    pub fn from_reader<T>(mut self, reader: T) -> Self
    where
        T: Read + Send + 'static,
    {
        self.source = Some(ReaderSource::Reader(Box::new(reader)));
        self
    }

    /// Replaces the index options.
    pub fn options(mut self, options: IndexOptions) -> Self {
        self.options = options;
        self
    }

    /// Restricts the index to identifiers starting with `prefix`.
    pub fn id_prefix<P: Into<String>>(mut self, prefix: P) -> Self {
        self.options = self.options.id_prefix(prefix);
        self
    }

    /// Sets the reading mode.
    pub fn mode(mut self, mode: ReaderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the buffer capacity for the reader.
    ///
    /// The default is 64 KB.
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity.max(8 * 1024);
        self
    }

    /// Sets the compression format of the input.
    #[cfg(any(feature = "gzip", feature = "zstd", feature = "bz2"))]
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Reads the whole source and builds the index.
    ///
    /// Malformed rows are logged and skipped; only I/O and configuration
    /// problems are returned as errors.
    pub fn build(mut self) -> ReaderResult<AnnotationIndex> {
        let source = self
            .source
            .take()
            .ok_or_else(|| ReaderError::Builder("ERROR: no input source configured".into()))?;

        match source {
            ReaderSource::Path(path) => match self.mode {
                ReaderMode::Default => {
                    let stream = self.open_path_stream(&path)?;
                    log::debug!("indexing {}", path.display());
                    index_stream(
                        BufReader::with_capacity(self.buffer_capacity, stream),
                        &self.options,
                    )
                }
                ReaderMode::Mmap => {
                    #[cfg(feature = "mmap")]
                    {
                        return self.build_mmap(&path);
                    }
                    #[cfg(not(feature = "mmap"))]
                    {
                        Err(ReaderError::Builder(
                            "ERROR: enable the `mmap` feature to use mmap mode".into(),
                        ))
                    }
                }
            },
            ReaderSource::Reader(reader) => match self.mode {
                ReaderMode::Default => index_stream(
                    BufReader::with_capacity(self.buffer_capacity, reader),
                    &self.options,
                ),
                ReaderMode::Mmap => Err(ReaderError::Builder(
                    "ERROR: mmap mode requires a filesystem path".into(),
                )),
            },
        }
    }

    /// Opens a path as a stream.
    fn open_path_stream(&self, path: &Path) -> ReaderResult<Box<dyn Read + Send>> {
        #[cfg(any(feature = "gzip", feature = "zstd", feature = "bz2"))]
        {
            let file = File::open(path)?;
            let compression = match self.compression {
                Compression::Auto => detect_compression_from_extension(path),
                other => other,
            };

            return match compression {
                Compression::None | Compression::Auto => Ok(Box::new(file)),
                Compression::Gzip => {
                    #[cfg(feature = "gzip")]
                    {
                        Ok(Box::new(MultiGzDecoder::new(file)))
                    }
                    #[cfg(not(feature = "gzip"))]
                    {
                        Err(ReaderError::Builder(
                            "gzip compression requested but the `gzip` feature is disabled".into(),
                        ))
                    }
                }
                Compression::Zstd => {
                    #[cfg(feature = "zstd")]
                    {
                        Ok(Box::new(ZstdDecoder::new(file)?))
                    }
                    #[cfg(not(feature = "zstd"))]
                    {
                        Err(ReaderError::Builder(
                            "zstd compression requested but the `zstd` feature is disabled".into(),
                        ))
                    }
                }
                Compression::Bzip2 => {
                    #[cfg(feature = "bz2")]
                    {
                        Ok(Box::new(BzDecoder::new(file)))
                    }
                    #[cfg(not(feature = "bz2"))]
                    {
                        Err(ReaderError::Builder(
                            "bzip2 compression requested but the `bz2` feature is disabled".into(),
                        ))
                    }
                }
            };
        }

        #[cfg(not(any(feature = "gzip", feature = "zstd", feature = "bz2")))]
        {
            if has_compressed_extension(path) {
                return Err(ReaderError::Builder(
                    "ERROR: enable compression features to read compressed inputs".into(),
                ));
            }
            Ok(Box::new(File::open(path)?))
        }
    }

    /// Builds the index from a memory-mapped file.
    #[cfg(feature = "mmap")]
    fn build_mmap(&self, path: &Path) -> ReaderResult<AnnotationIndex> {
        if has_compressed_extension(path) {
            return Err(ReaderError::Builder(
                "ERROR: compression is only supported in buffered mode".into(),
            ));
        }

        let map =
            unsafe { MmapOptions::new().map(&File::open(path)?) }.map_err(ReaderError::Mmap)?;
        log::debug!("indexing {} ({} bytes mapped)", path.display(), map.len());
        Ok(index_bytes(&map, &self.options))
    }
}

/// Reader source
enum ReaderSource {
    Path(PathBuf),
    Reader(Box<dyn Read + Send>),
}

/// Builds an index from a buffered stream, one line at a time.
fn index_stream<R: BufRead>(mut reader: R, options: &IndexOptions) -> ReaderResult<AnnotationIndex> {
    let mut index = AnnotationIndex::default();
    let mut buf = Vec::with_capacity(1024);
    let mut line_number = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        line_number += 1;
        absorb_line(&mut index, trim_line(&buf), line_number, options);
    }

    log_summary(&index, line_number);
    Ok(index)
}

/// Builds an index from an in-memory table.
pub(crate) fn index_bytes(data: &[u8], options: &IndexOptions) -> AnnotationIndex {
    let mut index = AnnotationIndex::default();
    let mut cursor = 0usize;
    let mut line_number = 0usize;

    while cursor < data.len() {
        let rel_end = memchr(b'\n', &data[cursor..]).map(|idx| cursor + idx);
        let line_end = rel_end.unwrap_or(data.len());

        line_number += 1;
        absorb_line(
            &mut index,
            trim_line(&data[cursor..line_end]),
            line_number,
            options,
        );

        cursor = rel_end.map(|pos| pos + 1).unwrap_or(data.len());
    }

    log_summary(&index, line_number);
    index
}

/// Adds one line to the index, skipping comments and malformed rows.
fn absorb_line(index: &mut AnnotationIndex, line: &[u8], line_number: usize, options: &IndexOptions) {
    if should_skip_bytes(line) {
        return;
    }

    match parse_line_bytes(line, line_number, options) {
        Ok(Some(record)) => index.insert(record),
        Ok(None) => {}
        Err(err) => {
            log::warn!("skipping malformed row: {err}");
            index.mark_skipped();
        }
    }
}

fn log_summary(index: &AnnotationIndex, lines: usize) {
    log::info!(
        "indexed {} transcripts from {} lines ({} malformed rows skipped)",
        index.len(),
        lines,
        index.skipped()
    );
}

/// Parse a single refFlat row.
///
/// Returns `Ok(None)` for rows whose identifier is filtered out by `options`.
///
/// # Errors
///
/// This function returns an error if the row is not valid UTF-8, is too short
/// to carry an identifier, or is an accepted row without all refFlat columns.
fn parse_line_bytes(
    line: &[u8],
    line_number: usize,
    options: &IndexOptions,
) -> ReaderResult<Option<AnnotationRecord>> {
    let text = std::str::from_utf8(line)
        .map_err(|err| ReaderError::invalid_encoding(line_number, err.to_string()))?;

    let fields: Vec<&str> = text.split_ascii_whitespace().collect();
    if fields.len() <= ID_COLUMN {
        return Err(ReaderError::unexpected_field_count(
            line_number,
            ID_COLUMN + 1,
            fields.len(),
        ));
    }

    if !options.accepts(fields[ID_COLUMN]) {
        return Ok(None);
    }

    AnnotationRecord::from_fields(&fields)
        .map(Some)
        .ok_or_else(|| ReaderError::unexpected_field_count(line_number, FIELD_COUNT, fields.len()))
}

/// Trim the line terminator off a raw line.
fn trim_line(mut line: &[u8]) -> &[u8] {
    while let [rest @ .., b'\n' | b'\r'] = line {
        line = rest;
    }
    line
}

/// Returns `true` if the line should be skipped.
fn should_skip_bytes(line: &[u8]) -> bool {
    let trimmed = line.trim_ascii();
    trimmed.is_empty() || trimmed.starts_with(b"#")
}
