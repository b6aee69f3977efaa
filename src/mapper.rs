use std::fmt;
use std::path::Path;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::index::AnnotationIndex;
use crate::position::{self, CodingPosition};
use crate::reader::ReaderResult;
use crate::structure::GeneStructure;

/// Result alias for mapping operations.
pub type MapResult<T> = Result<T, MapError>;

/// The reasons a single query can fail to produce a position.
///
/// [`Mapper::map`] folds all of them into `None`; [`Mapper::try_map`]
/// hands them back untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// The transcript identifier is not present in the index.
    UnknownTranscript(String),
    /// The coordinate is not a coding base of the transcript (intron, UTR
    /// or outside the transcript altogether).
    CoordinateNotInCds {
        /// The queried transcript.
        transcript: String,
        /// The queried 1-based genomic coordinate.
        coordinate: u64,
    },
    /// The annotation row cannot be turned into a complete coding sequence.
    MalformedAnnotation {
        /// The offending transcript.
        transcript: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::UnknownTranscript(id) => write!(f, "unknown transcript {id}"),
            MapError::CoordinateNotInCds {
                transcript,
                coordinate,
            } => write!(f, "coordinate {coordinate} is not in the CDS of {transcript}"),
            MapError::MalformedAnnotation { transcript, reason } => {
                write!(f, "malformed annotation for {transcript}: {reason}")
            }
        }
    }
}

impl std::error::Error for MapError {}

impl MapError {
    /// Creates a new `MapError` for a malformed annotation.
    pub(crate) fn malformed(transcript: &str, reason: impl Into<String>) -> MapError {
        MapError::MalformedAnnotation {
            transcript: transcript.to_string(),
            reason: reason.into(),
        }
    }
}

/// Maps genomic coordinates onto CDS and amino-acid positions.
///
/// A `Mapper` owns an immutable [`AnnotationIndex`]; every query rebuilds the
/// coding structure of the requested transcript from scratch, so a `Mapper`
/// can be shared between threads without locking.
///
/// # Example
///
/// ```rust,no_run,ignore
/// use cdsmap::Mapper;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mapper = Mapper::from_path("data/refFlatMm10.txt")?;
///
///     match mapper.map(101153495, "NM_146145") {
///         Some(position) => println!("c.{} p.{}", position.cds(), position.aa()),
///         None => println!("None None"),
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Mapper {
    index: AnnotationIndex,
}

impl Mapper {
    /// Creates a mapper over an already built index.
    pub fn new(index: AnnotationIndex) -> Self {
        Self { index }
    }

    /// Indexes a refFlat file with default options and wraps it.
    pub fn from_path<P: AsRef<Path>>(path: P) -> ReaderResult<Self> {
        AnnotationIndex::from_path(path).map(Self::new)
    }

    /// Returns the underlying index.
    #[inline]
    pub fn index(&self) -> &AnnotationIndex {
        &self.index
    }

    /// Maps `coordinate` (1-based) on `transcript_id`, reporting why it failed.
    pub fn try_map(&self, coordinate: u64, transcript_id: &str) -> MapResult<CodingPosition> {
        let record = self
            .index
            .get(transcript_id)
            .ok_or_else(|| MapError::UnknownTranscript(transcript_id.to_string()))?;

        let structure = GeneStructure::build(record)?;
        position::find(&structure, coordinate)
    }

    /// Maps `coordinate` (1-based) on `transcript_id`.
    ///
    /// Unknown transcripts, malformed annotations and coordinates outside the
    /// coding sequence all yield `None`.
    pub fn map(&self, coordinate: u64, transcript_id: &str) -> Option<CodingPosition> {
        match self.try_map(coordinate, transcript_id) {
            Ok(position) => Some(position),
            Err(err) => {
                log::debug!("no mapping: {err}");
                None
            }
        }
    }

    /// Maps a batch of `(coordinate, transcript_id)` queries.
    ///
    /// Results come back in query order. Queries run in parallel when the
    /// `rayon` feature is enabled.
    pub fn map_all<S>(&self, queries: &[(u64, S)]) -> Vec<Option<CodingPosition>>
    where
        S: AsRef<str> + Sync,
    {
        #[cfg(feature = "rayon")]
        {
            return queries
                .par_iter()
                .map(|(coordinate, id)| self.map(*coordinate, id.as_ref()))
                .collect();
        }

        #[cfg(not(feature = "rayon"))]
        {
            queries
                .iter()
                .map(|(coordinate, id)| self.map(*coordinate, id.as_ref()))
                .collect()
        }
    }
}
