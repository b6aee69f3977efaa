use std::fmt;

use crate::mapper::{MapError, MapResult};
use crate::strand::Strand;
use crate::structure::GeneStructure;

/// A coding position: 1-based CDS base and 1-based codon (amino acid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodingPosition {
    cds: u64,
    aa: u64,
}

impl CodingPosition {
    /// Returns the 1-based position within the coding sequence.
    #[inline]
    pub fn cds(&self) -> u64 {
        self.cds
    }

    /// Returns the 1-based amino-acid position.
    #[inline]
    pub fn aa(&self) -> u64 {
        self.aa
    }
}

impl fmt::Display for CodingPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.cds, self.aa)
    }
}

impl From<CodingPosition> for (u64, u64) {
    fn from(position: CodingPosition) -> Self {
        (position.cds, position.aa)
    }
}

/// Locates a 1-based genomic coordinate in a coding structure.
///
/// On the `+` strand numbering runs with the genomic coordinates; on the `-`
/// strand it runs from the highest coding coordinate down.
///
/// # Errors
///
/// Returns [`MapError::CoordinateNotInCds`] if the coordinate is not a coding
/// base, and [`MapError::MalformedAnnotation`] if the strand is unknown.
///
/// # Example
///
/// ```
/// use cdsmap::{position, AnnotationRecord, GeneStructure};
///
/// let fields = [
///     "Gene1", "NM_000001", "chr1", "-", "99", "105",
///     "99", "105", "1", "99,", "105,",
/// ];
/// let record = AnnotationRecord::from_fields(&fields).unwrap();
/// let structure = GeneStructure::build(&record).unwrap();
///
/// let hit = position::find(&structure, 100).unwrap();
/// assert_eq!((hit.cds(), hit.aa()), (6, 2));
/// ```
pub fn find(structure: &GeneStructure, coordinate: u64) -> MapResult<CodingPosition> {
    let positions = structure.coding_positions();

    // ascending and duplicate-free by construction
    let idx = positions
        .binary_search(&coordinate)
        .map_err(|_| MapError::CoordinateNotInCds {
            transcript: structure.transcript_id().to_string(),
            coordinate,
        })? as u64;

    let strand = structure.strand();
    if !strand.is_known() {
        return Err(MapError::malformed(
            structure.transcript_id(),
            format!("ERROR: cannot number positions on strand '{strand}'"),
        ));
    }

    let cds = match strand {
        Strand::Forward => idx + 1,
        _ => positions.len() as u64 - idx,
    };
    Ok(CodingPosition {
        cds,
        aa: cds.div_ceil(3),
    })
}
