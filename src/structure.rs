use crate::mapper::{MapError, MapResult};
use crate::record::AnnotationRecord;
use crate::strand::Strand;

const CDS_START: &str = "cdsStart";
const CDS_END: &str = "cdsEnd";
const EXON_STARTS: &str = "exonStarts";
const EXON_ENDS: &str = "exonEnds";

/// The spliced coding sequence of one transcript.
///
/// `coding_positions` holds one 1-based genomic coordinate per coding base,
/// in ascending genomic order for both strands. The strand only changes how
/// an index into this list is numbered, see [`find`](crate::position::find).
///
/// The number of positions is always a non-zero multiple of three.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneStructure {
    transcript_id: String,
    coding_positions: Vec<u64>,
    strand: Strand,
}

impl GeneStructure {
    /// Builds the coding structure of an annotation record.
    ///
    /// Exons lying entirely before `cdsStart` or after `cdsEnd` are dropped,
    /// the first and last remaining exons are clamped to the CDS bounds, and
    /// every remaining half-open exon `[start, end)` contributes the
    /// positions `start + 1 ..= end`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::MalformedAnnotation`] if a column cannot be
    /// parsed, the exon lists are inconsistent, no exon overlaps the CDS, the
    /// coding length is not a multiple of three or cannot be allocated.
    ///
    /// # Example
    ///
    /// ```
    /// use cdsmap::{AnnotationRecord, GeneStructure};
    ///
    /// let fields = [
    ///     "Gene1", "NM_000001", "chr1", "+", "50", "300",
    ///     "99", "203", "2", "50,200,", "102,300,",
    /// ];
    /// let record = AnnotationRecord::from_fields(&fields).unwrap();
    /// let structure = GeneStructure::build(&record).unwrap();
    ///
    /// assert_eq!(structure.coding_positions(), &[100, 101, 102, 201, 202, 203]);
    /// ```
    pub fn build(record: &AnnotationRecord) -> MapResult<Self> {
        let id = record.transcript_id();
        let strand = Strand::parse(record.strand(), id)?;

        let cds_start = __to_u64(record.cds_start(), id, CDS_START)?;
        let cds_end = __to_u64(record.cds_end(), id, CDS_END)?;
        if cds_start > cds_end {
            return Err(MapError::malformed(
                id,
                format!("ERROR: {CDS_START} {cds_start} is past {CDS_END} {cds_end}"),
            ));
        }

        let starts = __parse_coords(record.exon_starts(), id, EXON_STARTS)?;
        let ends = __parse_coords(record.exon_ends(), id, EXON_ENDS)?;
        validate_exons(&starts, &ends, id)?;

        let (lo, hi) = coding_bounds(&starts, &ends, cds_start, cds_end);
        if lo == hi {
            return Err(MapError::malformed(
                id,
                format!("ERROR: no exon overlaps the CDS [{cds_start}, {cds_end})"),
            ));
        }

        let coding_exons: Vec<(u64, u64)> = (lo..hi)
            .map(|i| {
                let start = if i == lo {
                    starts[i].max(cds_start)
                } else {
                    starts[i]
                };
                let end = if i == hi - 1 {
                    ends[i].min(cds_end)
                } else {
                    ends[i]
                };
                (start, end)
            })
            .collect();

        let length: u64 = coding_exons.iter().map(|(start, end)| end - start).sum();
        if length == 0 {
            return Err(MapError::malformed(id, "ERROR: empty coding sequence"));
        }
        if length % 3 != 0 {
            return Err(MapError::malformed(
                id,
                format!("ERROR: coding length {length} is not a multiple of 3"),
            ));
        }

        let mut coding_positions: Vec<u64> = Vec::new();
        usize::try_from(length)
            .ok()
            .and_then(|capacity| coding_positions.try_reserve_exact(capacity).ok())
            .ok_or_else(|| {
                MapError::malformed(id, format!("ERROR: coding length {length} is too large"))
            })?;
        for (start, end) in coding_exons {
            coding_positions.extend(start + 1..=end);
        }

        Ok(Self {
            transcript_id: id.to_string(),
            coding_positions,
            strand,
        })
    }

    /// Returns the identifier of the transcript this structure was built from.
    #[inline]
    pub fn transcript_id(&self) -> &str {
        &self.transcript_id
    }

    /// Returns the 1-based genomic coordinates of every coding base.
    #[inline]
    pub fn coding_positions(&self) -> &[u64] {
        &self.coding_positions
    }

    /// Returns the strand of the transcript.
    #[inline]
    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Returns the coding length in bases.
    #[inline]
    pub fn len(&self) -> usize {
        self.coding_positions.len()
    }

    /// Always `false` for a built structure.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coding_positions.is_empty()
    }

    /// Returns the number of codons.
    #[inline]
    pub fn codon_count(&self) -> usize {
        self.coding_positions.len() / 3
    }
}

/// Returns the `[lo, hi)` range of exons that are not entirely outside the CDS.
fn coding_bounds(starts: &[u64], ends: &[u64], cds_start: u64, cds_end: u64) -> (usize, usize) {
    let mut lo = 0;
    let mut hi = starts.len();

    while lo < hi && ends[lo] < cds_start {
        lo += 1;
    }
    while hi > lo && starts[hi - 1] > cds_end {
        hi -= 1;
    }

    (lo, hi)
}

/// Checks that exon lists pair up into ascending, non-overlapping intervals.
fn validate_exons(starts: &[u64], ends: &[u64], id: &str) -> MapResult<()> {
    if starts.len() != ends.len() {
        return Err(MapError::malformed(
            id,
            format!(
                "ERROR: {} {EXON_STARTS} but {} {EXON_ENDS}",
                starts.len(),
                ends.len()
            ),
        ));
    }

    let mut previous_end = 0;
    for (i, (&start, &end)) in starts.iter().zip(ends).enumerate() {
        if start >= end {
            return Err(MapError::malformed(
                id,
                format!("ERROR: exon {i} has start {start} >= end {end}"),
            ));
        }
        if start < previous_end {
            return Err(MapError::malformed(
                id,
                format!("ERROR: exon {i} starts at {start} before the previous exon ends"),
            ));
        }
        previous_end = end;
    }

    Ok(())
}

/// Parses a coordinate column to a u64
fn __to_u64(field: &str, id: &str, label: &'static str) -> MapResult<u64> {
    field.parse::<u64>().map_err(|_| {
        MapError::malformed(
            id,
            format!("ERROR: expected unsigned integer, got '{field}' in {label}"),
        )
    })
}

/// Parses a comma-separated coordinate list, allowing one trailing comma
fn __parse_coords(list: &str, id: &str, label: &'static str) -> MapResult<Vec<u64>> {
    let list = list.strip_suffix(',').unwrap_or(list);
    if list.is_empty() {
        return Err(MapError::malformed(id, format!("ERROR: empty {label}")));
    }

    list.split(',')
        .map(|item| {
            item.parse::<u64>().map_err(|_| {
                MapError::malformed(
                    id,
                    format!("ERROR: failed to parse '{item}' as unsigned integer in {label}"),
                )
            })
        })
        .collect()
}
