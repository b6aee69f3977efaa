/// Number of columns in a refFlat row.
pub const FIELD_COUNT: usize = 11;

/// Column holding the transcript identifier.
pub(crate) const ID_COLUMN: usize = 1;

/// One row of a refFlat annotation table.
///
/// Columns are kept as the raw text found in the file. Numeric columns are
/// only interpreted when a [`GeneStructure`](crate::GeneStructure) is built,
/// so a malformed row costs nothing until it is queried.
///
/// # Example
///
/// ```
/// use cdsmap::AnnotationRecord;
///
/// let fields = [
///     "Gene1", "NM_000001", "chr1", "+", "99", "200",
///     "99", "105", "1", "99,", "200,",
/// ];
/// let record = AnnotationRecord::from_fields(&fields).unwrap();
/// assert_eq!(record.transcript_id(), "NM_000001");
/// assert_eq!(record.cds_start(), "99");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRecord {
    gene_name: String,
    transcript_id: String,
    chrom: String,
    strand: String,
    tx_start: String,
    tx_end: String,
    cds_start: String,
    cds_end: String,
    exon_count: String,
    exon_starts: String,
    exon_ends: String,
}

impl AnnotationRecord {
    /// Creates a record from the columns of a refFlat row.
    ///
    /// Returns `None` if fewer than [`FIELD_COUNT`] columns are given. Any
    /// columns past the eleventh are ignored.
    pub fn from_fields(fields: &[&str]) -> Option<Self> {
        if fields.len() < FIELD_COUNT {
            return None;
        }

        Some(Self {
            gene_name: fields[0].to_string(),
            transcript_id: fields[ID_COLUMN].to_string(),
            chrom: fields[2].to_string(),
            strand: fields[3].to_string(),
            tx_start: fields[4].to_string(),
            tx_end: fields[5].to_string(),
            cds_start: fields[6].to_string(),
            cds_end: fields[7].to_string(),
            exon_count: fields[8].to_string(),
            exon_starts: fields[9].to_string(),
            exon_ends: fields[10].to_string(),
        })
    }

    /// Returns the gene name.
    #[inline]
    pub fn gene_name(&self) -> &str {
        &self.gene_name
    }

    /// Returns the transcript identifier.
    #[inline]
    pub fn transcript_id(&self) -> &str {
        &self.transcript_id
    }

    /// Returns the chromosome name.
    #[inline]
    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    /// Returns the raw strand column.
    #[inline]
    pub fn strand(&self) -> &str {
        &self.strand
    }

    /// Returns the raw transcription start (0-based).
    #[inline]
    pub fn tx_start(&self) -> &str {
        &self.tx_start
    }

    /// Returns the raw transcription end.
    #[inline]
    pub fn tx_end(&self) -> &str {
        &self.tx_end
    }

    /// Returns the raw coding start (0-based).
    #[inline]
    pub fn cds_start(&self) -> &str {
        &self.cds_start
    }

    /// Returns the raw coding end.
    #[inline]
    pub fn cds_end(&self) -> &str {
        &self.cds_end
    }

    /// Returns the raw exon count.
    #[inline]
    pub fn exon_count(&self) -> &str {
        &self.exon_count
    }

    /// Returns the raw comma-separated exon starts.
    #[inline]
    pub fn exon_starts(&self) -> &str {
        &self.exon_starts
    }

    /// Returns the raw comma-separated exon ends.
    #[inline]
    pub fn exon_ends(&self) -> &str {
        &self.exon_ends
    }
}
