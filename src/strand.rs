use std::fmt;

use crate::mapper::{MapError, MapResult};

/// Represents the strand of a transcript.
///
/// The strand decides the direction in which CDS and amino-acid positions are
/// numbered over the (always ascending) list of genomic coding positions.
///
/// # Example
///
/// ```
/// use cdsmap::strand::Strand;
///
/// let strand = Strand::Forward;
/// assert_eq!(strand.to_string(), "+");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    /// Positive strand (`+`).
    Forward,
    /// Negative strand (`-`).
    Reverse,
    /// Unknown strand (`.` or `?`).
    Unknown,
}

impl Strand {
    /// Parses the strand column of an annotation record.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::MalformedAnnotation`] if the text is not one of
    /// `+`, `-`, `.` or `?`.
    pub(crate) fn parse(raw: &str, transcript: &str) -> MapResult<Self> {
        match raw {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            "." | "?" => Ok(Strand::Unknown),
            other => Err(MapError::malformed(
                transcript,
                format!("ERROR: expected '+', '-', '.', or '?', got '{other}' in strand"),
            )),
        }
    }

    /// Returns `true` for `+` and `-`.
    #[inline]
    pub fn is_known(&self) -> bool {
        !matches!(self, Strand::Unknown)
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Forward => f.write_str("+"),
            Strand::Reverse => f.write_str("-"),
            Strand::Unknown => f.write_str("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_and_unknown_strands() {
        assert_eq!(Strand::parse("+", "NM_1").unwrap(), Strand::Forward);
        assert_eq!(Strand::parse("-", "NM_1").unwrap(), Strand::Reverse);
        assert_eq!(Strand::parse("?", "NM_1").unwrap(), Strand::Unknown);
        assert!(!Strand::parse(".", "NM_1").unwrap().is_known());
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = Strand::parse("plus", "NM_1").unwrap_err();
        assert!(matches!(err, MapError::MalformedAnnotation { .. }));
        assert!(err.to_string().contains("NM_1"));
    }
}
