//! # cdsmap
//!
//! Map a genomic coordinate to its position in the coding sequence (CDS) and
//! protein of a RefSeq transcript, using a UCSC refFlat annotation table.
//!
//! ## Overview
//!
//! The crate is split in three small pieces that only talk through
//! immutable data:
//!
//! - [`AnnotationIndex`]: reads a refFlat table once and keeps every
//!   transcript row keyed by its identifier (`NM_*` by default)
//! - [`GeneStructure`]: splices one transcript's exons, trims them to the
//!   CDS and lists every coding base in genomic order
//! - [`position::find`]: turns a coordinate into CDS and amino-acid
//!   positions, numbering from the 5' end of the transcript on either strand
//!
//! [`Mapper`] glues them together for single queries and batches.
//!
//! ## Features
//!
//! - **Strand aware:** minus-strand transcripts are numbered from their
//!   highest coding coordinate
//! - **Robust indexing:** malformed rows are logged and skipped instead of
//!   aborting the whole table
//! - **Compression support:** gzip, zstd and bzip2 tables, detected from the
//!   file extension
//! - **Memory mapping** and **parallel batches** behind feature flags
//!
//! ## Basic Usage
//!
//! ```rust,no_run,ignore
//! use cdsmap::Mapper;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mapper = Mapper::from_path("data/refFlatMm10.txt")?;
//!
//!     if let Some(position) = mapper.map(101153495, "NM_146145") {
//!         println!("CDS {} / AA {}", position.cds(), position.aa());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Knowing why a query failed
//!
//! [`Mapper::map`] answers `None` for unknown transcripts, malformed
//! annotations and coordinates outside the CDS alike. Use
//! [`Mapper::try_map`] to tell them apart:
//!
//! ```rust,no_run,ignore
//! use cdsmap::{MapError, Mapper};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mapper = Mapper::from_path("data/refFlatMm10.txt")?;
//!
//!     match mapper.try_map(101153494, "NM_146145") {
//!         Ok(position) => println!("{position}"),
//!         Err(MapError::CoordinateNotInCds { .. }) => println!("not coding"),
//!         Err(err) => eprintln!("{err}"),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuring the index
//!
//! ```rust,no_run,ignore
//! use cdsmap::{AnnotationIndex, Mapper, ReaderMode};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Enable the "mmap" feature in Cargo.toml
//!     let index = AnnotationIndex::builder()
//!         .from_path("data/refFlat.txt")
//!         .id_prefix("XM")
//!         .mode(ReaderMode::Mmap)
//!         .build()?;
//!
//!     let mapper = Mapper::new(index);
//!     let answers = mapper.map_all(&[(101153495, "XM_000001"), (42, "XM_000002")]);
//!     println!("{answers:?}");
//!
//!     Ok(())
//! }
//! ```
//!
//! ## refFlat Format Reference
//!
//! | Column | Name | Used for |
//! |--------|------|----------|
//! | 1  | geneName   | |
//! | 2  | name       | transcript identifier |
//! | 3  | chrom      | |
//! | 4  | strand     | numbering direction |
//! | 5  | txStart    | |
//! | 6  | txEnd      | |
//! | 7  | cdsStart   | CDS trimming (0-based) |
//! | 8  | cdsEnd     | CDS trimming |
//! | 9  | exonCount  | |
//! | 10 | exonStarts | splicing (trailing comma allowed) |
//! | 11 | exonEnds   | splicing (trailing comma allowed) |
//!
//! ## Feature Flags
//!
//! - `cli`: build the `cdsmap` binary (adds `clap` and `simple_logger`)
//! - `compression`/`gzip`, `zstd`, `bz2`: read compressed tables
//! - `mmap`: memory-mapped index builds (adds `memmap2`)
//! - `rayon`: parallel [`Mapper::map_all`] (adds `rayon`)

#![cfg_attr(doc, warn(missing_docs))]

pub mod index;
pub mod mapper;
pub mod position;
pub mod reader;
pub mod record;
pub mod strand;
pub mod structure;

pub use index::AnnotationIndex;
pub use mapper::{MapError, MapResult, Mapper};
pub use position::CodingPosition;
#[cfg(any(feature = "gzip", feature = "zstd", feature = "bz2"))]
pub use reader::Compression;
pub use reader::{IndexBuilder, IndexOptions, ReaderError, ReaderMode, ReaderResult};
pub use record::AnnotationRecord;
pub use strand::Strand;
pub use structure::GeneStructure;
