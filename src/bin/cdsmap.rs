//! Map a genomic coordinate to CDS and amino-acid positions of a RefSeq transcript.
//!
//! # Usage
//!
//! ```bash
//! Usage: cdsmap [OPTIONS] <TRANSCRIPT_ID> <COORDINATE> <ANNOTATION>
//!
//! Arguments:
//!   <TRANSCRIPT_ID>  RefSeq transcript identifier (e.g. NM_146145)
//!   <COORDINATE>     1-based genomic coordinate
//!   <ANNOTATION>     Path to the refFlat annotation table
//!
//! Options:
//!   -v, --verbose          Print labelled fields instead of two bare values
//!   -p, --prefix <PREFIX>  Only index transcripts whose identifier starts with this prefix [default: NM]
//!   -L, --level <LEVEL>    Logging verbosity level [default: warn] [possible values: trace, debug, info, warn, error]
//!   -h, --help             Print help
//!   -V, --version          Print version
//! ```

use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use log::Level;

use cdsmap::{AnnotationIndex, CodingPosition, IndexOptions, Mapper};

const ABSENT: &str = "None";

#[derive(Debug, Parser)]
#[command(
    name = "cdsmap",
    version,
    about = "Map a genomic coordinate to CDS and amino-acid positions of a RefSeq transcript"
)]
struct Args {
    /// RefSeq transcript identifier (e.g. NM_146145)
    #[arg(value_name = "TRANSCRIPT_ID")]
    transcript_id: String,

    /// 1-based genomic coordinate
    #[arg(value_name = "COORDINATE", allow_negative_numbers = true)]
    coordinate: i64,

    /// Path to the refFlat annotation table
    #[arg(value_name = "ANNOTATION", value_parser = check_file)]
    annotation: PathBuf,

    /// Print labelled fields instead of two bare values
    #[arg(short, long)]
    verbose: bool,

    /// Only index transcripts whose identifier starts with this prefix
    #[arg(short, long, default_value = "NM")]
    prefix: String,

    /// Logging verbosity level
    #[arg(short = 'L', long, value_enum, default_value_t = LogLevel::Warn)]
    level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::Trace,
            LogLevel::Debug => Level::Debug,
            LogLevel::Info => Level::Info,
            LogLevel::Warn => Level::Warn,
            LogLevel::Error => Level::Error,
        }
    }
}

/// Rejects annotation paths that do not exist before anything is read.
fn check_file(raw: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(raw);
    if !path.exists() {
        return Err(format!("ERROR: invalid file path '{raw}'"));
    }
    Ok(path)
}

fn main() {
    let args = Args::parse();

    if let Err(err) = simple_logger::init_with_level(args.level.into()) {
        eprintln!("ERROR: could not initialise logging: {err}");
    }

    let index = match AnnotationIndex::builder()
        .from_path(&args.annotation)
        .options(IndexOptions::new().id_prefix(args.prefix.as_str()))
        .build()
    {
        Ok(index) => index,
        Err(err) => {
            log::error!("failed to index {}: {err}", args.annotation.display());
            process::exit(1);
        }
    };

    let mapper = Mapper::new(index);
    let position = match u64::try_from(args.coordinate) {
        Ok(coordinate) => mapper.map(coordinate, &args.transcript_id),
        Err(_) => {
            log::debug!("coordinate {} is below 1", args.coordinate);
            None
        }
    };
    println!("{}", render(&args, position));
}

/// Formats a mapping the way it is printed on stdout.
fn render(args: &Args, position: Option<CodingPosition>) -> String {
    let (cds, aa) = match position {
        Some(position) => (position.cds().to_string(), position.aa().to_string()),
        None => (ABSENT.to_string(), ABSENT.to_string()),
    };

    if args.verbose {
        format!(
            "RefSeq ID: {}\nGenomic Coordinate: {}\nCDS Position: {cds}\nAmino Acid Position: {aa}",
            args.transcript_id, args.coordinate
        )
    } else {
        format!("{cds} {aa}")
    }
}
