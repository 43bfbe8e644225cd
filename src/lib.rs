//! A small toolbox for FASTA files: reading (also from gzip, tar, tar.gz and
//! zip files), writing, translation to amino acids, reverse complement and
//! alphabet validation.
//!
//! # Reading
//!
//! [`read()`](read) opens a file and returns a lazy iterator of
//! [`SeqRecord`](SeqRecord)s. Records are parsed while iterating, so files
//! larger than memory can be processed. Sequence bodies are converted to
//! uppercase by default, [`ReaderBuilder`](ReaderBuilder) allows changing
//! this. [`read_seqs()`](read_seqs) only returns the sequence bodies.
//!
//! ```no_run
//! for result in fasta_kit::read("seqs.fasta.gz")? {
//!     let record = result?;
//!     println!("{}: {} residues", record.id(), record.len());
//! }
//! # Ok::<(), fasta_kit::Error>(())
//! ```
//!
//! Archives with several members are read member after member, the records
//! are returned in the order of their appearance.
//!
//! # Parsing rules
//!
//! * Leading and trailing whitespace (including `\r`) is removed from every
//!   line, empty lines are ignored.
//! * A line starting with `>` starts a new record, all other lines are
//!   appended to the sequence of the current record.
//! * Content before the first header of a stream is ignored; streams without
//!   any header do not produce records.
//! * A header followed directly by another header (or the end of the input)
//!   results in a record with an empty sequence.
//! * Input has to be valid UTF-8, otherwise
//!   [`ErrorKind::Decoding`](ErrorKind::Decoding) is returned for the
//!   offending line. Records returned before stay valid.
//!
//! # Writing
//!
//! [`write()`](write()) and [`append()`](append) write records to a file,
//! wrapping the sequence at 70 characters. The functions in the
//! [`write`](mod@write) module write to any `io::Write`.
//!
//! ```no_run
//! use fasta_kit::SeqRecord;
//!
//! let mut rec = SeqRecord::new("seq1", "CGGCCTTCTATCTTCTTC");
//! rec.to_rev_comp();
//! fasta_kit::write("out.fasta", &[rec])?;
//! # Ok::<(), fasta_kit::Error>(())
//! ```
//!
//! # Transforms
//!
//! [`translate()`](translate()) and [`reverse_complement()`](reverse_complement)
//! work on plain strings, [`SeqRecord`](SeqRecord) offers in-place
//! variants. Both accept custom tables; the standard tables are shared and
//! cannot be modified. Unknown codons are translated to `~`, characters
//! without complement are kept.
//!
//! ```
//! use fasta_kit::{reverse_complement, translate, CodonTable, ComplementTable};
//!
//! assert_eq!(translate("CGGCCTTCTATCTTCTTC", CodonTable::standard()), "RPSIFF");
//! assert_eq!(reverse_complement("ACCGN", ComplementTable::standard()), "NCGGT");
//! ```

use std::borrow::Borrow;
use std::io;
use std::path::Path;

macro_rules! try_opt {
    ($expr: expr) => {
        match $expr {
            Ok(item) => item,
            Err(e) => return Some(Err(::std::convert::From::from(e))),
        }
    };
}

pub mod alphabet;
pub mod container;
mod error;
mod position;
mod reader;
mod record;
pub mod revcomp;
pub mod translate;
pub mod write;

pub use crate::alphabet::AlphabetKind;
pub use crate::error::*;
pub use crate::position::*;
pub use crate::reader::*;
pub use crate::record::*;
pub use crate::revcomp::{reverse_complement, ComplementTable};
pub use crate::translate::{translate, CodonTable};
pub use crate::write::{WriteMode, LINE_WIDTH};

/// Opens a FASTA file and returns a lazy iterator of records with
/// uppercase sequences.
///
/// Returns [`ErrorKind::NotFound`](ErrorKind::NotFound) if `path` is not
/// a file.
#[inline]
pub fn read<P: AsRef<Path>>(path: P) -> Result<PathReader> {
    ReaderBuilder::new().from_path(path)
}

/// Like [`read()`](read), but only returns the sequence bodies.
#[inline]
pub fn read_seqs<P: AsRef<Path>>(path: P) -> Result<Seqs<container::Members, container::Stream>> {
    read(path).map(Reader::into_seqs)
}

/// Writes records to a file, replacing its contents.
///
/// A single record can be passed as `Some(&record)` or `[&record]`.
#[inline]
pub fn write<P, I, R>(path: P, records: I) -> Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = R>,
    R: Borrow<SeqRecord>,
{
    write::write_path(path, records, WriteMode::Overwrite)
}

/// Appends records to a file, which is created if not existing.
#[inline]
pub fn append<P, I, R>(path: P, records: I) -> Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = R>,
    R: Borrow<SeqRecord>,
{
    write::write_path(path, records, WriteMode::Append)
}

/// Prints records to `stdout`.
pub fn print_fasta<I, R>(records: I) -> Result<()>
where
    I: IntoIterator<Item = R>,
    R: Borrow<SeqRecord>,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_to(&mut out, records)
}

/// Writes the text rendering of each record followed by a newline.
pub fn print_to<W, I, R>(writer: W, records: I) -> Result<()>
where
    W: io::Write,
    I: IntoIterator<Item = R>,
    R: Borrow<SeqRecord>,
{
    write::write_records(writer, records).map_err(Error::write)
}
