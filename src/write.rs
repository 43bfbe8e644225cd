//! FASTA writing
//!
//! Records are written as the header line followed by the body, wrapped at
//! [`LINE_WIDTH`](LINE_WIDTH) characters. Every line, including the last
//! one, is terminated by `\n`; records are not separated by blank lines.
//! An empty body results in the header line only.
//!
//! The helper functions write data that is not necessarily stored in a
//! [`SeqRecord`](crate::SeqRecord) and accept any line width.

use std::borrow::Borrow;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::record::{SeqRecord, HEADER_MARKER};

/// Width of body lines in written FASTA
pub const LINE_WIDTH: usize = 70;

/// Whether [`write_path`](write_path) replaces or extends existing files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    #[default]
    Overwrite,
    Append,
}

/// Writes a header and a sequence, wrapping the sequence at 70 characters.
#[inline]
pub fn write_to<W>(writer: W, head: &str, seq: &str) -> io::Result<()>
where
    W: io::Write,
{
    write_wrap(writer, head, seq, LINE_WIDTH)
}

/// Writes a header and a sequence. Wraps the sequence to produce multi-line
/// FASTA with a maximum width specified by the `wrap` parameter.
#[inline]
pub fn write_wrap<W>(mut writer: W, head: &str, seq: &str, wrap: usize) -> io::Result<()>
where
    W: io::Write,
{
    write_head(&mut writer, head)?;
    write_wrap_seq(writer, seq, wrap)
}

/// Writes only the header line. `>` is prepended if not present.
#[inline]
pub fn write_head<W>(mut writer: W, head: &str) -> io::Result<()>
where
    W: io::Write,
{
    if !head.starts_with(HEADER_MARKER) {
        writer.write_all(b">")?;
    }
    writer.write_all(head.as_bytes())?;
    writer.write_all(b"\n")
}

/// Writes the sequence, wrapped to a maximum width (in characters)
/// specified by `wrap`.
#[inline]
pub fn write_wrap_seq<W>(mut writer: W, seq: &str, wrap: usize) -> io::Result<()>
where
    W: io::Write,
{
    for line in wrap_lines(seq, wrap) {
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Writes all records in order.
pub fn write_records<W, I, R>(mut writer: W, records: I) -> io::Result<()>
where
    W: io::Write,
    I: IntoIterator<Item = R>,
    R: Borrow<SeqRecord>,
{
    for rec in records {
        rec.borrow().write(&mut writer)?;
    }
    Ok(())
}

/// Writes records to a file, either truncating it first
/// or appending to it. Missing files are created.
///
/// Any failure is returned as [`ErrorKind::Write`](crate::ErrorKind::Write);
/// the file may be left incomplete.
pub fn write_path<P, I, R>(path: P, records: I, mode: WriteMode) -> Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = R>,
    R: Borrow<SeqRecord>,
{
    let path = path.as_ref();
    debug!("writing FASTA to '{}' ({:?})", path.display(), mode);
    let mut opts = OpenOptions::new();
    match mode {
        WriteMode::Overwrite => opts.write(true).truncate(true),
        WriteMode::Append => opts.append(true),
    };
    let file = opts.create(true).open(path).map_err(Error::write)?;
    let mut writer = BufWriter::new(file);
    write_records(&mut writer, records).map_err(Error::write)?;
    writer.flush().map_err(Error::write)
}

/// Splits `seq` into lines of at most `wrap` characters.
///
/// Panics if `wrap` is zero.
#[inline]
pub fn wrap_lines(seq: &str, wrap: usize) -> WrapLines {
    assert!(wrap > 0);
    WrapLines { rest: seq, wrap }
}

/// Iterator over the wrapped lines of a sequence
#[derive(Debug, Clone)]
pub struct WrapLines<'a> {
    rest: &'a str,
    wrap: usize,
}

impl<'a> Iterator for WrapLines<'a> {
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let end = self
            .rest
            .char_indices()
            .nth(self.wrap)
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());
        let (line, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap() {
        let lines: Vec<_> = wrap_lines("ACGTACGTAC", 4).collect();
        assert_eq!(lines, vec!["ACGT", "ACGT", "AC"]);
        let lines: Vec<_> = wrap_lines("ACGT", 4).collect();
        assert_eq!(lines, vec!["ACGT"]);
        assert_eq!(wrap_lines("", 4).count(), 0);
    }

    #[test]
    fn wrap_multibyte() {
        let lines: Vec<_> = wrap_lines("äöüß", 3).collect();
        assert_eq!(lines, vec!["äöü", "ß"]);
    }

    #[test]
    #[should_panic]
    fn wrap_zero() {
        wrap_lines("A", 0);
    }

    #[test]
    fn head() {
        let mut out = vec![];
        write_head(&mut out, "id desc").unwrap();
        write_head(&mut out, ">id2").unwrap();
        assert_eq!(&out[..], b">id desc\n>id2\n");
    }

    #[test]
    fn exact_width() {
        let seq = "C".repeat(140);
        let mut out = vec![];
        write_to(&mut out, ">id", &seq).unwrap();
        let exp = format!(">id\n{}\n{}\n", "C".repeat(70), "C".repeat(70));
        assert_eq!(String::from_utf8(out).unwrap(), exp);
    }

    #[test]
    fn records() {
        let recs = vec![SeqRecord::new("a", "AC"), SeqRecord::new("b", "")];
        let mut out = vec![];
        write_records(&mut out, &recs).unwrap();
        assert_eq!(&out[..], b">a\nAC\n>b\n");
    }

    struct Failing {
        budget: usize,
    }

    impl io::Write for Failing {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.budget == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            let n = buf.len().min(self.budget);
            self.budget -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failure_propagates() {
        let recs = vec![SeqRecord::new("a", "ACGT"), SeqRecord::new("b", "ACGT")];
        let res = write_records(Failing { budget: 5 }, &recs);
        assert_eq!(res.unwrap_err().kind(), io::ErrorKind::Other);
    }
}
