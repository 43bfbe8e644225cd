use memchr::memchr;
use std::fmt;
use std::io;
use std::path::Path;
use std::str::Chars;

use crate::alphabet::{self, AlphabetKind};
use crate::error::Result;
use crate::revcomp::{reverse_complement, ComplementTable};
use crate::translate::{translate, CodonTable};
use crate::write::{write_path, write_wrap, wrap_lines, WriteMode, LINE_WIDTH};
use serde_derive::{Deserialize, Serialize};

/// Marks the start of a header line
pub const HEADER_MARKER: char = '>';

/// Operations shared by everything that holds a sequence body:
/// [`SeqRecord`](SeqRecord), as well as plain `str` / `String` bodies
/// as returned by [`Reader::into_seqs()`](crate::Reader::into_seqs).
pub trait Sequence {
    /// Returns the sequence body.
    fn seq(&self) -> &str;

    /// Number of characters in the body.
    #[inline]
    fn seq_len(&self) -> usize {
        self.seq().chars().count()
    }

    /// Iterates over the characters of the body. Every call starts a new
    /// iteration from the beginning.
    #[inline]
    fn residues(&self) -> Chars {
        self.seq().chars()
    }

    /// Compares the bodies only.
    #[inline]
    fn seq_eq<S: Sequence + ?Sized>(&self, other: &S) -> bool {
        self.seq() == other.seq()
    }

    /// Returns the amino acid translation of the body.
    #[inline]
    fn translated(&self, table: &CodonTable) -> String {
        translate(self.seq(), table)
    }

    /// Returns the reverse complement of the body.
    #[inline]
    fn rev_comp(&self, table: &ComplementTable) -> String {
        reverse_complement(self.seq(), table)
    }

    /// See [`SeqRecord::valid`](SeqRecord::valid); the kind has to be
    /// supplied here.
    #[inline]
    fn is_valid_for(&self, kind: AlphabetKind, allowed: Option<&str>) -> bool {
        alphabet::is_valid(self.seq(), kind, allowed)
    }
}

impl Sequence for str {
    #[inline]
    fn seq(&self) -> &str {
        self
    }
}

impl Sequence for String {
    #[inline]
    fn seq(&self) -> &str {
        self.as_str()
    }
}

impl<'a, S: Sequence + ?Sized> Sequence for &'a S {
    #[inline]
    fn seq(&self) -> &str {
        (**self).seq()
    }
}

/// A FASTA record: header line, sequence body and the declared
/// alphabet kind.
///
/// The header always starts with `>`, which is prepended if missing.
/// Two records are equal if their bodies are equal, headers and alphabet
/// kinds are not compared.
///
/// ```
/// use fasta_kit::SeqRecord;
///
/// let mut rec = SeqRecord::new("Atlantic dolphin", "CGGCCTTCTATCTTCTTC");
/// assert_eq!(rec.head(), ">Atlantic dolphin");
/// assert_eq!(rec.len(), 18);
///
/// rec.to_amino();
/// assert_eq!(rec.seq(), "RPSIFF");
/// assert_eq!(rec.to_string(), ">Atlantic dolphin\nRPSIFF");
/// ```
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(from = "RawSeqRecord")]
pub struct SeqRecord {
    head: String,
    seq: String,
    kind: AlphabetKind,
}

/// Deserialized fields, normalized by [`SeqRecord::with_kind`](SeqRecord::with_kind)
#[derive(Deserialize)]
struct RawSeqRecord {
    head: String,
    seq: String,
    #[serde(default)]
    kind: AlphabetKind,
}

impl From<RawSeqRecord> for SeqRecord {
    #[inline]
    fn from(raw: RawSeqRecord) -> Self {
        SeqRecord::with_kind(raw.head, raw.seq, raw.kind)
    }
}

impl SeqRecord {
    /// Creates a record of kind [`AlphabetKind::Any`](AlphabetKind::Any).
    pub fn new<H, S>(head: H, seq: S) -> Self
    where
        H: Into<String>,
        S: Into<String>,
    {
        Self::with_kind(head, seq, AlphabetKind::Any)
    }

    pub fn with_kind<H, S>(head: H, seq: S, kind: AlphabetKind) -> Self
    where
        H: Into<String>,
        S: Into<String>,
    {
        let mut head = head.into();
        if !head.starts_with(HEADER_MARKER) {
            head.insert(0, HEADER_MARKER);
        }
        SeqRecord {
            head,
            seq: seq.into(),
            kind,
        }
    }

    /// Creates a record with the alphabet kind given as token
    /// (`na`, `dna`, `rna`, `prot` or `any`, case-insensitive).
    ///
    /// ```
    /// use fasta_kit::{AlphabetKind, SeqRecord};
    ///
    /// let rec = SeqRecord::try_new("id", "ACGT", "DNA").unwrap();
    /// assert_eq!(rec.kind(), AlphabetKind::Dna);
    /// assert!(SeqRecord::try_new("id", "ACGT", "amino").is_err());
    /// ```
    pub fn try_new<H, S>(head: H, seq: S, kind: &str) -> Result<Self>
    where
        H: Into<String>,
        S: Into<String>,
    {
        let kind = kind.parse()?;
        Ok(Self::with_kind(head, seq, kind))
    }

    /// Returns the header line including the leading `>`.
    #[inline]
    pub fn head(&self) -> &str {
        &self.head
    }

    #[inline]
    pub fn seq(&self) -> &str {
        &self.seq
    }

    /// Returns the record ID (the header after `>` up to the first space).
    #[inline]
    pub fn id(&self) -> &str {
        header_id(&self.head)
    }

    /// Returns the description (everything after the first space
    /// of the header), if present.
    #[inline]
    pub fn desc(&self) -> Option<&str> {
        let head = self.head.strip_prefix(HEADER_MARKER).unwrap_or(&self.head);
        memchr(b' ', head.as_bytes()).map(|pos| &head[pos + 1..])
    }

    #[inline]
    pub fn kind(&self) -> AlphabetKind {
        self.kind
    }

    #[inline]
    pub fn set_kind(&mut self, kind: AlphabetKind) {
        self.kind = kind;
    }

    /// Number of characters in the body.
    #[inline]
    pub fn len(&self) -> usize {
        self.seq.chars().count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// Iterates over the characters of the body.
    #[inline]
    pub fn iter(&self) -> Chars {
        self.seq.chars()
    }

    /// Checks whether the body is valid for the alphabet kind of the record.
    ///
    /// Bodies of 250 000 or more characters are always invalid. Otherwise,
    /// every character of the body has to be contained in `allowed`, or in
    /// the character set of the alphabet kind if `allowed` is `None` or
    /// empty. Without `allowed`, [`AlphabetKind::Any`](AlphabetKind::Any)
    /// accepts everything.
    /// Comparison is case-sensitive.
    ///
    /// ```
    /// use fasta_kit::{AlphabetKind, SeqRecord};
    ///
    /// let rec = SeqRecord::with_kind("id", "ACGU", AlphabetKind::Dna);
    /// assert!(!rec.valid(None));
    /// assert!(rec.valid(Some("ACGU")));
    /// ```
    #[inline]
    pub fn valid(&self, allowed: Option<&str>) -> bool {
        alphabet::is_valid(&self.seq, self.kind, allowed)
    }

    /// Translates the body in place using the standard genetic code.
    #[inline]
    pub fn to_amino(&mut self) {
        self.to_amino_with(CodonTable::standard())
    }

    /// Translates the body in place using `table`.
    pub fn to_amino_with(&mut self, table: &CodonTable) {
        self.seq = translate(&self.seq, table);
    }

    /// Replaces the body with its reverse complement (IUPAC rules).
    #[inline]
    pub fn to_rev_comp(&mut self) {
        self.to_rev_comp_with(ComplementTable::standard())
    }

    pub fn to_rev_comp_with(&mut self, table: &ComplementTable) {
        self.seq = reverse_complement(&self.seq, table);
    }

    /// Writes the record, wrapping the body at 70 characters.
    #[inline]
    pub fn write<W: io::Write>(&self, writer: W) -> io::Result<()> {
        write_wrap(writer, &self.head, &self.seq, LINE_WIDTH)
    }

    /// Writes the record to a file, either replacing its contents or
    /// appending to it.
    pub fn write_path<P: AsRef<Path>>(&self, path: P, mode: WriteMode) -> Result<()> {
        write_path(path, Some(self), mode)
    }

    /// Returns header, body and alphabet kind.
    pub fn into_parts(self) -> (String, String, AlphabetKind) {
        (self.head, self.seq, self.kind)
    }
}

impl PartialEq for SeqRecord {
    #[inline]
    fn eq(&self, other: &SeqRecord) -> bool {
        self.seq == other.seq
    }
}

impl Sequence for SeqRecord {
    #[inline]
    fn seq(&self) -> &str {
        &self.seq
    }
}

impl<'a> IntoIterator for &'a SeqRecord {
    type Item = char;
    type IntoIter = Chars<'a>;

    #[inline]
    fn into_iter(self) -> Chars<'a> {
        self.iter()
    }
}

/// The header line followed by the body wrapped at 70 characters.
/// There is no newline after the last line.
impl fmt::Display for SeqRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.head)?;
        for line in wrap_lines(&self.seq, LINE_WIDTH) {
            f.write_str("\n")?;
            f.write_str(line)?;
        }
        Ok(())
    }
}

/// ID part of a header line, with or without the leading `>`.
#[inline]
pub(crate) fn header_id(head: &str) -> &str {
    let head = head.strip_prefix(HEADER_MARKER).unwrap_or(head);
    match memchr(b' ', head.as_bytes()) {
        Some(pos) => &head[..pos],
        None => head,
    }
}
