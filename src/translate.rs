//! Translation of nucleotide sequences to amino acids
//!
//! The reading frame starts at the first character, a trailing incomplete
//! codon is dropped. Codons missing from the table are translated to
//! [`UNKNOWN_AA`](UNKNOWN_AA) instead of raising an error.
//!
//! ```
//! use fasta_kit::translate::{translate, CodonTable};
//!
//! assert_eq!(translate("CGGCCTTCTATCTTCTTC", CodonTable::standard()), "RPSIFF");
//!
//! // Vertebrate mitochondrial code: TGA -> W, AGA / AGG -> stop
//! let mito = CodonTable::standard()
//!     .clone()
//!     .with("TGA", 'W')
//!     .with("AGA", '*')
//!     .with("AGG", '*');
//! assert_eq!(translate("TGAAGA", &mito), "W*");
//! ```

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::iter::FromIterator;

/// Emitted for codons that are not found in the table
pub const UNKNOWN_AA: char = '~';

/// Standard genetic code (NCBI translation table 1), ordered by codon.
#[rustfmt::skip]
const STANDARD_CODE: [(&str, char); 64] = [
    ("TTT", 'F'), ("TTC", 'F'), ("TTA", 'L'), ("TTG", 'L'),
    ("TCT", 'S'), ("TCC", 'S'), ("TCA", 'S'), ("TCG", 'S'),
    ("TAT", 'Y'), ("TAC", 'Y'), ("TAA", '*'), ("TAG", '*'),
    ("TGT", 'C'), ("TGC", 'C'), ("TGA", '*'), ("TGG", 'W'),
    ("CTT", 'L'), ("CTC", 'L'), ("CTA", 'L'), ("CTG", 'L'),
    ("CCT", 'P'), ("CCC", 'P'), ("CCA", 'P'), ("CCG", 'P'),
    ("CAT", 'H'), ("CAC", 'H'), ("CAA", 'Q'), ("CAG", 'Q'),
    ("CGT", 'R'), ("CGC", 'R'), ("CGA", 'R'), ("CGG", 'R'),
    ("ATT", 'I'), ("ATC", 'I'), ("ATA", 'I'), ("ATG", 'M'),
    ("ACT", 'T'), ("ACC", 'T'), ("ACA", 'T'), ("ACG", 'T'),
    ("AAT", 'N'), ("AAC", 'N'), ("AAA", 'K'), ("AAG", 'K'),
    ("AGT", 'S'), ("AGC", 'S'), ("AGA", 'R'), ("AGG", 'R'),
    ("GTT", 'V'), ("GTC", 'V'), ("GTA", 'V'), ("GTG", 'V'),
    ("GCT", 'A'), ("GCC", 'A'), ("GCA", 'A'), ("GCG", 'A'),
    ("GAT", 'D'), ("GAC", 'D'), ("GAA", 'E'), ("GAG", 'E'),
    ("GGT", 'G'), ("GGC", 'G'), ("GGA", 'G'), ("GGG", 'G'),
];

lazy_static! {
    static ref STANDARD: CodonTable = STANDARD_CODE.iter().cloned().collect();
}

/// Mapping of codons (three characters) to amino acid symbols.
///
/// The shared [`standard()`](CodonTable::standard) table cannot be modified;
/// custom tables are built with [`insert`](CodonTable::insert) or
/// [`with`](CodonTable::with), usually starting from a clone of the
/// standard table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodonTable {
    map: HashMap<[char; 3], char>,
}

impl CodonTable {
    /// Creates an empty table, which translates everything to `~`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the shared standard genetic code.
    #[inline]
    pub fn standard() -> &'static CodonTable {
        &STANDARD
    }

    /// Adds or replaces a codon. Returns `false` (and leaves the table
    /// unchanged) if `codon` does not consist of exactly three characters.
    pub fn insert(&mut self, codon: &str, aa: char) -> bool {
        match codon_key(codon) {
            Some(key) => {
                self.map.insert(key, aa);
                true
            }
            None => false,
        }
    }

    /// Builder-style variant of [`insert`](CodonTable::insert).
    pub fn with(mut self, codon: &str, aa: char) -> Self {
        self.insert(codon, aa);
        self
    }

    #[inline]
    pub fn get(&self, codon: &str) -> Option<char> {
        codon_key(codon).and_then(|key| self.map.get(&key).cloned())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    fn lookup(&self, codon: [char; 3]) -> char {
        self.map.get(&codon).cloned().unwrap_or(UNKNOWN_AA)
    }
}

impl<'a> FromIterator<(&'a str, char)> for CodonTable {
    fn from_iter<I: IntoIterator<Item = (&'a str, char)>>(iter: I) -> Self {
        let mut table = CodonTable::new();
        for (codon, aa) in iter {
            table.insert(codon, aa);
        }
        table
    }
}

fn codon_key(codon: &str) -> Option<[char; 3]> {
    let mut chars = codon.chars();
    let key = [chars.next()?, chars.next()?, chars.next()?];
    if chars.next().is_some() {
        return None;
    }
    Some(key)
}

/// Translates `seq` codon by codon using `table`.
pub fn translate(seq: &str, table: &CodonTable) -> String {
    let mut out = String::with_capacity(seq.len() / 3);
    let mut chars = seq.chars();
    while let (Some(a), Some(b), Some(c)) = (chars.next(), chars.next(), chars.next()) {
        out.push(table.lookup([a, b, c]));
    }
    out
}
