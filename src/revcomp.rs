//! Reverse complement of nucleotide sequences
//!
//! Characters without an entry in the complement table are kept as they
//! are, so lowercase letters, gaps or `N` pass through unchanged with the
//! standard table.

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::iter::FromIterator;

/// IUPAC complement rules. `U` maps to `A`, but `A` maps back to `T`.
const STANDARD_PAIRS: [(char, char); 15] = [
    ('A', 'T'),
    ('G', 'C'),
    ('C', 'G'),
    ('T', 'A'),
    ('U', 'A'),
    ('R', 'Y'),
    ('Y', 'R'),
    ('S', 'S'),
    ('W', 'W'),
    ('K', 'M'),
    ('M', 'K'),
    ('B', 'V'),
    ('V', 'B'),
    ('D', 'H'),
    ('H', 'D'),
];

lazy_static! {
    static ref STANDARD: ComplementTable = STANDARD_PAIRS.iter().cloned().collect();
}

/// Mapping of single nucleotides to their complement.
///
/// The shared [`standard()`](ComplementTable::standard) table cannot be
/// modified; custom tables are built with [`insert`](ComplementTable::insert)
/// or [`with`](ComplementTable::with), or collected from pairs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComplementTable {
    map: HashMap<char, char>,
}

impl ComplementTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the shared IUPAC complement table.
    #[inline]
    pub fn standard() -> &'static ComplementTable {
        &STANDARD
    }

    pub fn insert(&mut self, base: char, complement: char) {
        self.map.insert(base, complement);
    }

    pub fn with(mut self, base: char, complement: char) -> Self {
        self.insert(base, complement);
        self
    }

    #[inline]
    pub fn get(&self, base: char) -> Option<char> {
        self.map.get(&base).cloned()
    }

    /// Complement of `base`, or `base` itself if there is no entry.
    #[inline]
    pub fn complement(&self, base: char) -> char {
        self.get(base).unwrap_or(base)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl FromIterator<(char, char)> for ComplementTable {
    fn from_iter<I: IntoIterator<Item = (char, char)>>(iter: I) -> Self {
        ComplementTable {
            map: iter.into_iter().collect(),
        }
    }
}

/// Reverses `seq` and complements every character using `table`.
pub fn reverse_complement(seq: &str, table: &ComplementTable) -> String {
    if seq.is_empty() {
        return String::new();
    }
    seq.chars().rev().map(|c| table.complement(c)).collect()
}
