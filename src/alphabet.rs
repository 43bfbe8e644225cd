//! Declared sequence alphabets
//!
//! The alphabet kind of a record is purely declarative: it never restricts
//! what is stored in the body, it only selects the character set that
//! [`SeqRecord::valid()`](crate::SeqRecord::valid) checks against.
//!
//! | Kind          | Token  | Allowed characters                   |
//! |---------------|--------|--------------------------------------|
//! | `NucleicAcid` | `na`   | `ACGRYSWKMBDHVN` + `TU`              |
//! | `Dna`         | `dna`  | `ACGRYSWKMBDHVN` + `T`               |
//! | `Rna`         | `rna`  | `ACGRYSWKMBDHVN` + `U`               |
//! | `Protein`     | `prot` | `ACDEFGHIKLMNPWRSTVWYUOBJZ*X-.`      |
//! | `Any`         | `any`  | everything                           |
//!
//! Tokens are matched case-insensitively.

use crate::error::{Error, ErrorKind};
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bodies of this length or longer are never considered valid.
pub const MAX_VALID_LEN: usize = 250_000;

const PROTEIN: &str = "ACDEFGHIKLMNPWRSTVWYUOBJZ*X-.";
const NUCLEIC_ACID: &str = "ACGRYSWKMBDHVNTU";
const DNA: &str = "ACGRYSWKMBDHVNT";
const RNA: &str = "ACGRYSWKMBDHVNU";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AlphabetKind {
    /// DNA and RNA IUPAC codes
    NucleicAcid,
    /// IUPAC DNA codes
    Dna,
    /// IUPAC RNA codes
    Rna,
    /// IUPAC amino acid codes
    Protein,
    /// No restriction
    #[default]
    Any,
}

impl AlphabetKind {
    /// Returns the characters allowed by this kind, or `None` if every
    /// character is allowed.
    #[inline]
    pub fn allowed_chars(self) -> Option<&'static str> {
        match self {
            AlphabetKind::NucleicAcid => Some(NUCLEIC_ACID),
            AlphabetKind::Dna => Some(DNA),
            AlphabetKind::Rna => Some(RNA),
            AlphabetKind::Protein => Some(PROTEIN),
            AlphabetKind::Any => None,
        }
    }

    /// The (lowercase) token this kind is parsed from
    #[inline]
    pub fn token(self) -> &'static str {
        match self {
            AlphabetKind::NucleicAcid => "na",
            AlphabetKind::Dna => "dna",
            AlphabetKind::Rna => "rna",
            AlphabetKind::Protein => "prot",
            AlphabetKind::Any => "any",
        }
    }
}

impl FromStr for AlphabetKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.to_ascii_uppercase().as_str() {
            "NA" => AlphabetKind::NucleicAcid,
            "DNA" => AlphabetKind::Dna,
            "RNA" => AlphabetKind::Rna,
            "PROT" => AlphabetKind::Protein,
            "ANY" => AlphabetKind::Any,
            _ => {
                return Err(Error::new(ErrorKind::InvalidAlphabet {
                    found: s.to_string(),
                }))
            }
        };
        Ok(kind)
    }
}

impl fmt::Display for AlphabetKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Checks `seq` against the size ceiling and then against the character set.
/// `allowed` overrides the set derived from `kind`; an empty override counts
/// as absent.
pub(crate) fn is_valid(seq: &str, kind: AlphabetKind, allowed: Option<&str>) -> bool {
    if seq.chars().count() >= MAX_VALID_LEN {
        return false;
    }
    let allowed = match allowed.filter(|a| !a.is_empty()).or_else(|| kind.allowed_chars()) {
        Some(a) => a,
        None => return true,
    };
    seq.chars().all(|c| allowed.contains(c))
}
