use crate::Position;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::str::Utf8Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Position of a parsing error within the input
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorPosition {
    pos: Position,
    id: Option<String>,
}

impl ErrorPosition {
    pub fn new(pos: Position, id: Option<String>) -> Self {
        ErrorPosition { pos, id }
    }

    /// Returns the position of the line, at which the error occurred.
    #[inline]
    pub fn position(&self) -> &Position {
        &self.pos
    }

    /// Returns the ID of the record that was being assembled when the
    /// error occurred. `None` is returned if no header was read yet
    /// in the current stream.
    #[inline]
    pub fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl fmt::Display for ErrorPosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(id) = self.id.as_ref() {
            write!(f, "record '{}', ", id)?;
        }
        write!(
            f,
            "stream {}, line {}",
            self.pos.stream() + 1,
            self.pos.line() + 1
        )
    }
}

#[derive(Debug)]
pub enum ErrorKind {
    /// `std::io::Error` raised while opening or reading input
    Io(io::Error),
    /// The input path does not point to a readable file.
    /// Nothing has been read when this is returned.
    NotFound { path: PathBuf },
    /// Unknown alphabet kind token
    InvalidAlphabet {
        /// The token that was supplied
        found: String,
    },
    /// A line could not be decoded as UTF-8 text.
    Decoding {
        /// Position of the offending line
        pos: ErrorPosition,
        err: Utf8Error,
    },
    /// The output rejected a write. The output may be left truncated.
    Write(io::Error),
}

impl ErrorKind {
    /// Returns the position for this error, if one exists.
    pub fn position(&self) -> Option<&ErrorPosition> {
        match self {
            ErrorKind::Decoding { pos, .. } => Some(pos),
            _ => None,
        }
    }
}

/// Error type of this crate
#[derive(Debug)]
pub struct Error {
    kind: Box<ErrorKind>,
}

impl Error {
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Error {
            kind: Box::new(kind),
        }
    }

    /// Returns a reference to the [`ErrorKind`](ErrorKind)
    /// associated with the error.
    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the [`ErrorKind`](ErrorKind) associated with
    /// the error, thereby consuming the error.
    #[inline]
    pub fn into_kind(self) -> ErrorKind {
        *self.kind
    }

    /// Returns the [`ErrorPosition`](ErrorPosition) of
    /// the error within the input.
    #[inline]
    pub fn position(&self) -> Option<&ErrorPosition> {
        self.kind().position()
    }

    #[inline]
    pub(crate) fn write(e: io::Error) -> Self {
        Error::new(ErrorKind::Write(e))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind() {
            ErrorKind::Io(ref e) => e.fmt(f),
            ErrorKind::NotFound { path } => {
                write!(f, "FASTA file not found: '{}'.", path.display())
            }
            ErrorKind::InvalidAlphabet { found } => write!(
                f,
                "Invalid alphabet kind '{}', expected one of 'na', 'dna', 'rna', 'prot' or 'any'.",
                found.escape_default()
            ),
            ErrorKind::Decoding { pos, err } => {
                write!(f, "FASTA decoding error: {} ({}).", err, pos)
            }
            ErrorKind::Write(ref e) => write!(f, "FASTA write error: {}", e),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        Error::new(ErrorKind::Io(e))
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        match err.into_kind() {
            ErrorKind::Io(e) | ErrorKind::Write(e) => e,
            ErrorKind::NotFound { path } => io::Error::new(
                io::ErrorKind::NotFound,
                format!("FASTA file not found: '{}'.", path.display()),
            ),
            kind => io::Error::new(io::ErrorKind::InvalidData, Error::new(kind)),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Io(ref err) | ErrorKind::Write(ref err) => Some(err),
            ErrorKind::Decoding { ref err, .. } => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn decoding_display() {
        let err = std::str::from_utf8(&[b'A', 0xff]).unwrap_err();
        let pos = Position::new().set_stream(1).set_line(4).clone();
        let e = Error::new(ErrorKind::Decoding {
            pos: ErrorPosition::new(pos, Some("seq1".to_string())),
            err,
        });
        let msg = e.to_string();
        assert!(msg.contains("record 'seq1'"), "{}", msg);
        assert!(msg.contains("stream 2, line 5"), "{}", msg);
        assert!(e.source().is_some());
        assert_eq!(e.position().unwrap().position().line(), 4);
    }

    #[test]
    fn into_io_error() {
        let e = Error::new(ErrorKind::NotFound {
            path: PathBuf::from("missing.fa"),
        });
        let io_err: io::Error = e.into();
        assert_eq!(io_err.kind(), io::ErrorKind::NotFound);

        let e = Error::write(io::Error::new(io::ErrorKind::WriteZero, "full"));
        let io_err: io::Error = e.into();
        assert_eq!(io_err.kind(), io::ErrorKind::WriteZero);
    }
}
