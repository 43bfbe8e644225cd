use serde_derive::{Deserialize, Serialize};

/// Location of a line or record within the input.
///
/// Line and byte offsets are relative to the start of the stream
/// (archive member) they were read from, the record index counts
/// across all streams of a reader.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub(crate) stream: u64,
    pub(crate) line: u64,
    pub(crate) byte: u64,
    pub(crate) record: u64,
}

impl Position {
    #[inline]
    pub fn new() -> Position {
        Position::default()
    }

    /// Stream index (0-based), e.g. the archive member
    #[inline]
    pub fn stream(&self) -> u64 {
        self.stream
    }

    /// Line index (0-based) within the stream
    #[inline]
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Byte offset within the stream
    #[inline]
    pub fn byte(&self) -> u64 {
        self.byte
    }

    /// Record index (0-based) in the input
    #[inline]
    pub fn record(&self) -> u64 {
        self.record
    }

    #[inline]
    pub fn set_stream(&mut self, idx: u64) -> &mut Self {
        self.stream = idx;
        self
    }

    /// Sets the line index (0-based)
    #[inline]
    pub fn set_line(&mut self, line: u64) -> &mut Self {
        self.line = line;
        self
    }

    /// Sets the byte offset
    #[inline]
    pub fn set_byte(&mut self, byte: u64) -> &mut Self {
        self.byte = byte;
        self
    }

    /// Sets the record index (0-based)
    #[inline]
    pub fn set_record(&mut self, idx: u64) -> &mut Self {
        self.record = idx;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_chain() {
        let pos = Position::new()
            .set_stream(2)
            .set_line(10)
            .set_byte(300)
            .set_record(4)
            .clone();
        assert_eq!(pos.stream(), 2);
        assert_eq!(pos.line(), 10);
        assert_eq!(pos.byte(), 300);
        assert_eq!(pos.record(), 4);
    }

    #[test]
    fn ordered_by_stream_first() {
        let a = Position::new().set_stream(0).set_line(99).clone();
        let b = Position::new().set_stream(1).set_line(0).clone();
        assert!(a < b);
    }
}
