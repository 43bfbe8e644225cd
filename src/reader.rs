use std::io::{self, BufRead, Read};
use std::iter;
use std::mem;
use std::path::Path;
use std::str;

use log::{debug, trace};

use crate::container::{self, Members, Stream};
use crate::error::{Error, ErrorKind, ErrorPosition, Result};
use crate::record::{header_id, SeqRecord, HEADER_MARKER};
use crate::Position;

/// The default buffer size of each stream.
pub const BUFSIZE: usize = 64 * 1024;

/// Reader of files opened by path
pub type PathReader = Reader<Members, Stream>;

/// Configures and creates a [`Reader`](Reader).
///
/// ```
/// use fasta_kit::ReaderBuilder;
///
/// let fasta = b">id1\nacgt\n>id2\nTTGA\n";
/// let mut reader = ReaderBuilder::new()
///     .uppercase(false)
///     .from_reader(&fasta[..]);
///
/// let rec = reader.next().unwrap().unwrap();
/// assert_eq!(rec.seq(), "acgt");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderBuilder {
    uppercase: bool,
    capacity: usize,
}

impl Default for ReaderBuilder {
    fn default() -> Self {
        ReaderBuilder {
            uppercase: true,
            capacity: BUFSIZE,
        }
    }
}

impl ReaderBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert sequence bodies to uppercase (default: `true`).
    /// Headers are never changed.
    #[inline]
    pub fn uppercase(mut self, uppercase: bool) -> Self {
        self.uppercase = uppercase;
        self
    }

    /// Initial buffer capacity of each stream (default: 64 KiB).
    /// Lines longer than the buffer are still read completely.
    #[inline]
    pub fn capacity(mut self, capacity: usize) -> Self {
        assert!(capacity >= 1);
        self.capacity = capacity;
        self
    }

    /// Creates a reader from a single stream.
    #[inline]
    pub fn from_reader<R: Read>(self, reader: R) -> Reader<Streams<iter::Once<R>>, R> {
        self.from_streams(iter::once(reader))
    }

    /// Creates a reader from several streams, which are read in order.
    #[inline]
    pub fn from_streams<I, R>(self, streams: I) -> Reader<Streams<I::IntoIter>, R>
    where
        I: IntoIterator<Item = R>,
        R: Read,
    {
        self.from_sources(Streams(streams.into_iter()))
    }

    /// Creates a reader from streams that are opened lazily and may fail to
    /// open, such as [`container::Members`](crate::container::Members).
    /// Failure to open a stream is returned as [`ErrorKind::Io`](ErrorKind::Io)
    /// when the reader reaches it.
    #[inline]
    pub fn from_sources<S, R>(self, sources: S) -> Reader<S::IntoIter, R>
    where
        S: IntoIterator<Item = io::Result<R>>,
        R: Read,
    {
        Reader {
            sources: sources.into_iter(),
            current: None,
            uppercase: self.uppercase,
            capacity: self.capacity,
            n_streams: 0,
            n_records: 0,
            position: None,
            finished: false,
        }
    }

    /// Opens a (possibly compressed or archived) file, see
    /// [`container::open()`](crate::container::open).
    /// Returns [`ErrorKind::NotFound`](ErrorKind::NotFound) if the path does
    /// not point to a file.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<PathReader> {
        container::open(path).map(|members| self.from_sources(members))
    }
}

/// Adapts an iterator of streams that are already open.
#[derive(Debug)]
pub struct Streams<I>(I);

impl<I, R> Iterator for Streams<I>
where
    I: Iterator<Item = R>,
{
    type Item = io::Result<R>;

    #[inline]
    fn next(&mut self) -> Option<io::Result<R>> {
        self.0.next().map(Ok)
    }
}

/// Lazy FASTA parser over one or more streams.
///
/// Records are returned in the order of their headers, streams are read
/// one after another. Each stream is closed (dropped) as soon as it is
/// exhausted. Empty lines are ignored, leading and trailing whitespace is
/// removed from every line, and content before the first header of a stream
/// is skipped. A header without sequence lines results in a record with an
/// empty body.
///
/// After an error has been returned, the reader returns `None`.
///
/// ```
/// use fasta_kit::Reader;
///
/// let fasta = b"
/// >id1 first
/// ACGT
/// acgt
///
/// >id2
/// >id3
/// TTTT
/// ";
///
/// let records: Vec<_> = Reader::new(&fasta[..])
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(records.len(), 3);
/// assert_eq!(records[0].head(), ">id1 first");
/// assert_eq!(records[0].seq(), "ACGTACGT");
/// assert_eq!(records[1].seq(), "");
/// assert_eq!(records[2].seq(), "TTTT");
/// ```
pub struct Reader<S, R>
where
    S: Iterator<Item = io::Result<R>>,
    R: Read,
{
    sources: S,
    current: Option<StreamParser<R>>,
    uppercase: bool,
    capacity: usize,
    n_streams: u64,
    n_records: u64,
    position: Option<Position>,
    finished: bool,
}

impl<R: Read> Reader<Streams<iter::Once<R>>, R> {
    /// Creates a reader of a single stream with default settings.
    #[inline]
    pub fn new(reader: R) -> Self {
        ReaderBuilder::new().from_reader(reader)
    }
}

impl PathReader {
    /// Opens a file with default settings.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<PathReader> {
        ReaderBuilder::new().from_path(path)
    }
}

impl<S, R> Reader<S, R>
where
    S: Iterator<Item = io::Result<R>>,
    R: Read,
{
    /// Returns the position of the header of the last record returned,
    /// or `None` if no record was read yet.
    #[inline]
    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    /// Number of streams opened so far
    #[inline]
    pub fn num_streams(&self) -> u64 {
        self.n_streams
    }

    /// Returns an iterator over the sequence bodies only.
    ///
    /// ```
    /// use fasta_kit::Reader;
    ///
    /// let seqs: Vec<_> = Reader::new(&b">a\nAC\n>b\nGT\n"[..])
    ///     .into_seqs()
    ///     .collect::<Result<_, _>>()
    ///     .unwrap();
    /// assert_eq!(seqs, vec!["AC", "GT"]);
    /// ```
    #[inline]
    pub fn into_seqs(self) -> Seqs<S, R> {
        Seqs { rdr: self }
    }

    fn next_entry(&mut self) -> Option<Result<Entry>> {
        if self.finished {
            return None;
        }
        loop {
            if self.current.is_none() {
                match self.sources.next() {
                    Some(Ok(stream)) => {
                        debug!("reading FASTA stream {}", self.n_streams);
                        self.current = Some(StreamParser::new(stream, self.capacity, self.n_streams));
                        self.n_streams += 1;
                    }
                    Some(Err(e)) => {
                        self.finished = true;
                        return Some(Err(e.into()));
                    }
                    None => {
                        self.finished = true;
                        return None;
                    }
                }
            }
            if let Some(parser) = self.current.as_mut() {
                match parser.next_entry(self.uppercase) {
                    Some(Ok(mut entry)) => {
                        entry.pos.record = self.n_records;
                        self.n_records += 1;
                        trace!("record {} at {:?}", entry.pos.record, entry.pos);
                        self.position = Some(entry.pos.clone());
                        return Some(Ok(entry));
                    }
                    Some(Err(e)) => {
                        self.finished = true;
                        self.current = None;
                        return Some(Err(e));
                    }
                    None => {
                        debug!("FASTA stream {} exhausted", parser.pos.stream());
                        self.current = None;
                    }
                }
            }
        }
    }
}

impl<S, R> Iterator for Reader<S, R>
where
    S: Iterator<Item = io::Result<R>>,
    R: Read,
{
    type Item = Result<SeqRecord>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry()
            .map(|res| res.map(|entry| SeqRecord::new(entry.head, entry.seq)))
    }
}

impl<S, R> iter::FusedIterator for Reader<S, R>
where
    S: Iterator<Item = io::Result<R>>,
    R: Read,
{
}

/// Iterator over sequence bodies, created by
/// [`Reader::into_seqs()`](Reader::into_seqs)
pub struct Seqs<S, R>
where
    S: Iterator<Item = io::Result<R>>,
    R: Read,
{
    rdr: Reader<S, R>,
}

impl<S, R> Seqs<S, R>
where
    S: Iterator<Item = io::Result<R>>,
    R: Read,
{
    /// Returns the underlying reader.
    #[inline]
    pub fn into_inner(self) -> Reader<S, R> {
        self.rdr
    }
}

impl<S, R> Iterator for Seqs<S, R>
where
    S: Iterator<Item = io::Result<R>>,
    R: Read,
{
    type Item = Result<String>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.rdr.next_entry().map(|res| res.map(|entry| entry.seq))
    }
}

impl<S, R> iter::FusedIterator for Seqs<S, R>
where
    S: Iterator<Item = io::Result<R>>,
    R: Read,
{
}

struct Entry {
    head: String,
    seq: String,
    pos: Position,
}

/// Line-based parser of a single stream
struct StreamParser<R: Read> {
    rdr: buffer_redux::BufReader<R>,
    line_buf: Vec<u8>,
    // header of the record being assembled
    head: Option<(String, Position)>,
    seq: String,
    // position of the next line
    pos: Position,
}

impl<R: Read> StreamParser<R> {
    fn new(reader: R, capacity: usize, stream_idx: u64) -> Self {
        let mut pos = Position::new();
        pos.set_stream(stream_idx);
        StreamParser {
            rdr: buffer_redux::BufReader::with_capacity(capacity, reader),
            line_buf: Vec::with_capacity(128),
            head: None,
            seq: String::new(),
            pos,
        }
    }

    fn next_entry(&mut self, uppercase: bool) -> Option<Result<Entry>> {
        loop {
            self.line_buf.clear();
            let n = try_opt!(self.rdr.read_until(b'\n', &mut self.line_buf));
            if n == 0 {
                return self
                    .head
                    .take()
                    .map(|(head, pos)| Ok(self.take_entry(head, pos, uppercase)));
            }
            let line_pos = self.pos.clone();
            self.pos.line += 1;
            self.pos.byte += n as u64;

            let line = match str::from_utf8(&self.line_buf) {
                Ok(l) => l.trim(),
                Err(err) => {
                    let id = self.head.as_ref().map(|(h, _)| header_id(h).to_string());
                    return Some(Err(Error::new(ErrorKind::Decoding {
                        pos: ErrorPosition::new(line_pos, id),
                        err,
                    })));
                }
            };
            if line.is_empty() {
                continue;
            }
            if line.starts_with(HEADER_MARKER) {
                let head = line.to_string();
                if let Some((prev, prev_pos)) = self.head.replace((head, line_pos)) {
                    return Some(Ok(self.take_entry(prev, prev_pos, uppercase)));
                }
                if !self.seq.is_empty() {
                    debug!(
                        "skipping {} characters before the first header of stream {}",
                        self.seq.chars().count(),
                        self.pos.stream()
                    );
                    self.seq.clear();
                }
            } else {
                self.seq.push_str(line);
            }
        }
    }

    fn take_entry(&mut self, head: String, pos: Position, uppercase: bool) -> Entry {
        let mut seq = mem::take(&mut self.seq);
        if uppercase {
            seq = seq.to_uppercase();
        }
        Entry { head, seq, pos }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matches::assert_matches;

    fn read_all(input: &[u8]) -> Vec<SeqRecord> {
        Reader::new(input).collect::<Result<_>>().unwrap()
    }

    #[test]
    fn simple() {
        let recs = read_all(b">Atlantic dolphin\nCGGCCTTCTATCTTCTTC\n>Pacific dolphin\nCTTTCTATCTCTTTCCTCT\n");
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].head(), ">Atlantic dolphin");
        assert_eq!(recs[0].seq(), "CGGCCTTCTATCTTCTTC");
        assert_eq!(recs[1].head(), ">Pacific dolphin");
        assert_eq!(recs[1].seq(), "CTTTCTATCTCTTTCCTCT");
    }

    #[test]
    fn empty() {
        assert!(read_all(b"").is_empty());
        assert!(read_all(b"\n\n  \r\n").is_empty());
    }

    #[test]
    fn headerless() {
        assert!(read_all(b"ACGT\nACGT\n").is_empty());
    }

    #[test]
    fn preamble_skipped() {
        let recs = read_all(b"junk\n>id\nAC\n");
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].seq(), "AC");
    }

    struct Capture;

    lazy_static::lazy_static! {
        static ref MESSAGES: std::sync::Mutex<Vec<String>> = Default::default();
    }

    impl log::Log for Capture {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            if let Ok(mut msgs) = MESSAGES.lock() {
                msgs.push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    #[test]
    fn preamble_length_in_characters() {
        static LOGGER: Capture = Capture;
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Trace);

        let recs = read_all("äöü\n>id\nAC\n".as_bytes());
        assert_eq!(recs.len(), 1);
        let msgs = MESSAGES.lock().unwrap();
        assert!(
            msgs.iter()
                .any(|m| m == "skipping 3 characters before the first header of stream 0"),
            "{:?}",
            *msgs
        );
    }

    #[test]
    fn consecutive_headers() {
        let recs = read_all(b">a\n>b\n>c\nAC\n>d");
        let heads: Vec<_> = recs.iter().map(|r| r.head()).collect();
        let seqs: Vec<_> = recs.iter().map(|r| r.seq()).collect();
        assert_eq!(heads, vec![">a", ">b", ">c", ">d"]);
        assert_eq!(seqs, vec!["", "", "AC", ""]);
    }

    #[test]
    fn whitespace_and_crlf() {
        let recs = read_all(b"\r\n  >id desc  \r\n  AC GT \r\n\r\n\tTT\r\n");
        assert_eq!(recs[0].head(), ">id desc");
        assert_eq!(recs[0].seq(), "AC GTTT");
    }

    #[test]
    fn uppercase() {
        let recs = read_all(b">Id\nacgt\nAcGt\n");
        assert_eq!(recs[0].head(), ">Id");
        assert_eq!(recs[0].seq(), "ACGTACGT");

        let recs: Vec<_> = ReaderBuilder::new()
            .uppercase(false)
            .from_reader(&b">Id\nacgt\nAcGt\n"[..])
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(recs[0].seq(), "acgtAcGt");
    }

    #[test]
    fn capacities() {
        let input = b">id1 desc\nACCGTAGGCT\nCCGTAGGCTG\n\n>id2\nATTGTTGTTT\nGGGG";
        for cap in 1..40 {
            let recs: Vec<_> = ReaderBuilder::new()
                .capacity(cap)
                .from_reader(&input[..])
                .collect::<Result<_>>()
                .unwrap();
            assert_eq!(recs.len(), 2, "cap. {}", cap);
            assert_eq!(recs[0].seq(), "ACCGTAGGCTCCGTAGGCTG", "cap. {}", cap);
            assert_eq!(recs[1].seq(), "ATTGTTGTTTGGGG", "cap. {}", cap);
        }
    }

    #[test]
    fn multiple_streams() {
        let streams: Vec<&[u8]> = vec![b">a\nA\n>b\nC\n", b"", b"no header\n", b">c\nG\n>d\nT"];
        let mut reader = ReaderBuilder::new().from_streams(streams);
        let mut seqs = vec![];
        while let Some(rec) = reader.next() {
            seqs.push(rec.unwrap().seq().to_string());
        }
        assert_eq!(seqs, vec!["A", "C", "G", "T"]);
        assert_eq!(reader.num_streams(), 4);
    }

    #[test]
    fn records_do_not_span_streams() {
        let streams: Vec<&[u8]> = vec![b">a\nAC\n", b"GT\n>b\nTT\n"];
        let recs: Vec<_> = ReaderBuilder::new()
            .from_streams(streams)
            .collect::<Result<_>>()
            .unwrap();
        let seqs: Vec<_> = recs.iter().map(|r| r.seq()).collect();
        assert_eq!(seqs, vec!["AC", "TT"]);
    }

    #[test]
    fn positions() {
        let streams: Vec<&[u8]> = vec![b"\n>a\nAC\n>b\n", b">c\n"];
        let mut reader = ReaderBuilder::new().from_streams(streams);
        assert!(reader.position().is_none());

        reader.next().unwrap().unwrap();
        let exp = Position::new().set_line(1).set_byte(1).clone();
        assert_eq!(reader.position(), Some(&exp));

        reader.next().unwrap().unwrap();
        let exp = Position::new().set_line(3).set_byte(7).set_record(1).clone();
        assert_eq!(reader.position(), Some(&exp));

        reader.next().unwrap().unwrap();
        let exp = Position::new().set_stream(1).set_record(2).clone();
        assert_eq!(reader.position(), Some(&exp));
        assert!(reader.next().is_none());
    }

    #[test]
    fn invalid_utf8() {
        let mut reader = Reader::new(&b">id1\nACGT\n>id2 x\nAC\xffGT\n>id3\nA\n"[..]);
        assert_eq!(reader.next().unwrap().unwrap().seq(), "ACGT");
        let err = reader.next().unwrap().unwrap_err();
        assert_matches!(err.kind(), ErrorKind::Decoding { .. });
        let pos = err.position().unwrap();
        assert_eq!(pos.record_id(), Some("id2"));
        assert_eq!(pos.position().line(), 3);
        assert_eq!(pos.position().byte(), 17);
        // fused after an error
        assert!(reader.next().is_none());
    }

    #[test]
    fn stream_open_error() {
        let sources: Vec<io::Result<&[u8]>> = vec![
            Ok(&b">a\nAC\n"[..]),
            Err(io::Error::new(io::ErrorKind::Other, "broken member")),
            Ok(&b">b\nGT\n"[..]),
        ];
        let mut reader = ReaderBuilder::new().from_sources(sources);
        assert_eq!(reader.next().unwrap().unwrap().seq(), "AC");
        let err = reader.next().unwrap().unwrap_err();
        assert_matches!(err.kind(), ErrorKind::Io(_));
        assert!(reader.next().is_none());
    }

    #[test]
    fn seqs_only() {
        let seqs: Vec<_> = Reader::new(&b">a\nac\n>b\n>c\ngt"[..])
            .into_seqs()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(seqs, vec!["AC", "", "GT"]);
    }

    #[test]
    fn lazy() {
        // The second stream is never opened if only one record is consumed.
        let mut opened = 0;
        let sources = (0..3).map(|i| {
            opened += 1;
            Ok(if i == 0 { &b">a\nAC\n"[..] } else { &b">b\nGT\n"[..] })
        });
        let mut reader = ReaderBuilder::new().from_sources(sources);
        reader.next().unwrap().unwrap();
        drop(reader);
        assert_eq!(opened, 1);
    }
}
