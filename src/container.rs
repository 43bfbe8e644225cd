//! Opening plain, compressed and archived FASTA files
//!
//! [`open()`](open) classifies a path and returns its content as an ordered
//! sequence of streams ([`Members`](Members)):
//!
//! | Container | Recognized by                     | Streams               |
//! |-----------|-----------------------------------|-----------------------|
//! | plain     | anything else                     | the file              |
//! | gzip      | `.gz`, or gzip magic bytes        | the decompressed file |
//! | tar       | `.tar`                            | one per file member   |
//! | tar.gz    | `.tar.gz`, `.tgz`                 | one per file member   |
//! | zip       | `.zip`, or zip magic bytes        | one per file member   |
//!
//! Suffixes are compared case-insensitively. Magic bytes are only consulted
//! if the suffix is not recognized. Directory entries are skipped, members
//! are returned in archive order.

use std::cell::RefCell;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use flate2::read::{DeflateDecoder, MultiGzDecoder};
use log::debug;
use zip::result::ZipError;
use zip::{CompressionMethod, ZipArchive};

use crate::error::{Error, ErrorKind, Result};

/// A single readable stream
pub type Stream = Box<dyn Read>;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const ZIP_MAGIC: [u8; 4] = [b'P', b'K', 3, 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    Plain,
    Gzip,
    Tar,
    TarGz,
    Zip,
}

impl Container {
    /// Classifies a path by its suffix, returns `None` for unknown suffixes.
    pub fn from_suffix<P: AsRef<Path>>(path: P) -> Option<Container> {
        let name = path.as_ref().file_name()?.to_string_lossy().to_lowercase();
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Container::TarGz)
        } else if name.ends_with(".tar") {
            Some(Container::Tar)
        } else if name.ends_with(".gz") {
            Some(Container::Gzip)
        } else if name.ends_with(".zip") {
            Some(Container::Zip)
        } else {
            None
        }
    }

    /// Classifies by the first bytes of the content.
    pub fn from_magic(start: &[u8]) -> Container {
        if start.starts_with(&GZIP_MAGIC) {
            Container::Gzip
        } else if start.starts_with(&ZIP_MAGIC) {
            Container::Zip
        } else {
            Container::Plain
        }
    }

    /// Classifies a file by its suffix, or by its content if the suffix
    /// is unknown.
    pub fn detect<P: AsRef<Path>>(path: P) -> io::Result<Container> {
        let path = path.as_ref();
        if let Some(c) = Container::from_suffix(path) {
            return Ok(c);
        }
        let mut start = Vec::with_capacity(ZIP_MAGIC.len());
        File::open(path)?
            .take(ZIP_MAGIC.len() as u64)
            .read_to_end(&mut start)?;
        Ok(Container::from_magic(&start))
    }
}

/// Opens `path` and returns the contained streams.
///
/// Returns [`ErrorKind::NotFound`](crate::ErrorKind::NotFound) if `path`
/// is not a file or cannot be opened for reading. Nothing is decompressed
/// here: tar members are streamed from the (decompressed) archive one after
/// another, zip members are decompressed when the reader reaches them.
/// Damaged tar archives therefore only fail at the first damaged member.
/// Zip files need an intact central directory at the end of the file.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Members> {
    let path = path.as_ref();
    let not_found = || {
        Error::new(ErrorKind::NotFound {
            path: path.to_owned(),
        })
    };
    if !path.is_file() {
        return Err(not_found());
    }
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => not_found(),
        _ => Error::from(e),
    })?;
    let container = Container::detect(path)?;
    debug!("opening '{}' as {:?}", path.display(), container);
    let inner = match container {
        Container::Plain => Inner::Single(Some(Box::new(file) as Stream)),
        Container::Gzip => Inner::Single(Some(Box::new(gz_reader(file)) as Stream)),
        Container::Tar => Inner::Tar(TarMembers::new(Box::new(BufReader::new(file)))),
        Container::TarGz => Inner::Tar(TarMembers::new(Box::new(gz_reader(file)))),
        Container::Zip => {
            let archive = ZipArchive::new(BufReader::new(file)).map_err(zip_error)?;
            Inner::Zip {
                path: path.to_owned(),
                archive,
                idx: 0,
            }
        }
    };
    Ok(Members { container, inner })
}

/// Streams of an opened file, see [`open()`](open).
///
/// Tar member streams share the archive reader: a member is only readable
/// until the next one is requested.
pub struct Members {
    container: Container,
    inner: Inner,
}

enum Inner {
    Single(Option<Stream>),
    Tar(TarMembers),
    Zip {
        path: PathBuf,
        archive: ZipArchive<BufReader<File>>,
        idx: usize,
    },
}

impl Members {
    #[inline]
    pub fn container(&self) -> Container {
        self.container
    }
}

impl Iterator for Members {
    type Item = io::Result<Stream>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            Inner::Single(stream) => stream.take().map(Ok),
            Inner::Tar(members) => members.next(),
            Inner::Zip { path, archive, idx } => {
                while *idx < archive.len() {
                    let i = *idx;
                    *idx += 1;
                    let (start, size, method) = {
                        let member = match archive.by_index(i) {
                            Ok(m) => m,
                            Err(e) => return Some(Err(zip_error(e))),
                        };
                        if member.is_dir() {
                            continue;
                        }
                        debug!("zip member '{}'", member.name());
                        (member.data_start(), member.compressed_size(), member.compression())
                    };
                    return Some(zip_member(path, start, size, method));
                }
                None
            }
        }
    }
}

#[inline]
fn gz_reader(file: File) -> MultiGzDecoder<BufReader<File>> {
    MultiGzDecoder::new(BufReader::new(file))
}

/// Opens the data of a zip member with its own file handle.
fn zip_member(path: &Path, start: u64, size: u64, method: CompressionMethod) -> io::Result<Stream> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(start))?;
    let data = BufReader::new(file).take(size);
    match method {
        CompressionMethod::Stored => Ok(Box::new(data) as Stream),
        CompressionMethod::Deflated => Ok(Box::new(DeflateDecoder::new(data)) as Stream),
        m => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unsupported zip compression method: {:?}", m),
        )),
    }
}

fn zip_error(e: ZipError) -> io::Error {
    match e {
        ZipError::Io(e) => e,
        e => io::Error::new(io::ErrorKind::InvalidData, e),
    }
}

const TAR_BLOCK: usize = 512;

/// Sequential reader of tar members. Headers are read with the `tar` crate,
/// member data is handed out as [`TarMember`](TarMember) streams that read
/// directly from the archive.
struct TarMembers {
    archive: Rc<RefCell<TarArchive>>,
    done: bool,
}

struct TarArchive {
    rdr: Stream,
    // unread bytes of the current member
    remaining: u64,
    padding: u64,
}

impl TarMembers {
    fn new(rdr: Stream) -> Self {
        TarMembers {
            archive: Rc::new(RefCell::new(TarArchive {
                rdr,
                remaining: 0,
                padding: 0,
            })),
            done: false,
        }
    }
}

impl Iterator for TarMembers {
    type Item = io::Result<Stream>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let res = self.archive.borrow_mut().next_member();
        match res {
            Ok(true) => Some(Ok(Box::new(TarMember {
                archive: Rc::clone(&self.archive),
            }) as Stream)),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl TarArchive {
    /// Skips the rest of the current member and advances to the next
    /// regular file. Returns `false` at the end of the archive.
    fn next_member(&mut self) -> io::Result<bool> {
        self.skip(self.remaining + self.padding)?;
        self.remaining = 0;
        self.padding = 0;
        let mut block = [0; TAR_BLOCK];
        loop {
            if !read_block(&mut self.rdr, &mut block)? || block.iter().all(|&b| b == 0) {
                return Ok(false);
            }
            let header = tar::Header::from_byte_slice(&block);
            check_tar_header(header, &block)?;
            let size = header.entry_size()?;
            let padding = (TAR_BLOCK as u64 - size % TAR_BLOCK as u64) % TAR_BLOCK as u64;
            if header.entry_type().is_file() {
                debug!("tar member '{}'", String::from_utf8_lossy(&header.path_bytes()));
                self.remaining = size;
                self.padding = padding;
                return Ok(true);
            }
            self.skip(size + padding)?;
        }
    }

    fn skip(&mut self, n: u64) -> io::Result<()> {
        if n > 0 && io::copy(&mut (&mut self.rdr).take(n), &mut io::sink())? < n {
            return Err(truncated());
        }
        Ok(())
    }
}

/// Data of a single tar member
struct TarMember {
    archive: Rc<RefCell<TarArchive>>,
}

impl Read for TarMember {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut archive = self.archive.borrow_mut();
        if archive.remaining == 0 || buf.is_empty() {
            return Ok(0);
        }
        let max = archive.remaining.min(buf.len() as u64) as usize;
        let n = archive.rdr.read(&mut buf[..max])?;
        if n == 0 {
            return Err(truncated());
        }
        archive.remaining -= n as u64;
        Ok(n)
    }
}

/// Fills `block`, returns `false` if the input ended before the first byte.
fn read_block<R: Read>(rdr: &mut R, block: &mut [u8; TAR_BLOCK]) -> io::Result<bool> {
    let mut filled = 0;
    while filled < block.len() {
        match rdr.read(&mut block[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => return Err(truncated()),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(true)
}

fn check_tar_header(header: &tar::Header, block: &[u8; TAR_BLOCK]) -> io::Result<()> {
    // the checksum field itself counts as eight spaces
    let sum: u32 = block[..148]
        .iter()
        .chain(&[b' '; 8])
        .chain(&block[156..])
        .map(|&b| u32::from(b))
        .sum();
    if header.cksum()? != sum {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "tar header checksum mismatch",
        ));
    }
    Ok(())
}

#[inline]
fn truncated() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "truncated tar archive")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffixes() {
        assert_eq!(Container::from_suffix("a/seqs.fasta"), None);
        assert_eq!(Container::from_suffix("seqs.fasta.gz"), Some(Container::Gzip));
        assert_eq!(Container::from_suffix("seqs.FA.GZ"), Some(Container::Gzip));
        assert_eq!(Container::from_suffix("seqs.fasta.tar"), Some(Container::Tar));
        assert_eq!(Container::from_suffix("seqs.fasta.tar.gz"), Some(Container::TarGz));
        assert_eq!(Container::from_suffix("seqs.tgz"), Some(Container::TarGz));
        assert_eq!(Container::from_suffix("seqs.zip"), Some(Container::Zip));
        assert_eq!(Container::from_suffix("tar.gz/seqs.fa"), None);
    }

    #[test]
    fn magic() {
        assert_eq!(Container::from_magic(&[0x1f, 0x8b, 8, 0]), Container::Gzip);
        assert_eq!(Container::from_magic(b"PK\x03\x04"), Container::Zip);
        assert_eq!(Container::from_magic(b">id"), Container::Plain);
        assert_eq!(Container::from_magic(b""), Container::Plain);
    }

    #[test]
    fn not_found() {
        let err = open("this/path/does/not/exist.fasta").err().unwrap();
        match err.kind() {
            ErrorKind::NotFound { path } => {
                assert_eq!(path, Path::new("this/path/does/not/exist.fasta"))
            }
            e => panic!("Wrong error: {:?}", e),
        }
    }
}
