#![allow(dead_code)]

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

pub const DOLPHINS: &str = "\
>Atlantic dolphin
CGGCCTTCTATCTTCTTC
>Pacific dolphin
CTTTCTATCTCTTTCCTCT
>Mediterranean dolphin
CTTTCTATCTCTTTCCTCT
>Dolphin #4
CTTTCTATCTCTTTCCTCT
";

/// Unusual headers, blank lines and a long body spread over several lines
pub const STRANGE: &str = "\
>FirstTestFASTA !\"$%_-&/()=?'#'\"\",. :
  ACGT

acgt
>
TTTT
> Third >
\r
GGGG\r
CCCC\r
>Last
";

pub struct Expected {
    pub head: &'static str,
    pub seq: &'static str,
}

lazy_static! {
    pub static ref DOLPHINS_EXPECTED: Vec<Expected> = vec![
        Expected { head: ">Atlantic dolphin", seq: "CGGCCTTCTATCTTCTTC" },
        Expected { head: ">Pacific dolphin", seq: "CTTTCTATCTCTTTCCTCT" },
        Expected { head: ">Mediterranean dolphin", seq: "CTTTCTATCTCTTTCCTCT" },
        Expected { head: ">Dolphin #4", seq: "CTTTCTATCTCTTTCCTCT" },
    ];
    pub static ref STRANGE_EXPECTED: Vec<Expected> = vec![
        Expected { head: ">FirstTestFASTA !\"$%_-&/()=?'#'\"\",. :", seq: "ACGTACGT" },
        Expected { head: ">", seq: "TTTT" },
        Expected { head: "> Third >", seq: "GGGGCCCC" },
        Expected { head: ">Last", seq: "" },
    ];
}

/// Compares records with the expected headers and bodies.
pub fn check_records(records: &[fasta_kit::SeqRecord], expected: &[Expected]) {
    let heads: Vec<_> = records.iter().map(|r| r.head()).collect();
    let exp_heads: Vec<_> = expected.iter().map(|e| e.head).collect();
    assert_eq!(heads, exp_heads);
    let seqs: Vec<_> = records.iter().map(|r| r.seq()).collect();
    let exp_seqs: Vec<_> = expected.iter().map(|e| e.seq).collect();
    assert_eq!(seqs, exp_seqs);
}

/// Three members, each with two records: `m<i>_a` and `m<i>_b`.
pub fn members() -> Vec<(String, String)> {
    (0..3)
        .map(|i| {
            let name = format!("dir/member{}.fasta", i);
            let content = format!(">m{0}_a\nAC{0}\n\n>m{0}_b first\nGT{0}\nTT\n", i);
            (name, content)
        })
        .collect()
}

pub fn member_ids() -> Vec<String> {
    (0..3)
        .flat_map(|i| vec![format!("m{}_a", i), format!("m{}_b", i)])
        .collect()
}

pub fn write_plain(path: &Path, content: &str) -> io::Result<()> {
    File::create(path)?.write_all(content.as_bytes())
}

pub fn gzip(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut enc = GzEncoder::new(vec![], Compression::default());
    enc.write_all(data)?;
    enc.finish()
}

pub fn write_gz(path: &Path, content: &str) -> io::Result<()> {
    File::create(path)?.write_all(&gzip(content.as_bytes())?)
}

pub fn tar_bytes(members: &[(String, String)]) -> io::Result<Vec<u8>> {
    let mut builder = tar::Builder::new(vec![]);
    let mut dir = tar::Header::new_gnu();
    dir.set_entry_type(tar::EntryType::Directory);
    dir.set_size(0);
    dir.set_mode(0o755);
    dir.set_cksum();
    builder.append_data(&mut dir, "dir/", io::empty())?;
    for (name, content) in members {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, content.as_bytes())?;
    }
    builder.into_inner()
}

pub fn write_tar(path: &Path, members: &[(String, String)]) -> io::Result<()> {
    File::create(path)?.write_all(&tar_bytes(members)?)
}

pub fn write_tar_gz(path: &Path, members: &[(String, String)]) -> io::Result<()> {
    File::create(path)?.write_all(&gzip(&tar_bytes(members)?)?)
}

pub fn write_zip(path: &Path, members: &[(String, String)]) -> zip::result::ZipResult<()> {
    write_zip_with(path, members, zip::CompressionMethod::Deflated)
}

pub fn write_zip_with(
    path: &Path,
    members: &[(String, String)],
    method: zip::CompressionMethod,
) -> zip::result::ZipResult<()> {
    let mut zip = zip::ZipWriter::new(File::create(path)?);
    let options = zip::write::FileOptions::default().compression_method(method);
    zip.add_directory("dir/", options)?;
    for (name, content) in members {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(content.as_bytes())?;
    }
    zip.finish()?;
    Ok(())
}

/// A random nucleotide body of `len` characters
pub fn random_seq(len: usize, seed: u64) -> String {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..len).map(|_| b"ACGT"[rng.gen_range(0..4)] as char).collect()
}

pub fn temp_path(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}
