#![no_main]
use libfuzzer_sys::fuzz_target;

use fasta_kit::{ReaderBuilder, SeqRecord};

fuzz_target!(|data: &[u8]| {
    let records: Vec<SeqRecord> = ReaderBuilder::new()
        .capacity(3)
        .from_reader(data)
        .filter_map(|r| r.ok())
        .collect();

    // Bodies without whitespace or '>' must survive writing and parsing again.
    let plain: Vec<_> = records
        .into_iter()
        .filter(|r| !r.seq().contains(|c: char| c.is_whitespace() || c == '>'))
        .collect();
    let mut out = vec![];
    fasta_kit::print_to(&mut out, &plain).unwrap();
    let parsed: Vec<SeqRecord> = ReaderBuilder::new()
        .uppercase(false)
        .from_reader(&out[..])
        .collect::<fasta_kit::Result<_>>()
        .unwrap();
    assert_eq!(parsed, plain);
});
