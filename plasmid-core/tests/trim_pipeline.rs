#![cfg(feature = "io-fastx")]

use plasmid_core::io::{load_primers, load_samples, write_fastq, FastxParser};
use plasmid_core::{trim_batch, ErrorProbabilityTrimmer, SampleTrimmingService};
use std::io::Write;
use tempfile::NamedTempFile;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write_temp(contents: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("create temp file");
    f.write_all(contents.as_bytes()).unwrap();
    f.as_file().sync_all().unwrap();
    f
}

#[test]
fn trim_fastq_reads_end_to_end() {
    init_logging();
    // Q10 = '+', Q40 = 'I'
    let fastq = write_temp(
        "@read1 forward\nACGTACGT\n+\n+++III++\n\
         @read2\nGGGGCCCC\n+\nIIIIIIII\n\
         @read3\nTTTT\n+\n++++\n",
    );

    let samples = load_samples(fastq.path()).expect("load samples");
    assert_eq!(samples.len(), 3);

    let trimmer = ErrorProbabilityTrimmer::default();
    let outcomes: Vec<_> = trim_batch(&trimmer, &samples)
        .into_iter()
        .collect::<Result<_, _>>()
        .expect("trim all");

    assert_eq!((outcomes[0].start, outcomes[0].end), (3, 6));
    assert_eq!(outcomes[0].sample.sequence().to_string(), "TAC");
    assert_eq!((outcomes[1].start, outcomes[1].end), (0, 8));
    assert!(outcomes[2].is_empty());

    for (original, outcome) in samples.iter().zip(&outcomes) {
        assert_eq!(outcome.scores.len(), original.len());
        assert_eq!(
            outcome.sample.quality(),
            &original.quality()[outcome.start..outcome.end]
        );
    }

    // Write the trimmed reads back out and parse them again.
    let mut out = NamedTempFile::new().expect("create output");
    write_fastq(&mut out, outcomes.iter().filter(|o| !o.is_empty()).map(|o| &o.sample)).unwrap();
    out.as_file().sync_all().unwrap();

    let records = FastxParser::parse_file(out.path()).expect("reparse");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "read1_trimmed");
    assert_eq!(records[0].quality.as_deref(), Some(&[40.0, 40.0, 40.0][..]));
    assert_eq!(records[1].sequence.to_string(), "GGGGCCCC");
}

#[test]
fn retrimming_high_quality_output_is_stable() {
    let fastq = write_temp("@r\nAACCGGTTAACC\n+\n+IIIIIIIIII+\n");
    let samples = load_samples(fastq.path()).unwrap();
    let trimmer = ErrorProbabilityTrimmer::default();

    // The unclamped negative first score drags base 1 down to a reset point.
    let first = trimmer.trim(&samples[0]).unwrap();
    assert_eq!((first.start, first.end), (2, 11));

    let second = trimmer.trim(&first.sample).unwrap();
    assert_eq!((second.start, second.end), (0, first.sample.len()));
}

#[test]
fn fasta_reads_cannot_become_samples_but_can_be_primers() {
    let fasta = write_temp(">M13F\nGTAAAACGACGGCCAGT\n>M13R\nCAGGAAACAGCTATGAC\n");

    let err = load_samples(fasta.path()).unwrap_err();
    assert!(err.is_validation());

    let primers = load_primers(fasta.path()).unwrap();
    assert_eq!(primers.len(), 2);
    assert_eq!(primers[1].identifier(), "M13R");
    assert_eq!(primers[1].len(), 17);
}

#[test]
fn missing_file_is_an_error() {
    assert!(load_samples("/nonexistent/reads.fastq").is_err());
}
