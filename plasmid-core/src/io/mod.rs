//! Sequence file I/O for plasmid-core
//!
//! Reading FASTA/FASTQ into [`SequenceRecord`](crate::types::SequenceRecord)s
//! and writing trimmed reads and score traces.

#[cfg(feature = "io-fastx")] pub mod fastx;

#[cfg(feature = "io-fastx")]
pub use fastx::{
    decode_quality, encode_quality, load_primers, load_samples, write_fastq, write_score_table,
    FastxParser,
};
