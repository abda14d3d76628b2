//! FASTA/FASTQ reading and writing
//!
//! Parsing is delegated to needletail, which also handles gzip transparently.
//! FASTQ qualities are decoded as Phred+33 into `f64` scores.

use std::io::Write;
use std::path::Path;

use needletail::{parse_fastx_file, parse_fastx_reader};

use crate::error::{PlasmidError, Result};
use crate::primer::Primer;
use crate::sample::Sample;
use crate::trim::TrimOutcome;
use crate::types::{Sequence, SequenceRecord};

/// ASCII offset of Sanger/Illumina 1.8+ quality strings.
pub const PHRED_OFFSET: u8 = 33;
/// Highest Phred score representable in a FASTQ quality string.
pub const MAX_PHRED: f64 = 93.0;

/// FASTA/FASTQ parser for reading sequence records
pub struct FastxParser;

impl FastxParser {
    /// Parse a FASTA/FASTQ file (optionally gzipped)
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<SequenceRecord>> {
        let source_name = path.as_ref().display().to_string();
        let mut reader = parse_fastx_file(&path)
            .map_err(|e| PlasmidError::parse(source_name.clone(), e.to_string()))?;

        let mut records = Vec::new();
        while let Some(record) = reader.next() {
            let record = record.map_err(|e| PlasmidError::parse(source_name.clone(), e.to_string()))?;
            records.push(Self::convert(&record)?);
        }

        if records.is_empty() {
            return Err(PlasmidError::empty_input(source_name));
        }
        log::info!("Read {} records from {}", records.len(), source_name);
        Ok(records)
    }

    /// Parse FASTA/FASTQ data from any readable source
    pub fn parse_reader<R: std::io::Read + Send>(reader: R) -> Result<Vec<SequenceRecord>> {
        let mut fastx_reader = parse_fastx_reader(reader)
            .map_err(|e| PlasmidError::parse("<reader>", e.to_string()))?;

        let mut records = Vec::new();
        while let Some(record) = fastx_reader.next() {
            let record = record.map_err(|e| PlasmidError::parse("<reader>", e.to_string()))?;
            records.push(Self::convert(&record)?);
        }

        if records.is_empty() {
            return Err(PlasmidError::empty_input("<reader>"));
        }
        Ok(records)
    }

    fn convert(record: &needletail::parser::SequenceRecord) -> Result<SequenceRecord> {
        // The id line carries the identifier and an optional description.
        let header = String::from_utf8_lossy(record.id()).into_owned();
        let (id, description) = match header.split_once(char::is_whitespace) {
            Some((id, rest)) => (id.to_string(), Some(rest.trim().to_string())),
            None => (header, None),
        };

        let mut converted = SequenceRecord::new(id, Sequence::new(record.seq().to_vec()));
        if let Some(description) = description.filter(|d| !d.is_empty()) {
            converted = converted.with_description(description);
        }
        if let Some(qual) = record.qual() {
            converted = converted.with_quality(decode_quality(qual)?);
        }
        Ok(converted)
    }
}

/// Phred+33 quality string to scores. Bytes below `!` are a parse error.
pub fn decode_quality(qual: &[u8]) -> Result<Vec<f64>> {
    qual.iter()
        .enumerate()
        .map(|(pos, &b)| {
            b.checked_sub(PHRED_OFFSET).map(f64::from).ok_or_else(|| {
                PlasmidError::parse(
                    "quality string",
                    format!("byte {} at position {} is below the Phred+33 offset", b, pos),
                )
            })
        })
        .collect()
}

/// Scores to a Phred+33 quality string, rounding to the nearest integer.
pub fn encode_quality(quality: &[f64]) -> Vec<u8> {
    quality
        .iter()
        .map(|&q| q.round().clamp(0.0, MAX_PHRED) as u8 + PHRED_OFFSET)
        .collect()
}

/// Load every FASTQ record of a file as a sample.
pub fn load_samples<P: AsRef<Path>>(path: P) -> Result<Vec<Sample>> {
    FastxParser::parse_file(path)?
        .iter()
        .map(Sample::from_record)
        .collect()
}

/// Load every record of a FASTA/FASTQ file as a primer.
pub fn load_primers<P: AsRef<Path>>(path: P) -> Result<Vec<Primer>> {
    FastxParser::parse_file(path)?
        .iter()
        .map(Primer::from_record)
        .collect()
}

/// Write samples as FASTQ records.
pub fn write_fastq<'a, W, I>(writer: &mut W, samples: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Sample>,
{
    for sample in samples {
        writer.write_all(b"@")?;
        writer.write_all(sample.identifier().as_bytes())?;
        writer.write_all(b"\n")?;
        writer.write_all(sample.sequence().as_bytes())?;
        writer.write_all(b"\n+\n")?;
        writer.write_all(&encode_quality(sample.quality()))?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Write score traces as TSV: identifier, position, quality, score, kept flag.
pub fn write_score_table<'a, W, I>(writer: &mut W, outcomes: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = (&'a Sample, &'a TrimOutcome)>,
{
    writeln!(writer, "identifier\tposition\tquality\tscore\tkept")?;
    for (original, outcome) in outcomes {
        for (pos, (quality, score)) in original.quality().iter().zip(&outcome.scores).enumerate() {
            let kept = pos >= outcome.start && pos < outcome.end;
            writeln!(
                writer,
                "{}\t{}\t{}\t{:.6}\t{}",
                original.identifier(),
                pos,
                quality,
                score,
                u8::from(kept)
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trim::{ErrorProbabilityTrimmer, SampleTrimmingService};
    use std::io::Cursor;

    #[test]
    fn test_quality_codec() {
        assert_eq!(decode_quality(b"!+5I").unwrap(), vec![0.0, 10.0, 20.0, 40.0]);
        assert_eq!(encode_quality(&[0.0, 10.4, 19.6, 40.0, 120.0]), b"!+5I~".to_vec());
    }

    #[test]
    fn test_quality_below_offset_is_rejected() {
        let err = decode_quality(b"II I").unwrap_err();
        assert!(matches!(err, PlasmidError::Parse { .. }));
        assert!(err.to_string().contains("position 2"));
    }

    #[test]
    fn test_parse_fastq_reader() {
        let data = b"@read1 sample one\nACGT\n+\nII5!\n@read2\nGG\n+\n++\n";
        let records = FastxParser::parse_reader(Cursor::new(&data[..])).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "read1");
        assert_eq!(records[0].description.as_deref(), Some("sample one"));
        assert_eq!(records[0].quality.as_deref(), Some(&[40.0, 40.0, 20.0, 0.0][..]));
        assert_eq!(records[1].sequence.to_string(), "GG");
    }

    #[test]
    fn test_parse_fasta_reader_has_no_quality() {
        let data = b">M13F\nGTAAAACGAC\nGGCCAGT\n";
        let records = FastxParser::parse_reader(Cursor::new(&data[..])).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].quality.is_none());
        assert_eq!(records[0].sequence.len(), 17);
    }

    #[test]
    fn test_write_fastq() {
        let sample = Sample::new("r1", Sequence::from("ACG"), vec![40.0, 20.0, 0.0]).unwrap();
        let mut out = Vec::new();
        write_fastq(&mut out, [&sample]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "@r1\nACG\n+\nI5!\n");
    }

    #[test]
    fn test_write_score_table() {
        let sample = Sample::new("r1", Sequence::from("ACGT"), vec![40.0; 4]).unwrap();
        let outcome = ErrorProbabilityTrimmer::default().trim(&sample).unwrap();
        let mut out = Vec::new();
        write_score_table(&mut out, [(&sample, &outcome)]).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "identifier\tposition\tquality\tscore\tkept");
        assert!(lines[1].starts_with("r1\t0\t40\t0.049900\t1"));
    }
}
