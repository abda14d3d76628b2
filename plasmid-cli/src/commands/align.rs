//! Align command implementation - local alignment of reads against a reference

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use plasmid_core::io::FastxParser;
use plasmid_core::{
    AlignmentParams, LocalAligner, Sample, SequenceAlignment, SequenceAlignmentService, SequenceRecord,
    Sequence, Strand, TrimSummary,
};

use super::trim::{build_service, ensure_exists};
use crate::config::Config;
use crate::error::CliError;

/// One query/target comparison.
///
/// Alignment coordinates are relative to the aligned query; when the query was
/// trimmed first, `trim.start` maps them back onto the original read.
#[derive(Debug, Serialize)]
pub struct AlignmentReport {
    pub query: String,
    pub target: String,
    pub strand: Strand,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trim: Option<TrimSummary>,
    pub alignment: SequenceAlignment,
}

/// Align forward and, optionally, reverse-complemented query; the higher score
/// wins and ties keep the forward strand.
pub fn align_best_strand(
    aligner: &dyn SequenceAlignmentService,
    query: &Sequence,
    target: &Sequence,
    params: &AlignmentParams,
    both_strands: bool,
) -> plasmid_core::Result<(Strand, SequenceAlignment)> {
    let forward = aligner.align(query, target, params)?;
    if !both_strands {
        return Ok((Strand::Forward, forward));
    }
    let reverse = aligner.align(&query.reverse_complement(), target, params)?;
    if reverse.score > forward.score {
        Ok((Strand::Reverse, reverse))
    } else {
        Ok((Strand::Forward, forward))
    }
}

#[allow(clippy::too_many_arguments)]
pub fn execute(
    config: &Config,
    query: PathBuf,
    target: PathBuf,
    output: Option<PathBuf>,
    gap_open: Option<f64>,
    gap_extension: Option<f64>,
    both_strands: bool,
    trim: bool,
) -> Result<()> {
    log::info!("Starting local alignment");
    log::info!("Query file: {}", query.display());
    log::info!("Target file: {}", target.display());

    ensure_exists(&query)?;
    ensure_exists(&target)?;

    let mut params = config.align.clone();
    if let Some(gap_open) = gap_open {
        params.gap_open_penalty = gap_open;
    }
    if let Some(gap_extension) = gap_extension {
        params.gap_extension_penalty = gap_extension;
    }
    params.validate().map_err(CliError::from)?;

    let queries = FastxParser::parse_file(&query).map_err(CliError::from)?;
    let targets = FastxParser::parse_file(&target).map_err(CliError::from)?;

    let trimmer = if trim { Some(build_service(&config.trim)?) } else { None };
    let aligner = LocalAligner::new();

    let mut reports = Vec::with_capacity(queries.len() * targets.len());
    for record in &queries {
        let (sequence, trim_summary) = match &trimmer {
            Some(service) => {
                let outcome = service
                    .trim(&Sample::from_record(record).map_err(CliError::from)?)
                    .map_err(CliError::from)?;
                if outcome.is_empty() {
                    log::warn!("Query '{}' has no usable region after trimming; skipping", record.id);
                    continue;
                }
                (outcome.sample.sequence().clone(), Some(outcome.summary()))
            }
            None => (record.sequence.clone(), None),
        };

        for reference in &targets {
            let (strand, alignment) = align_best_strand(&aligner, &sequence, &reference.sequence, &params, both_strands)
                .map_err(CliError::from)?;
            log::info!(
                "{} vs {} ({}): score {}, identity {:.2}%",
                record.id,
                reference.id,
                strand,
                alignment.score,
                alignment.identity()
            );
            reports.push(report(record, reference, strand, trim_summary.clone(), alignment));
        }
    }

    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &reports).context("Failed to write alignments")?;
            writer.flush()?;
            log::info!("Alignments written to: {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, &reports).context("Failed to write alignments")?;
            writeln!(handle)?;
        }
    }

    Ok(())
}

fn report(
    query: &SequenceRecord,
    target: &SequenceRecord,
    strand: Strand,
    trim: Option<TrimSummary>,
    alignment: SequenceAlignment,
) -> AlignmentReport {
    AlignmentReport {
        query: query.id.clone(),
        target: target.id.clone(),
        strand,
        trim,
        alignment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_reverse_strand_is_detected() {
        let target = Sequence::from("TTTTTGGCCAATCGATTACCGGTTTTT");
        let query = Sequence::from("GGCCAATCGATTACC").reverse_complement();
        let params = AlignmentParams::default();

        let (strand, forward_only) = align_best_strand(&LocalAligner::new(), &query, &target, &params, false).unwrap();
        assert_eq!(strand, Strand::Forward);

        let (strand, best) = align_best_strand(&LocalAligner::new(), &query, &target, &params, true).unwrap();
        assert_eq!(strand, Strand::Reverse);
        assert_eq!(best.matches, 15);
        assert!(best.score > forward_only.score);
    }

    #[test]
    fn test_execute_with_trimming() -> Result<()> {
        let dir = tempdir()?;
        let query = dir.path().join("reads.fastq");
        let target = dir.path().join("plasmid.fa");
        let output = dir.path().join("alignments.json");

        std::fs::write(&query, "@read1\nAAGATTACAGGCC\n+\n++IIIIIIIIII+\n")?;
        std::fs::write(&target, ">pUC19\nTTTTTTGATTACAGGCTTTTTT\n")?;

        execute(&Config::default(), query, target, Some(output.clone()), None, None, true, true)?;

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
        let first = &json[0];
        assert_eq!(first["query"], "read1");
        assert_eq!(first["target"], "pUC19");
        assert_eq!(first["strand"], "Forward");
        assert_eq!(first["trim"]["start"], 2);
        assert!(first["alignment"]["matches"].as_u64().unwrap() >= 8);
        Ok(())
    }

    #[test]
    fn test_negative_penalty_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        let query = dir.path().join("q.fa");
        let target = dir.path().join("t.fa");
        std::fs::write(&query, ">q\nACGTACGT\n")?;
        std::fs::write(&target, ">t\nACGTACGT\n")?;

        let err = execute(&Config::default(), query, target, None, Some(-2.0), None, false, false).unwrap_err();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::Validation { .. })));
        Ok(())
    }

    #[test]
    fn test_fractional_penalties_are_accepted() -> Result<()> {
        let dir = tempdir()?;
        let query = dir.path().join("q.fa");
        let target = dir.path().join("t.fa");
        let output = dir.path().join("out.json");
        std::fs::write(&query, ">q\nACGTACGT\n")?;
        std::fs::write(&target, ">t\nTTACGTACGTTT\n")?;

        execute(&Config::default(), query, target, Some(output.clone()), Some(2.5), Some(0.5), false, false)?;

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
        assert_eq!(json[0]["alignment"]["score"], 8.0);
        assert_eq!(json[0]["alignment"]["cigar"], "8=");
        Ok(())
    }
}
