//! Affine-gap local alignment backed by rust-bio's pairwise aligner.

use super::{validate_inputs, AlignmentParams, SequenceAlignment, SequenceAlignmentService};
use crate::error::{PlasmidError, Result};
use crate::types::Sequence;
use bio::alignment::pairwise::Aligner;
use bio::alignment::{Alignment, AlignmentOperation};

/// Fixed-point factor between `f64` parameters and rust-bio's integer scores.
const SCORE_SCALE: f64 = 100.0;

/// Smith-Waterman style local aligner.
///
/// rust-bio scores are integers, so parameters are quantised to hundredths
/// and the reported score is scaled back. The query is the `x` sequence and
/// the target the `y` sequence; both are upper-cased before alignment.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalAligner;

impl LocalAligner {
    pub fn new() -> Self {
        Self
    }
}

fn scaled_score(name: &str, value: f64) -> Result<i32> {
    let scaled = (value * SCORE_SCALE).round();
    if !scaled.is_finite() || scaled.abs() > i32::MAX as f64 {
        return Err(PlasmidError::validation(format!(
            "{} is out of range for the local aligner, got {}",
            name, value
        )));
    }
    Ok(scaled as i32)
}

/// CIGAR with `=`/`X` matches, `I`/`D` indels and soft clips for the
/// unaligned query ends. rust-bio only renders CIGARs for semiglobal mode.
fn local_cigar(alignment: &Alignment) -> String {
    let mut runs: Vec<(char, usize)> = Vec::new();
    if alignment.xstart > 0 {
        runs.push(('S', alignment.xstart));
    }
    for op in &alignment.operations {
        let code = match op {
            AlignmentOperation::Match => '=',
            AlignmentOperation::Subst => 'X',
            AlignmentOperation::Ins => 'I',
            AlignmentOperation::Del => 'D',
            AlignmentOperation::Xclip(_) | AlignmentOperation::Yclip(_) => continue,
        };
        match runs.last_mut() {
            Some((last, len)) if *last == code => *len += 1,
            _ => runs.push((code, 1)),
        }
    }
    let tail = alignment.xlen.saturating_sub(alignment.xend);
    if tail > 0 {
        runs.push(('S', tail));
    }

    runs.iter().map(|(code, len)| format!("{}{}", len, code)).collect()
}

impl SequenceAlignmentService for LocalAligner {
    fn align(&self, query: &Sequence, target: &Sequence, params: &AlignmentParams) -> Result<SequenceAlignment> {
        validate_inputs(query, target, params)?;

        let gap_open = -scaled_score("gap open penalty", params.gap_open_penalty)?;
        let gap_extend = -scaled_score("gap extension penalty", params.gap_extension_penalty)?;
        let match_score = scaled_score("match score", params.match_score)?;
        let mismatch_score = scaled_score("mismatch score", params.mismatch_score)?;

        let x = query.as_bytes().to_ascii_uppercase();
        let y = target.as_bytes().to_ascii_uppercase();

        let score = move |a: u8, b: u8| if a == b { match_score } else { mismatch_score };
        let mut aligner = Aligner::with_capacity(x.len(), y.len(), gap_open, gap_extend, score);
        let alignment = aligner.local(&x, &y);

        let mut matches = 0u32;
        let mut mismatches = 0u32;
        let mut insertions = 0u32;
        let mut deletions = 0u32;
        for op in &alignment.operations {
            match op {
                AlignmentOperation::Match => matches += 1,
                AlignmentOperation::Subst => mismatches += 1,
                AlignmentOperation::Ins => insertions += 1,
                AlignmentOperation::Del => deletions += 1,
                AlignmentOperation::Xclip(_) | AlignmentOperation::Yclip(_) => {}
            }
        }

        let score = alignment.score as f64 / SCORE_SCALE;
        log::debug!(
            "Local alignment score {} over query [{}, {}) and target [{}, {})",
            score,
            alignment.xstart,
            alignment.xend,
            alignment.ystart,
            alignment.yend
        );

        Ok(SequenceAlignment {
            score,
            query_start: alignment.xstart,
            query_end: alignment.xend,
            target_start: alignment.ystart,
            target_end: alignment.yend,
            matches,
            mismatches,
            insertions,
            deletions,
            cigar: local_cigar(&alignment),
        })
    }

    fn name(&self) -> &'static str {
        "bio-local"
    }
}
