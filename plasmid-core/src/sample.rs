//! Sequencing sample model: a read with per-base Phred quality.

use crate::error::{PlasmidError, Result};
use crate::types::{Position, Sequence, SequenceRecord};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A sequencing read with one Phred quality value per base.
///
/// The sequence and quality vectors always have the same length; this is
/// checked in [`Sample::new`] so that every downstream slice stays aligned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSample")]
pub struct Sample {
    identifier: String,
    sequence: Sequence,
    phred_quality: Vec<f64>,
}

/// Unchecked wire form; deserialization goes through [`Sample::new`].
#[derive(Deserialize)]
struct RawSample {
    identifier: String,
    sequence: Sequence,
    phred_quality: Vec<f64>,
}

impl TryFrom<RawSample> for Sample {
    type Error = PlasmidError;

    fn try_from(raw: RawSample) -> Result<Self> {
        Self::new(raw.identifier, raw.sequence, raw.phred_quality)
    }
}

impl Sample {
    pub fn new<S: Into<String>>(identifier: S, sequence: Sequence, phred_quality: Vec<f64>) -> Result<Self> {
        let identifier = identifier.into();
        if sequence.len() != phred_quality.len() {
            return Err(PlasmidError::validation(format!(
                "sample '{}' has {} bases but {} quality values",
                identifier,
                sequence.len(),
                phred_quality.len()
            )));
        }
        if let Some((idx, q)) = phred_quality
            .iter()
            .enumerate()
            .find(|(_, q)| !q.is_finite() || **q < 0.0)
        {
            return Err(PlasmidError::validation(format!(
                "sample '{}' has invalid Phred quality {} at position {}",
                identifier, q, idx
            )));
        }
        Ok(Self {
            identifier,
            sequence,
            phred_quality,
        })
    }

    /// Build a sample from a parsed FASTQ record. FASTA records carry no
    /// quality and are rejected.
    pub fn from_record(record: &SequenceRecord) -> Result<Self> {
        let quality = record.quality.clone().ok_or_else(|| {
            PlasmidError::validation(format!("record '{}' carries no quality values", record.id))
        })?;
        Self::new(record.id.clone(), record.sequence.clone(), quality)
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn quality(&self) -> &[f64] {
        &self.phred_quality
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// New sample over `[range.start, range.end)` of this one, renamed.
    pub(crate) fn sub_sample(&self, identifier: String, range: Range<Position>) -> Self {
        Self {
            identifier,
            sequence: self.sequence.slice(range.clone()),
            phred_quality: self.phred_quality[range].to_vec(),
        }
    }
}
