//! Sequence alignment boundary
//!
//! Verification logic depends only on [`SequenceAlignmentService`]: given a
//! query and a target it returns the best local alignment under an affine gap
//! model. Implementations must be deterministic and free of side effects.

#[cfg(feature = "local-align")] pub mod local;

#[cfg(feature = "local-align")] pub use local::LocalAligner;

use crate::error::{PlasmidError, Result};
use crate::types::Sequence;
use serde::{Deserialize, Serialize};
use std::cmp::max;

/// Scoring parameters for local alignment.
///
/// Penalties are positive costs; a gap of length `k` costs
/// `gap_open_penalty + k * gap_extension_penalty`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentParams {
    #[serde(default = "default_gap_open_penalty")]
    pub gap_open_penalty: f64,
    #[serde(default = "default_gap_extension_penalty")]
    pub gap_extension_penalty: f64,
    #[serde(default = "default_match_score")]
    pub match_score: f64,
    #[serde(default = "default_mismatch_score")]
    pub mismatch_score: f64,
}

fn default_gap_open_penalty() -> f64 { 2.0 }
fn default_gap_extension_penalty() -> f64 { 10.0 }
fn default_match_score() -> f64 { 1.0 }
fn default_mismatch_score() -> f64 { -1.0 }

impl Default for AlignmentParams {
    fn default() -> Self {
        Self {
            gap_open_penalty: default_gap_open_penalty(),
            gap_extension_penalty: default_gap_extension_penalty(),
            match_score: default_match_score(),
            mismatch_score: default_mismatch_score(),
        }
    }
}

impl AlignmentParams {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("gap open penalty", self.gap_open_penalty),
            ("gap extension penalty", self.gap_extension_penalty),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PlasmidError::validation(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if !self.match_score.is_finite() || !self.mismatch_score.is_finite() {
            return Err(PlasmidError::validation("match and mismatch scores must be finite"));
        }
        if self.match_score <= 0.0 {
            return Err(PlasmidError::validation(format!(
                "match score must be positive for local alignment, got {}",
                self.match_score
            )));
        }
        Ok(())
    }
}

/// A local alignment between a query and a target sequence.
///
/// Coordinates are zero-based, half-open and relative to the sequences passed
/// to [`SequenceAlignmentService::align`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceAlignment {
    /// Alignment score
    pub score: f64,
    pub query_start: usize,
    pub query_end: usize,
    pub target_start: usize,
    pub target_end: usize,
    pub matches: u32,
    pub mismatches: u32,
    /// Bases present in the query but not the target
    pub insertions: u32,
    /// Bases present in the target but not the query
    pub deletions: u32,
    /// CIGAR string with soft clips for unaligned query ends
    pub cigar: String,
}

impl SequenceAlignment {
    /// Identity percentage (0.0 to 100.0)
    pub fn identity(&self) -> f64 {
        let total_ops = self.matches + self.mismatches + self.insertions + self.deletions;
        if total_ops == 0 {
            return 0.0;
        }
        (self.matches as f64 / total_ops as f64) * 100.0
    }

    pub fn edit_distance(&self) -> u32 {
        self.mismatches + self.insertions + self.deletions
    }

    pub fn alignment_length(&self) -> usize {
        max(
            self.query_end - self.query_start,
            self.target_end - self.target_start,
        )
    }
}

/// A pairwise local alignment backend.
pub trait SequenceAlignmentService: Send + Sync {
    fn align(&self, query: &Sequence, target: &Sequence, params: &AlignmentParams) -> Result<SequenceAlignment>;
    fn name(&self) -> &'static str;
}

/// Reject empty inputs and invalid parameters before any alignment work.
pub fn validate_inputs(query: &Sequence, target: &Sequence, params: &AlignmentParams) -> Result<()> {
    params.validate()?;
    if query.is_empty() {
        return Err(PlasmidError::validation("query sequence is empty"));
    }
    if target.is_empty() {
        return Err(PlasmidError::validation("target sequence is empty"));
    }
    Ok(())
}
