//! Error-probability trimming
//!
//! Richard Mott's alternative trimming method (phred's `-trim_alt`): each
//! base's Phred score is turned back into an error probability `p`, scored
//! as `cutoff - p`, and the read is cut to the maximum-scoring contiguous
//! subsequence found with a running sum that is clamped at zero.
//!
//! The boundaries are chosen as follows:
//!
//! 1. `s[0] = t[0]`, and `s[i] = max(0, s[i-1] + t[i])` for `i >= 1`. The
//!    first value is never clamped, so a poor first base leaves a negative
//!    score at index 0.
//! 2. `max_idx` is the first index holding the largest `s`.
//! 3. `start` is one past the last index before `max_idx` whose score is
//!    exactly `0.0`, or `0` if there is none.
//! 4. `end = max_idx + 1`: the base that completes the best window is kept.
//!
//! When the largest score is not positive no window carries net positive
//! quality. The trimmer then returns the empty window `[0, 0)`, or fails with
//! [`PlasmidError::NumericDegeneracy`] in strict mode.

use super::{output_identifier, SampleTrimmingService, TrimOutcome};
use crate::error::{PlasmidError, Result};
use crate::sample::Sample;
use serde::{Deserialize, Serialize};

/// Parameters for [`ErrorProbabilityTrimmer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimParams {
    /// Target error probability, strictly between 0 and 1.
    #[serde(default = "default_cutoff")]
    pub cutoff: f64,
    /// Prepended to the identifier of the trimmed sample.
    #[serde(default)]
    pub prefix: String,
    /// Appended to the identifier of the trimmed sample.
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

fn default_cutoff() -> f64 { 0.05 }
fn default_suffix() -> String { "_trimmed".to_string() }

impl Default for TrimParams {
    fn default() -> Self {
        Self {
            cutoff: default_cutoff(),
            prefix: String::new(),
            suffix: default_suffix(),
        }
    }
}

impl TrimParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.cutoff > 0.0 && self.cutoff < 1.0) {
            return Err(PlasmidError::validation(format!(
                "error probability cutoff must lie in (0, 1), got {}",
                self.cutoff
            )));
        }
        Ok(())
    }
}

/// The half-open window chosen by [`find_max_scoring_subsequence`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWindow {
    pub start: usize,
    pub end: usize,
    /// Cumulative score at `end - 1`.
    pub best_score: f64,
}

/// Estimated probability that a base call with quality `q` is wrong.
pub fn phred_to_error_probability(q: f64) -> f64 {
    10f64.powf(q / -10.0)
}

/// Per-base `cutoff - p_i` scores; positive for bases better than the cutoff.
pub fn transform_quality(quality: &[f64], cutoff: f64) -> Vec<f64> {
    quality
        .iter()
        .map(|&q| cutoff - phred_to_error_probability(q))
        .collect()
}

/// Running sum of `values` that resets to exactly `0.0` whenever it would go
/// negative. The first element is copied through unclamped.
pub fn clamped_cumulative_sum(values: &[f64]) -> Vec<f64> {
    let mut result = values.to_vec();
    for idx in 1..result.len() {
        let sum = result[idx - 1] + values[idx];
        result[idx] = if sum < 0.0 { 0.0 } else { sum };
    }
    result
}

/// Locate the maximum-scoring window in a clamped cumulative score trace.
///
/// Returns `None` for an empty trace. Ties on the maximum resolve to the
/// earliest index; reset points are found by exact comparison with `0.0`.
pub fn find_max_scoring_subsequence(scores: &[f64]) -> Option<ScoringWindow> {
    let first = *scores.first()?;
    let (max_idx, best_score) = scores
        .iter()
        .enumerate()
        .skip(1)
        .fold((0, first), |(best_idx, best), (idx, &s)| {
            if s > best {
                (idx, s)
            } else {
                (best_idx, best)
            }
        });

    let start = scores[..max_idx]
        .iter()
        .rposition(|&s| s == 0.0)
        .map_or(0, |zero_idx| zero_idx + 1);

    Some(ScoringWindow {
        start,
        end: max_idx + 1,
        best_score,
    })
}

/// Trims samples with Mott's maximum-scoring-subsequence method.
#[derive(Debug, Clone, Default)]
pub struct ErrorProbabilityTrimmer {
    params: TrimParams,
    strict: bool,
}

impl ErrorProbabilityTrimmer {
    pub fn new(params: TrimParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params, strict: false })
    }

    /// Fail with `NumericDegeneracy` instead of returning an empty window
    /// when no base scores above the cutoff.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn params(&self) -> &TrimParams {
        &self.params
    }
}

impl SampleTrimmingService for ErrorProbabilityTrimmer {
    fn trim(&self, sample: &Sample) -> Result<TrimOutcome> {
        if sample.is_empty() {
            return Err(PlasmidError::validation(format!(
                "cannot trim empty sample '{}'",
                sample.identifier()
            )));
        }

        let transformed = transform_quality(sample.quality(), self.params.cutoff);
        let scores = clamped_cumulative_sum(&transformed);
        let window = find_max_scoring_subsequence(&scores)
            .ok_or_else(|| PlasmidError::validation("empty score trace"))?;

        // A zero maximum at index 0 comes from t[0] == 0, which still keeps
        // the first base; any other non-positive maximum is degenerate.
        let keeps_first_base = window.end == 1 && scores[0] >= 0.0;
        let (start, end) = if window.best_score > 0.0 || keeps_first_base {
            (window.start, window.end)
        } else if self.strict {
            return Err(PlasmidError::numeric_degeneracy(format!(
                "no base of '{}' has an error probability below {}",
                sample.identifier(),
                self.params.cutoff
            )));
        } else {
            log::warn!(
                "No positive-scoring window in '{}' (best score {}); trimming to an empty read",
                sample.identifier(),
                window.best_score
            );
            (0, 0)
        };

        log::debug!(
            "Trimmed '{}' to [{}, {}) of {} bases",
            sample.identifier(),
            start,
            end,
            sample.len()
        );

        let identifier = output_identifier(&self.params.prefix, sample.identifier(), &self.params.suffix);
        Ok(TrimOutcome {
            sample: sample.sub_sample(identifier, start..end),
            start,
            end,
            scores,
        })
    }

    fn name(&self) -> &'static str {
        "error-probability"
    }
}
