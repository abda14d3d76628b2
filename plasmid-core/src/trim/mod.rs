//! Sample trimming services
//!
//! A trimming service takes a quality-annotated [`Sample`] and returns the
//! retained half-open window `[start, end)` together with a new, renamed
//! sample and the per-base score trace used to choose the window. Offsets are
//! always relative to the untrimmed input so callers can map trimmed
//! coordinates back onto the source read.

pub mod error_probability;
pub mod sliding_window;

pub use error_probability::{ErrorProbabilityTrimmer, TrimParams};
pub use sliding_window::{SlidingWindowParams, SlidingWindowTrimmer};

use crate::error::Result;
use crate::sample::Sample;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Result of trimming a single sample.
#[derive(Debug, Clone, PartialEq)]
pub struct TrimOutcome {
    /// The trimmed sample, `original[start..end]`.
    pub sample: Sample,
    /// First retained base in the original read.
    pub start: usize,
    /// One past the last retained base in the original read.
    pub end: usize,
    /// Per-base scores of the original read (length N).
    pub scores: Vec<f64>,
}

impl TrimOutcome {
    /// Length of the untrimmed read.
    pub fn original_length(&self) -> usize {
        self.scores.len()
    }

    pub fn trimmed_length(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn summary(&self) -> TrimSummary {
        TrimSummary {
            identifier: self.sample.identifier().to_string(),
            original_length: self.original_length(),
            start: self.start,
            end: self.end,
            trimmed_length: self.trimmed_length(),
        }
    }

    pub fn into_parts(self) -> (Sample, usize, usize, Vec<f64>) {
        (self.sample, self.start, self.end, self.scores)
    }
}

/// Serializable per-read trimming report line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimSummary {
    pub identifier: String,
    pub original_length: usize,
    pub start: usize,
    pub end: usize,
    pub trimmed_length: usize,
}

/// A strategy that isolates the high-confidence region of a read.
pub trait SampleTrimmingService: Send + Sync {
    fn trim(&self, sample: &Sample) -> Result<TrimOutcome>;
    fn name(&self) -> &'static str;
}

/// Trim many samples in parallel; results are returned in input order.
pub fn trim_batch<T>(service: &T, samples: &[Sample]) -> Vec<Result<TrimOutcome>>
where
    T: SampleTrimmingService + ?Sized,
{
    samples.par_iter().map(|sample| service.trim(sample)).collect()
}

pub(crate) fn output_identifier(prefix: &str, identifier: &str, suffix: &str) -> String {
    format!("{}{}{}", prefix, identifier, suffix)
}
