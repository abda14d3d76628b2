//! Sliding-window mean-quality trimming.
//!
//! Scans from the 5' end with a window of `window_size` bases and cuts the
//! read at the start of the first window whose mean Phred quality falls below
//! `min_mean_quality`. The score trace holds, for every base, the mean quality
//! of the window starting there (shortened at the 3' end).

use super::{output_identifier, SampleTrimmingService, TrimOutcome};
use crate::error::{PlasmidError, Result};
use crate::sample::Sample;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlidingWindowParams {
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    #[serde(default = "default_min_mean_quality")]
    pub min_mean_quality: f64,
    #[serde(default)]
    pub prefix: String,
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

fn default_window_size() -> usize { 4 }
fn default_min_mean_quality() -> f64 { 20.0 }
fn default_suffix() -> String { "_trimmed".to_string() }

impl Default for SlidingWindowParams {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            min_mean_quality: default_min_mean_quality(),
            prefix: String::new(),
            suffix: default_suffix(),
        }
    }
}

impl SlidingWindowParams {
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(PlasmidError::validation("window size must be at least 1"));
        }
        if !self.min_mean_quality.is_finite() || self.min_mean_quality < 0.0 {
            return Err(PlasmidError::validation(format!(
                "minimum mean quality must be a non-negative number, got {}",
                self.min_mean_quality
            )));
        }
        Ok(())
    }
}

/// Mean quality of the window starting at each base.
pub fn window_means(quality: &[f64], window_size: usize) -> Vec<f64> {
    (0..quality.len())
        .map(|i| {
            let window = &quality[i..(i + window_size).min(quality.len())];
            window.iter().sum::<f64>() / window.len() as f64
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct SlidingWindowTrimmer {
    params: SlidingWindowParams,
}

impl SlidingWindowTrimmer {
    pub fn new(params: SlidingWindowParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SlidingWindowParams {
        &self.params
    }
}

impl SampleTrimmingService for SlidingWindowTrimmer {
    fn trim(&self, sample: &Sample) -> Result<TrimOutcome> {
        if sample.is_empty() {
            return Err(PlasmidError::validation(format!(
                "cannot trim empty sample '{}'",
                sample.identifier()
            )));
        }

        let len = sample.len();
        let window_size = self.params.window_size.min(len);
        let scores = window_means(sample.quality(), window_size);

        // Only full-length windows may trigger a cut.
        let end = scores[..=len - window_size]
            .iter()
            .position(|&mean| mean < self.params.min_mean_quality)
            .unwrap_or(len);

        log::debug!("Window-trimmed '{}' to [0, {}) of {} bases", sample.identifier(), end, len);

        let identifier = output_identifier(&self.params.prefix, sample.identifier(), &self.params.suffix);
        Ok(TrimOutcome {
            sample: sample.sub_sample(identifier, 0..end),
            start: 0,
            end,
            scores,
        })
    }

    fn name(&self) -> &'static str {
        "sliding-window"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sequence;

    fn sample(seq: &str, quality: Vec<f64>) -> Sample {
        Sample::new("read", Sequence::from(seq), quality).unwrap()
    }

    #[test]
    fn test_window_means() {
        let means = window_means(&[10.0, 20.0, 30.0, 40.0], 2);
        assert_eq!(means, vec![15.0, 25.0, 35.0, 40.0]);
    }

    #[test]
    fn test_cuts_at_first_failing_window() {
        let quality = vec![30.0, 30.0, 30.0, 30.0, 30.0, 30.0, 5.0, 5.0, 5.0, 5.0];
        let trimmer = SlidingWindowTrimmer::default();
        let outcome = trimmer.trim(&sample("ACGTACGTAC", quality)).unwrap();
        // Window at 4 averages (30 + 30 + 5 + 5) / 4 = 17.5 < 20.
        assert_eq!((outcome.start, outcome.end), (0, 4));
        assert_eq!(outcome.sample.sequence().to_string(), "ACGT");
        assert_eq!(outcome.scores.len(), 10);
    }

    #[test]
    fn test_window_larger_than_read() {
        let trimmer = SlidingWindowTrimmer::new(SlidingWindowParams {
            window_size: 10,
            ..SlidingWindowParams::default()
        })
        .unwrap();
        let outcome = trimmer.trim(&sample("ACG", vec![30.0, 30.0, 30.0])).unwrap();
        assert_eq!((outcome.start, outcome.end), (0, 3));

        let outcome = trimmer.trim(&sample("ACG", vec![5.0, 5.0, 5.0])).unwrap();
        assert!(outcome.is_empty());
    }

    #[test]
    fn test_parameter_validation() {
        let zero_window = SlidingWindowParams { window_size: 0, ..SlidingWindowParams::default() };
        assert!(SlidingWindowTrimmer::new(zero_window).is_err());

        let negative = SlidingWindowParams { min_mean_quality: -1.0, ..SlidingWindowParams::default() };
        assert!(SlidingWindowTrimmer::new(negative).is_err());
    }
}
