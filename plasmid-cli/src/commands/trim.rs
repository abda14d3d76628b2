//! Trim command implementation - isolate the high-confidence region of each read

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use plasmid_core::io::{load_samples, write_fastq, write_score_table};
use plasmid_core::{
    trim_batch, ErrorProbabilityTrimmer, SampleTrimmingService, SlidingWindowTrimmer, TrimOutcome,
    TrimSummary,
};

use crate::config::{Config, TrimConfig, TrimMethod};
use crate::error::{CliError, CliResult};

/// Command-line values that take precedence over the configuration file.
#[derive(Debug, Clone, Default)]
pub struct TrimOverrides {
    pub method: Option<TrimMethod>,
    pub cutoff: Option<f64>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub window_size: Option<usize>,
    pub min_mean_quality: Option<f64>,
    pub min_length: Option<usize>,
    pub strict: bool,
}

impl TrimOverrides {
    pub fn apply(&self, base: &TrimConfig) -> TrimConfig {
        let mut config = base.clone();
        if let Some(method) = self.method {
            config.method = method;
        }
        if let Some(cutoff) = self.cutoff {
            config.error_probability.cutoff = cutoff;
        }
        if let Some(prefix) = &self.prefix {
            config.error_probability.prefix = prefix.clone();
            config.sliding_window.prefix = prefix.clone();
        }
        if let Some(suffix) = &self.suffix {
            config.error_probability.suffix = suffix.clone();
            config.sliding_window.suffix = suffix.clone();
        }
        if let Some(window_size) = self.window_size {
            config.sliding_window.window_size = window_size;
        }
        if let Some(min_mean_quality) = self.min_mean_quality {
            config.sliding_window.min_mean_quality = min_mean_quality;
        }
        if let Some(min_length) = self.min_length {
            config.min_length = min_length;
        }
        config.strict |= self.strict;
        config
    }
}

#[derive(Debug, Serialize)]
struct TrimReport {
    method: TrimMethod,
    total_reads: usize,
    written_reads: usize,
    reads: Vec<TrimSummary>,
}

/// Build the trimming service selected by the configuration.
pub fn build_service(config: &TrimConfig) -> CliResult<Box<dyn SampleTrimmingService>> {
    let service: Box<dyn SampleTrimmingService> = match config.method {
        TrimMethod::ErrorProbability => Box::new(
            ErrorProbabilityTrimmer::new(config.error_probability.clone())?.strict(config.strict),
        ),
        TrimMethod::SlidingWindow => Box::new(SlidingWindowTrimmer::new(config.sliding_window.clone())?),
    };
    Ok(service)
}

pub(crate) fn ensure_exists(path: &Path) -> CliResult<()> {
    if !path.exists() {
        return Err(CliError::file_not_found(path.to_path_buf()));
    }
    Ok(())
}

pub fn execute(
    config: &Config,
    input: PathBuf,
    output: PathBuf,
    overrides: &TrimOverrides,
    report: Option<PathBuf>,
    scores: Option<PathBuf>,
) -> Result<()> {
    log::info!("Starting read trimming");
    log::info!("Input file: {}", input.display());
    log::info!("Output file: {}", output.display());

    ensure_exists(&input)?;

    let trim_config = overrides.apply(&config.trim);
    let service = build_service(&trim_config)?;
    log::info!("Trimming method: {}", service.name());

    let samples = load_samples(&input).map_err(CliError::from)?;
    log::info!("Loaded {} reads", samples.len());

    let outcomes = trim_batch(service.as_ref(), &samples)
        .into_iter()
        .collect::<Result<Vec<TrimOutcome>, _>>()
        .map_err(CliError::from)?;

    let kept: Vec<&TrimOutcome> = outcomes
        .iter()
        .filter(|outcome| !outcome.is_empty() && outcome.trimmed_length() >= trim_config.min_length)
        .collect();

    let empty = outcomes.iter().filter(|outcome| outcome.is_empty()).count();
    if empty > 0 {
        log::warn!("{} reads had no usable region and were dropped", empty);
    }

    let file = File::create(&output)
        .with_context(|| format!("Failed to create output file: {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    write_fastq(&mut writer, kept.iter().map(|outcome| &outcome.sample))?;
    writer.flush()?;

    let original_bases: usize = samples.iter().map(|s| s.len()).sum();
    let kept_bases: usize = kept.iter().map(|outcome| outcome.trimmed_length()).sum();
    log::info!(
        "Wrote {} of {} reads ({} of {} bases retained)",
        kept.len(),
        samples.len(),
        kept_bases,
        original_bases
    );

    if let Some(report_path) = report {
        let trim_report = TrimReport {
            method: trim_config.method,
            total_reads: samples.len(),
            written_reads: kept.len(),
            reads: outcomes.iter().map(TrimOutcome::summary).collect(),
        };
        let file = File::create(&report_path)
            .with_context(|| format!("Failed to create report file: {}", report_path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &trim_report)
            .context("Failed to write trim report")?;
        log::info!("Report written to: {}", report_path.display());
    }

    if let Some(scores_path) = scores {
        let file = File::create(&scores_path)
            .with_context(|| format!("Failed to create score file: {}", scores_path.display()))?;
        let mut writer = BufWriter::new(file);
        write_score_table(&mut writer, samples.iter().zip(&outcomes))?;
        writer.flush()?;
        log::info!("Score traces written to: {}", scores_path.display());
    }

    log::info!("Trimming completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_overrides_take_precedence() {
        let base = TrimConfig::default();
        let overrides = TrimOverrides {
            method: Some(TrimMethod::SlidingWindow),
            cutoff: Some(0.01),
            suffix: Some(".t".to_string()),
            window_size: Some(6),
            ..TrimOverrides::default()
        };

        let merged = overrides.apply(&base);
        assert_eq!(merged.method, TrimMethod::SlidingWindow);
        assert_eq!(merged.error_probability.cutoff, 0.01);
        assert_eq!(merged.error_probability.suffix, ".t");
        assert_eq!(merged.sliding_window.suffix, ".t");
        assert_eq!(merged.sliding_window.window_size, 6);
        assert_eq!(merged.error_probability.prefix, "");
        assert!(!merged.strict);
    }

    #[test]
    fn test_invalid_cutoff_is_a_validation_error() {
        let mut config = TrimConfig::default();
        config.error_probability.cutoff = 1.5;
        assert!(matches!(build_service(&config), Err(CliError::Validation { .. })));
    }

    #[test]
    fn test_execute_writes_outputs() -> Result<()> {
        let mut input = NamedTempFile::new()?;
        write!(input, "@r1\nACGTACGT\n+\n+++III++\n@r2\nTTTT\n+\n++++\n")?;
        input.as_file().sync_all()?;

        let dir = tempdir()?;
        let output = dir.path().join("trimmed.fastq");
        let report = dir.path().join("report.json");
        let scores = dir.path().join("scores.tsv");

        execute(
            &Config::default(),
            input.path().to_path_buf(),
            output.clone(),
            &TrimOverrides::default(),
            Some(report.clone()),
            Some(scores.clone()),
        )?;

        let fastq = std::fs::read_to_string(&output)?;
        assert_eq!(fastq, "@r1_trimmed\nTAC\n+\nIII\n");

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&report)?)?;
        assert_eq!(json["method"], "error-probability");
        assert_eq!(json["total_reads"], 2);
        assert_eq!(json["written_reads"], 1);
        assert_eq!(json["reads"][0]["start"], 3);
        assert_eq!(json["reads"][0]["end"], 6);

        let table = std::fs::read_to_string(&scores)?;
        assert_eq!(table.lines().count(), 1 + 8 + 4);
        Ok(())
    }

    #[test]
    fn test_missing_input() {
        let result = execute(
            &Config::default(),
            PathBuf::from("/nonexistent/reads.fastq"),
            PathBuf::from("/tmp/out.fastq"),
            &TrimOverrides::default(),
            None,
            None,
        );
        let err = result.unwrap_err();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::FileNotFound { .. })));
    }
}
