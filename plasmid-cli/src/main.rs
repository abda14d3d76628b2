use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod error;

use commands::trim::TrimOverrides;
use config::{Config, TrimMethod};
use error::{print_error_and_exit, CliError};

#[derive(Parser)]
#[command(name = "plasmid")]
#[command(about = "Quality trimming and alignment of plasmid sequencing reads")]
#[command(version)]
#[command(long_about = "
Trims sequencing reads to their high-confidence region and aligns them
against a plasmid reference.

Examples:
  plasmid trim --input reads.fastq --output trimmed.fastq --report trim.json
  plasmid trim --input reads.fastq --output trimmed.fastq --method sliding-window
  plasmid align --query reads.fastq --target plasmid.fa --trim --both-strands
  plasmid config > plasmid.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of threads to use
    #[arg(short, long, global = true)]
    pub threads: Option<usize>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Trim FASTQ reads to their high-quality region
    Trim {
        /// Input reads (FASTQ, optionally gzipped)
        #[arg(short, long, required = true)]
        input: PathBuf,

        /// Output FASTQ file for trimmed reads
        #[arg(short, long, required = true)]
        output: PathBuf,

        /// Trimming method
        #[arg(long)]
        method: Option<TrimMethod>,

        /// Error probability cutoff, strictly between 0 and 1
        #[arg(long)]
        cutoff: Option<f64>,

        /// Prefix for trimmed read identifiers
        #[arg(long)]
        prefix: Option<String>,

        /// Suffix for trimmed read identifiers
        #[arg(long)]
        suffix: Option<String>,

        /// Window size for sliding-window trimming
        #[arg(long)]
        window_size: Option<usize>,

        /// Minimum mean window quality for sliding-window trimming
        #[arg(long)]
        min_mean_quality: Option<f64>,

        /// Leave trimmed reads shorter than this out of the output
        #[arg(long)]
        min_length: Option<usize>,

        /// Fail on reads without any base better than the cutoff
        #[arg(long)]
        strict: bool,

        /// JSON report with per-read trim windows
        #[arg(long)]
        report: Option<PathBuf>,

        /// TSV file with per-base score traces
        #[arg(long)]
        scores: Option<PathBuf>,
    },

    /// Locally align reads against reference sequences
    Align {
        /// Query reads (FASTA/FASTQ)
        #[arg(long, required = true)]
        query: PathBuf,

        /// Target sequences (FASTA)
        #[arg(long, required = true)]
        target: PathBuf,

        /// Output JSON file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Gap open penalty
        #[arg(long)]
        gap_open: Option<f64>,

        /// Gap extension penalty
        #[arg(long)]
        gap_extension: Option<f64>,

        /// Also try the reverse complement of each query
        #[arg(long)]
        both_strands: bool,

        /// Trim FASTQ queries before aligning
        #[arg(long)]
        trim: bool,
    },

    /// Print or save the effective configuration
    Config {
        /// Write the configuration here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn setup_logging(verbose: u8, quiet: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();

    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let threads = cli.threads.unwrap_or(config.general.threads);
    if threads == 0 {
        return Err(CliError::config("thread count must be at least 1").into());
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .context("Failed to set thread count")?;
    log::debug!("Using {} threads", threads);

    match cli.command {
        Commands::Trim {
            input,
            output,
            method,
            cutoff,
            prefix,
            suffix,
            window_size,
            min_mean_quality,
            min_length,
            strict,
            report,
            scores,
        } => {
            let overrides = TrimOverrides {
                method,
                cutoff,
                prefix,
                suffix,
                window_size,
                min_mean_quality,
                min_length,
                strict,
            };
            commands::trim::execute(&config, input, output, &overrides, report, scores)?;
        }

        Commands::Align {
            query,
            target,
            output,
            gap_open,
            gap_extension,
            both_strands,
            trim,
        } => {
            commands::align::execute(
                &config,
                query,
                target,
                output,
                gap_open,
                gap_extension,
                both_strands,
                trim,
            )?;
        }

        Commands::Config { output } => match output {
            Some(path) => {
                config.save_to_file(&path)?;
                log::info!("Configuration written to: {}", path.display());
            }
            None => print!("{}", config.to_toml()?),
        },
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose, cli.quiet)?;

    match run(cli) {
        Err(err) => match err.downcast_ref::<CliError>() {
            Some(cli_err) => print_error_and_exit(cli_err),
            None => Err(err),
        },
        ok => ok,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_trim_arguments() {
        let cli = Cli::try_parse_from([
            "plasmid", "-vv", "trim", "--input", "in.fastq", "--output", "out.fastq",
            "--method", "sliding-window", "--cutoff", "0.01", "--strict",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Trim { method, cutoff, strict, .. } => {
                assert_eq!(method, Some(TrimMethod::SlidingWindow));
                assert_eq!(cutoff, Some(0.01));
                assert!(strict);
            }
            _ => panic!("expected trim command"),
        }
    }
}
