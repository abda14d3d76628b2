//! Error handling for the plasmid CLI

use plasmid_core::PlasmidError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Input/Output error: {message}")]
    Io { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Alignment engine error: {engine} - {message}")]
    Alignment { engine: String, message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Trimming error: {message}")]
    Trimming { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn invalid_format<S: Into<String>>(message: S) -> Self {
        Self::InvalidFormat { message: message.into() }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<PlasmidError> for CliError {
    fn from(err: PlasmidError) -> Self {
        match err {
            PlasmidError::Validation { message } => Self::Validation { message },
            PlasmidError::NumericDegeneracy { message } => Self::Trimming { message },
            PlasmidError::Alignment { engine, message } => Self::Alignment { engine, message },
            PlasmidError::Io(err) => Self::io(err.to_string()),
            err @ (PlasmidError::Parse { .. } | PlasmidError::EmptyInput { .. }) => {
                Self::invalid_format(err.to_string())
            }
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the file path is correct: {}\n\
                 • Ensure you have read permissions for the file",
                path.display()
            ));
        }

        CliError::InvalidFormat { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Reads to trim must be FASTQ (plain or gzipped) so that qualities are available\n\
                 • Ensure the file is not corrupted or truncated"
            );
        }

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your plasmid.toml configuration file\n\
                 • Use 'plasmid config' to generate a sample configuration"
            );
        }

        CliError::Validation { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • --cutoff must lie strictly between 0 and 1\n\
                 • Gap penalties must be non-negative numbers"
            );
        }

        CliError::Trimming { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Drop --strict to keep processing reads with no usable bases\n\
                 • Raise --cutoff to accept lower-quality bases"
            );
        }

        _ => {}
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(1);
}
