//! Error types for the plasmid verification core.

use thiserror::Error;

/// Errors raised by the data model, the trimming services and the alignment
/// boundary.
#[derive(Debug, Error)]
pub enum PlasmidError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Numeric degeneracy: {message}")]
    NumericDegeneracy { message: String },

    #[error("Alignment failed: {engine} - {message}")]
    Alignment { engine: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error in {source_name}: {message}")]
    Parse { source_name: String, message: String },

    #[error("Empty file or no sequences found: {source_name}")]
    EmptyInput { source_name: String },
}

impl PlasmidError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn numeric_degeneracy<S: Into<String>>(message: S) -> Self {
        Self::NumericDegeneracy { message: message.into() }
    }

    pub fn alignment<S: Into<String>, M: Into<String>>(engine: S, message: M) -> Self {
        Self::Alignment {
            engine: engine.into(),
            message: message.into(),
        }
    }

    pub fn parse<S: Into<String>, M: Into<String>>(source_name: S, message: M) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn empty_input<S: Into<String>>(source_name: S) -> Self {
        Self::EmptyInput { source_name: source_name.into() }
    }

    /// Whether the error describes malformed caller input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, PlasmidError>;
