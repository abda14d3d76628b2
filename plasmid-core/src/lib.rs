//! Plasmid verification core library
//!
//! Sample and primer model, quality trimming services, the local alignment
//! boundary, and FASTA/FASTQ I/O.

pub mod error;
pub mod types;
pub mod primer;
pub mod sample;
pub mod trim;
pub mod align;
pub mod io;

// Re-export commonly used types and functions
pub use error::{PlasmidError, Result};
pub use types::{Position, Sequence, SequenceRecord, Strand};
pub use primer::Primer;
pub use sample::Sample;
pub use trim::{
    trim_batch, ErrorProbabilityTrimmer, SampleTrimmingService, SlidingWindowParams,
    SlidingWindowTrimmer, TrimOutcome, TrimParams, TrimSummary,
};
pub use align::{AlignmentParams, SequenceAlignment, SequenceAlignmentService};
#[cfg(feature = "local-align")]
pub use align::LocalAligner;

/// Version information for the plasmid-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
