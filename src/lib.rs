//! Poisson scan-statistic peak caller for CLIP-Seq data.
//!
//! Given transcript models, per-transcript expression rates and aligned
//! reads, the crate scans a fixed-size window along each transcript,
//! scores windows against a splice-aware Poisson background, and merges
//! significant windows into trimmed, re-scored peak calls.

pub mod align;
pub mod io;
pub mod peaks;
pub mod pipeline;
pub mod scan;
pub mod transcript;

pub use align::{alignment_midpoint, midpoints_for_transcript, AlignedRead, CigarOp};
pub use peaks::Peak;
pub use pipeline::{
    call_peaks, call_transcript, ExpressionTable, InMemoryReads, PeakCallConfig, PeakRecord,
    ReadSource,
};
pub use transcript::{Exon, Expression, Transcript};
