//! Error types for startup and optimizer bookkeeping.
//!
//! Agent crashes and rays leaving the world are not errors; they are recorded
//! on the agent itself.

use std::path::PathBuf;

use thiserror::Error;

use super::evolution::CandidateId;

/// Invalid or unreadable configuration. Fatal before any generation runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Controller input count does not match the sensor layout.
    #[error("controller expects {expected} inputs but the configuration declares {actual}")]
    InputArity {
        /// Inputs the simulation produces.
        expected: usize,
        /// Inputs declared by the optimizer configuration.
        actual: usize,
    },
    /// Controller output count is not the three channels the simulation reads.
    #[error("controller must produce {expected} outputs but the configuration declares {actual}")]
    OutputArity {
        /// Outputs the simulation reads.
        expected: usize,
        /// Outputs declared by the optimizer configuration.
        actual: usize,
    },
    /// A saved controller does not have the layer widths the optimizer settings describe.
    #[error("candidate {candidate} has layers {actual:?}, expected {expected:?}")]
    Topology {
        /// Offending candidate.
        candidate: CandidateId,
        /// Layer widths from the optimizer settings.
        expected: Vec<usize>,
        /// Layer widths of the stored controller, `None` if its layers do not chain.
        actual: Option<Vec<usize>>,
    },
    /// A value is outside its legal range.
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
    /// Config file could not be read or written.
    #[error("config file {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Config file is not valid JSON for [`super::config::Config`].
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
}

/// The track collision mask could not be built.
#[derive(Debug, Error)]
pub enum TrackError {
    /// Track image could not be read.
    #[error("track image {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Track image could not be decoded.
    #[error("failed to decode track image: {0}")]
    Decode(String),
    /// Width or height is zero.
    #[error("track mask must have non-zero dimensions, got {width}x{height}")]
    Empty {
        /// Width in pixels.
        width: usize,
        /// Height in pixels.
        height: usize,
    },
    /// Pixel buffer is shorter than `width * height * 4`.
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize {
        /// Required byte count.
        expected: usize,
        /// Provided byte count.
        actual: usize,
    },
}

/// Misuse of the optimizer protocol, or checkpoint I/O failure.
#[derive(Debug, Error)]
pub enum EvolutionError {
    /// Fitness was reported for a candidate not in the current generation.
    #[error("candidate {0} is not part of the current generation")]
    UnknownCandidate(CandidateId),
    /// Fitness was reported twice for the same candidate.
    #[error("fitness for candidate {0} was already reported")]
    DuplicateReport(CandidateId),
    /// `next_generation` was called before every candidate was scored.
    #[error("{missing} candidate(s) have no reported fitness")]
    MissingFitness {
        /// Number of unscored candidates.
        missing: usize,
    },
    /// Fitness was requested while the generation is still running.
    #[error("generation is still running")]
    GenerationRunning,
    /// Checkpoint file could not be read or written.
    #[error("checkpoint {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Checkpoint contents are not valid JSON.
    #[error("malformed checkpoint: {0}")]
    Json(#[from] serde_json::Error),
}
