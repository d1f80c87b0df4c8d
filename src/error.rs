//! Error types for the grid, the partitioner, record I/O and configuration.
//!
//! Each concern has its own enum; [`Error`] wraps them for callers that drive
//! the whole pipeline (read records, build a grid, partition).

use std::io;
use std::path::PathBuf;

/// Errors raised while building a spatial grid.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GridError {
    /// Cell size must be finite and strictly positive
    #[error("invalid bin size {0}: must be finite and > 0")]
    InvalidBinSize(f64),
}

/// Errors raised by the partitioner.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum PartitionError {
    /// Partitions or metrics were requested before any algorithm ran
    #[error("no partition computed: run a partitioning algorithm first")]
    NotComputed,

    /// The capacity limit leaves no headroom above the heaviest instance
    #[error("infeasible capacity: limit {limit} must exceed the largest instance bitsize {max_bitsize}")]
    InfeasibleCapacity {
        /// Configured capacity limit
        limit: u32,
        /// Largest single-instance bitsize in the grid
        max_bitsize: u32,
    },
}

/// Reasons a single instance record fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ParseInstanceError {
    /// A required field is absent
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    /// A field is present but is not a valid number
    #[error("field `{field}` is not a valid number: {value:?}")]
    InvalidNumber {
        /// Field name
        field: &'static str,
        /// Raw text
        value: String,
    },

    /// Coordinate parsed to NaN or infinity
    #[error("field `{0}` is not finite")]
    NonFinite(&'static str),

    /// More than four fields on the line
    #[error("unexpected trailing field {0:?}")]
    TrailingField(String),
}

/// Errors raised while reading or writing instance record files.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RecordError {
    /// Underlying reader/writer failure
    #[error("record I/O failed: {0}")]
    Io(#[from] io::Error),

    /// A line could not be parsed (1-based line number)
    #[error("malformed record on line {line}: {reason}")]
    Malformed {
        /// 1-based line number
        line: usize,
        /// What went wrong
        reason: ParseInstanceError,
    },
}

/// Errors raised by the random instance generator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum GeneratorError {
    /// The generation box has `ll` above or right of `ur`, or non-finite corners
    #[error("invalid generation bounds")]
    InvalidBounds,

    /// Cluster spread must be finite and non-negative
    #[error("invalid cluster sigma {0}")]
    InvalidSigma(f64),

    /// At least one cluster is required
    #[error("cluster count must be at least 1")]
    NoClusters,
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read config {path}: {source}")]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// The TOML text is malformed or has the wrong shape
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Any error the crate can produce.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// See [`GridError`]
    #[error(transparent)]
    Grid(#[from] GridError),
    /// See [`PartitionError`]
    #[error(transparent)]
    Partition(#[from] PartitionError),
    /// See [`RecordError`]
    #[error(transparent)]
    Record(#[from] RecordError),
    /// See [`ConfigError`]
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// See [`GeneratorError`]
    #[error(transparent)]
    Generator(#[from] GeneratorError),
}
