//! Error types for acoustic event detection.

/// Result type alias for acoustic event operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
///
/// Configuration and malformed-input errors are raised before any
/// segmentation work starts. Degenerate event geometry is never an error:
/// the filter stages reject such events instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to read a spectrogram input document.
    #[error("failed to read input file '{path}'")]
    InputRead {
        /// Path to the input file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a spectrogram input document.
    #[error("failed to parse input file '{path}'")]
    InputParse {
        /// Path to the input file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Time or frequency scale parameters are unusable.
    #[error("invalid scale: {reason}")]
    InvalidScale {
        /// Description of the problem.
        reason: String,
    },

    /// Spectrogram matrix has no frames or no bins.
    #[error("spectrogram matrix is empty ({frames} frames x {bins} bins)")]
    EmptyMatrix {
        /// Number of frames (rows).
        frames: usize,
        /// Number of frequency bins (columns).
        bins: usize,
    },

    /// Spectrogram matrix rows have inconsistent lengths.
    #[error("spectrogram row {row} has {actual} bins, expected {expected}")]
    RaggedMatrix {
        /// Index of the offending row.
        row: usize,
        /// Expected number of bins.
        expected: usize,
        /// Actual number of bins.
        actual: usize,
    },

    /// Spectrogram matrix contains NaN or infinite values.
    #[error("spectrogram cell ({row}, {column}) is not finite: {value}")]
    NonFiniteCell {
        /// Frame index.
        row: usize,
        /// Bin index.
        column: usize,
        /// The offending value.
        value: f64,
    },

    /// Score array is not aligned with the spectrogram frames.
    #[error("score array has {actual} values but the spectrogram has {expected} frames")]
    ScoreLengthMismatch {
        /// Number of spectrogram frames.
        expected: usize,
        /// Length of the score array.
        actual: usize,
    },

    /// Score array contains NaN or infinite values.
    #[error("score at index {index} is not finite: {value}")]
    NonFiniteScore {
        /// Index of the offending value.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// Event extent violates the event invariants.
    #[error("invalid event extent: {reason}")]
    InvalidEvent {
        /// Description of the violated invariant.
        reason: String,
    },

    /// Score range cannot normalise scores.
    #[error("invalid score range [{min}, {max}]: max must exceed min")]
    InvalidScoreRange {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// Detection mode cannot run on the given frequency scale.
    #[error("{mode} detection requires a linear frequency scale")]
    UnsupportedFrequencyMode {
        /// Name of the detection mode.
        mode: String,
    },
}
