//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used in user-facing messages.
pub const APP_NAME: &str = "acoustic-events";

/// Default event name assigned by the detector.
pub const DEFAULT_EVENT_NAME: &str = "event";

/// Default number of standard deviations tolerated by the statistical filters.
pub const DEFAULT_SIGMA_THRESHOLD: f64 = 3.0;

/// Mel scale formula constants.
pub mod mel {
    /// Multiplier in `mel(f) = 2595 * log10(1 + f / 700)`.
    pub const SCALE: f64 = 2595.0;
    /// Corner frequency in Hz.
    pub const CORNER_HZ: f64 = 700.0;
}

/// Score normalisation constants.
pub mod score {
    /// Default lower bound of the raw score range.
    pub const DEFAULT_MIN: f64 = 0.0;
    /// Default upper bound of the raw score range.
    pub const DEFAULT_MAX: f64 = 1.0;
    /// Decimal places for score formatting.
    pub const DECIMAL_PLACES: usize = 4;
    /// Normalised score above which the per-unit summary counts an event as strong.
    pub const SUMMARY_THRESHOLD: f64 = 0.5;
    /// Largest number of time units the per-unit summary will allocate.
    pub const MAX_SUMMARY_UNITS: usize = 1_000_000;
}

/// Peak-based score aggregation.
pub mod peaks {
    /// Maximum number of local peaks averaged by the peak aggregator.
    pub const MAX_PEAKS: usize = 10;
}

/// Vertical track (frequency-major) detection constants.
pub mod vertical_track {
    /// Event duration in frames.
    pub const DURATION_FRAMES: usize = 2;
    /// Bins inspected past a candidate upper edge before the track is closed.
    pub const LOOKAHEAD_BINS: usize = 2;
    /// The normalised score saturates at this multiple of the threshold.
    pub const MAX_SCORE_MULTIPLIER: f64 = 5.0;
}

/// Syllable sequence modelling.
pub mod syllable {
    /// The configured maximum start gap sits this many standard deviations
    /// above the expected period.
    pub const GAP_SIGMAS: f64 = 3.0;
    /// Default largest start gap between syllables, in seconds.
    pub const DEFAULT_START_DIFFERENCE: f64 = 0.5;
    /// Default largest band edge difference between syllables, in Hz.
    pub const DEFAULT_HERTZ_GAP: f64 = 200.0;
    /// Default largest number of syllables in a sequence.
    pub const DEFAULT_MAX_COUNT: usize = 10;
    /// Default expected syllable period, in seconds.
    pub const DEFAULT_EXPECTED_PERIOD: f64 = 0.3;
}

/// Default detector band and thresholds.
pub mod detection {
    /// Default lower band edge in Hz.
    pub const DEFAULT_MIN_HERTZ: f64 = 0.0;
    /// Default upper band edge in Hz (clamped to Nyquist at run time).
    pub const DEFAULT_MAX_HERTZ: f64 = 11_025.0;
    /// Default score threshold.
    pub const DEFAULT_THRESHOLD: f64 = 0.5;
    /// Default minimum event duration in seconds.
    pub const DEFAULT_MIN_DURATION: f64 = 0.0;
    /// Default maximum event duration in seconds.
    pub const DEFAULT_MAX_DURATION: f64 = 60.0;
    /// Default minimum vertical track bandwidth in Hz.
    pub const DEFAULT_MIN_BANDWIDTH: f64 = 0.0;
    /// Default maximum vertical track bandwidth in Hz.
    pub const DEFAULT_MAX_BANDWIDTH: f64 = 11_025.0;
}

/// Environment variables read by the command-line driver.
pub mod env {
    /// Config file path.
    pub const CONFIG: &str = "ACOUSTIC_EVENTS_CONFIG";
    /// Output file path.
    pub const OUTPUT: &str = "ACOUSTIC_EVENTS_OUTPUT";
}
