//! Configuration type definitions.

use crate::combine::{ProximityRule, ScoreCombination, StartGap};
use crate::constants::{DEFAULT_EVENT_NAME, DEFAULT_SIGMA_THRESHOLD, detection, score, syllable};
use crate::error::Result;
use crate::event::ScoreRange;
use crate::segment::Aggregator;
use serde::{Deserialize, Serialize};

/// Complete detector configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Segmentation settings.
    pub detection: DetectionConfig,

    /// Post-processing stages.
    pub postprocessing: PostProcessingConfig,
}

/// Which segmenter turns the input into events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMode {
    /// Threshold a per-frame score array across time.
    #[default]
    Score,
    /// Threshold the bins of each frame for short broadband tracks.
    VerticalTrack,
}

impl std::fmt::Display for DetectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Score => write!(f, "score"),
            Self::VerticalTrack => write!(f, "vertical_track"),
        }
    }
}

/// Segmentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Name given to every detected event.
    pub name: String,

    /// Segmenter to run.
    pub mode: DetectionMode,

    /// Lower edge of the searched band in Hz.
    pub min_hertz: f64,

    /// Upper edge of the searched band in Hz.
    pub max_hertz: f64,

    /// Opening/closing threshold.
    pub threshold: f64,

    /// Minimum event duration in seconds (score mode, exclusive).
    pub min_duration: f64,

    /// Maximum event duration in seconds (score mode, exclusive).
    pub max_duration: f64,

    /// Minimum track bandwidth in Hz (vertical track mode, inclusive).
    pub min_bandwidth: f64,

    /// Maximum track bandwidth in Hz (vertical track mode, inclusive).
    pub max_bandwidth: f64,

    /// How values under an event reduce to its score.
    pub aggregator: Aggregator,

    /// Raw score mapped to a normalised score of 0 (score mode).
    pub score_min: f64,

    /// Raw score mapped to a normalised score of 1 (score mode).
    pub score_max: f64,

    /// Emit an event still open when the input ends.
    pub close_open_event_at_end: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_EVENT_NAME.to_string(),
            mode: DetectionMode::default(),
            min_hertz: detection::DEFAULT_MIN_HERTZ,
            max_hertz: detection::DEFAULT_MAX_HERTZ,
            threshold: detection::DEFAULT_THRESHOLD,
            min_duration: detection::DEFAULT_MIN_DURATION,
            max_duration: detection::DEFAULT_MAX_DURATION,
            min_bandwidth: detection::DEFAULT_MIN_BANDWIDTH,
            max_bandwidth: detection::DEFAULT_MAX_BANDWIDTH,
            aggregator: Aggregator::default(),
            score_min: score::DEFAULT_MIN,
            score_max: score::DEFAULT_MAX,
            close_open_event_at_end: false,
        }
    }
}

impl DetectionConfig {
    /// Range used to normalise scores in score mode.
    pub fn score_range(&self) -> Result<ScoreRange> {
        ScoreRange::new(self.score_min, self.score_max)
    }
}

/// Post-processing stages. An absent section skips its stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessingConfig {
    /// Merge events whose time intervals overlap.
    pub combine_overlapping_events: bool,

    /// Score given to merged events.
    pub score_combination: ScoreCombination,

    /// Syllable sequence merging and filtering.
    pub syllable_sequence: Option<SyllableSequenceConfig>,

    /// Duration filter.
    pub duration: Option<DurationConfig>,

    /// Bandwidth filter.
    pub bandwidth: Option<BandwidthConfig>,

    /// Sideband activity filter.
    pub sideband_activity: Option<SidebandConfig>,
}

/// Merging of successive syllables into sequences, and the filter applied
/// to the resulting sequences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyllableSequenceConfig {
    /// Merge proximal events.
    pub combine_possible_syllable_sequence: bool,

    /// Largest gap in seconds between successive syllables.
    pub syllable_start_difference: f64,

    /// Largest difference in Hz between the low edges, and between the high
    /// edges, of successive syllables.
    pub syllable_hertz_gap: f64,

    /// Where the syllable gap is measured from (previous start by default).
    pub start_gap: StartGap,

    /// Reject sequences with too many syllables or an irregular period.
    pub filter_syllable_sequence: bool,

    /// Largest number of syllables in a sequence.
    pub syllable_max_count: usize,

    /// Expected start-to-start period in seconds.
    pub expected_period: f64,
}

impl Default for SyllableSequenceConfig {
    fn default() -> Self {
        Self {
            combine_possible_syllable_sequence: true,
            syllable_start_difference: syllable::DEFAULT_START_DIFFERENCE,
            syllable_hertz_gap: syllable::DEFAULT_HERTZ_GAP,
            start_gap: StartGap::default(),
            filter_syllable_sequence: false,
            syllable_max_count: syllable::DEFAULT_MAX_COUNT,
            expected_period: syllable::DEFAULT_EXPECTED_PERIOD,
        }
    }
}

impl SyllableSequenceConfig {
    /// Standard deviation of the syllable period.
    ///
    /// The largest start gap is taken to lie three standard deviations above
    /// the expected period.
    pub fn period_standard_deviation(&self) -> f64 {
        (self.syllable_start_difference - self.expected_period) / syllable::GAP_SIGMAS
    }

    /// Proximity rule used to merge syllables.
    pub fn proximity_rule(&self) -> ProximityRule {
        ProximityRule {
            start_difference: self.syllable_start_difference,
            hertz_gap: self.syllable_hertz_gap,
            start_gap: self.start_gap,
        }
    }
}

/// Duration filter settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationConfig {
    /// Expected event duration in seconds.
    pub expected_duration: f64,

    /// Standard deviation of the duration in seconds.
    pub duration_standard_deviation: f64,

    /// Standard deviations tolerated either side of the expected value.
    #[serde(default = "default_sigma_threshold")]
    pub sigma_threshold: f64,
}

/// Bandwidth filter settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandwidthConfig {
    /// Expected event bandwidth in Hz.
    pub expected_bandwidth: f64,

    /// Standard deviation of the bandwidth in Hz.
    pub bandwidth_standard_deviation: f64,

    /// Standard deviations tolerated either side of the expected value.
    #[serde(default = "default_sigma_threshold")]
    pub sigma_threshold: f64,
}

/// Sideband activity filter settings.
///
/// A zero buffer disables the check on that side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SidebandConfig {
    /// Height of the zone below the event in Hz.
    #[serde(default)]
    pub lower_hertz_buffer: f64,

    /// Height of the zone above the event in Hz.
    #[serde(default)]
    pub upper_hertz_buffer: f64,

    /// Largest mean cell value tolerated in either zone.
    pub max_average_sideband_decibels: f64,
}

fn default_sigma_threshold() -> f64 {
    DEFAULT_SIGMA_THRESHOLD
}
