//! Event score aggregation over a run of values.

use crate::constants::peaks::MAX_PEAKS;
use serde::{Deserialize, Serialize};

/// Reduces the values under an event to a single score.
pub trait ScoreAggregator {
    /// Aggregate a non-empty slice. Implementations return 0.0 for an
    /// empty slice.
    fn aggregate(&self, values: &[f64]) -> f64;
}

/// Arithmetic mean of the values.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanScore;

impl ScoreAggregator for MeanScore {
    #[allow(clippy::cast_precision_loss)]
    fn aggregate(&self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Mean of the highest local peaks.
///
/// A peak is an interior value strictly greater than both neighbours and
/// above zero. Up to `max_peaks` of the highest peaks are averaged. A run
/// without peaks (monotonic or too short) scores its maximum value.
#[derive(Debug, Clone, Copy)]
pub struct PeakScore {
    /// Number of peaks averaged at most.
    pub max_peaks: usize,
}

impl Default for PeakScore {
    fn default() -> Self {
        Self {
            max_peaks: MAX_PEAKS,
        }
    }
}

impl ScoreAggregator for PeakScore {
    #[allow(clippy::cast_precision_loss)]
    fn aggregate(&self, values: &[f64]) -> f64 {
        let mut peaks: Vec<f64> = values
            .windows(3)
            .filter(|w| w[1] > w[0] && w[1] > w[2] && w[1] > 0.0)
            .map(|w| w[1])
            .collect();

        if peaks.is_empty() || self.max_peaks == 0 {
            return values.iter().copied().reduce(f64::max).unwrap_or(0.0);
        }

        peaks.sort_by(|a, b| b.total_cmp(a));
        peaks.truncate(self.max_peaks);
        peaks.iter().sum::<f64>() / peaks.len() as f64
    }
}

/// Aggregator selection as it appears in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregator {
    /// [`MeanScore`].
    #[default]
    Mean,
    /// [`PeakScore`] with the default peak count.
    Peak,
}

impl ScoreAggregator for Aggregator {
    fn aggregate(&self, values: &[f64]) -> f64 {
        match self {
            Self::Mean => MeanScore.aggregate(values),
            Self::Peak => PeakScore::default().aggregate(values),
        }
    }
}

impl std::fmt::Display for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mean => write!(f, "mean"),
            Self::Peak => write!(f, "peak"),
        }
    }
}
