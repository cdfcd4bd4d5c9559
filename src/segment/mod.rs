//! Score-to-event segmentation.
//!
//! [`segment_scores`] scans a per-frame score array across time;
//! [`detect_vertical_tracks`] scans the bins of each frame. Both run the
//! threshold-crossing machine in [`crossing`].

mod aggregate;
mod crossing;
mod score_array;
mod vertical;

pub use aggregate::{Aggregator, MeanScore, PeakScore, ScoreAggregator};
pub use crossing::{
    AcceptExtent, Crossing, EventTemplate, ExtentBounds, Run, SegmentAxis, find_runs, segment,
};
pub use score_array::{ScoreSegmentation, segment_scores};
pub use vertical::{VerticalTrackParams, detect_vertical_tracks};

use crate::error::{Error, Result};
use crate::event::AcousticEvent;

/// Events found by a detector together with its temporal intensity array.
#[derive(Debug, Clone, Default)]
pub struct SegmentOutput {
    /// Accepted events in scan order.
    pub events: Vec<AcousticEvent>,
    /// One value per frame.
    pub intensity: Vec<f64>,
}

/// Reject score arrays containing NaN or infinite values.
pub fn ensure_finite(scores: &[f64]) -> Result<()> {
    match scores.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        Some((index, &value)) => Err(Error::NonFiniteScore { index, value }),
        None => Ok(()),
    }
}
