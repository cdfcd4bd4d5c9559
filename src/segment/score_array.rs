//! Time-major segmentation of a per-frame score array.

use crate::error::Result;
use crate::event::AcousticEvent;
use crate::segment::{
    Crossing, EventTemplate, ExtentBounds, Run, ScoreAggregator, SegmentAxis, SegmentOutput,
    ensure_finite, segment,
};
use tracing::debug;

/// Parameters for segmenting a score array across time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreSegmentation {
    /// Threshold crossing policy.
    pub crossing: Crossing,
    /// Minimum event duration in seconds (exclusive).
    pub min_duration: f64,
    /// Maximum event duration in seconds (exclusive).
    pub max_duration: f64,
    /// Lower edge of the frequency band assigned to events.
    pub min_hz: f64,
    /// Upper edge of the frequency band assigned to events.
    pub max_hz: f64,
}

/// One score per frame; events span frames and carry the configured band.
struct TimeAxis<'a> {
    template: &'a EventTemplate,
    min_hz: f64,
    max_hz: f64,
}

impl SegmentAxis for TimeAxis<'_> {
    #[allow(clippy::cast_precision_loss)]
    fn extent(&self, run: &Run) -> f64 {
        run.len() as f64 * self.template.scale.time.frame_offset()
    }

    fn event(&self, run: &Run) -> Result<AcousticEvent> {
        let start = self.template.scale.time.row_to_time(run.start);
        let event = AcousticEvent::new(start, self.extent(run), self.min_hz, self.max_hz)?;
        Ok(self.template.apply(event))
    }
}

/// Turn a per-frame score array into events.
///
/// A run of frames becomes an event when its duration lies strictly between
/// the duration limits. The returned intensity array adds each event's score
/// to every frame the event covers.
pub fn segment_scores<G>(
    scores: &[f64],
    params: &ScoreSegmentation,
    aggregator: &G,
    template: &EventTemplate,
) -> Result<SegmentOutput>
where
    G: ScoreAggregator + ?Sized,
{
    ensure_finite(scores)?;

    let axis = TimeAxis {
        template,
        min_hz: params.min_hz,
        max_hz: params.max_hz,
    };
    let bounds = ExtentBounds::open(params.min_duration, params.max_duration);
    let found = segment(
        scores,
        &params.crossing,
        &axis,
        &bounds,
        aggregator,
        template.score_range,
    );

    let mut intensity = vec![0.0; scores.len()];
    let mut events = Vec::with_capacity(found.len());
    for (run, event) in found {
        for frame in &mut intensity[run.start..run.end] {
            *frame += event.score();
        }
        events.push(event);
    }

    debug!(
        "Segmented {} frames into {} event(s) at threshold {}",
        scores.len(),
        events.len(),
        params.crossing.threshold
    );

    Ok(SegmentOutput { events, intensity })
}
