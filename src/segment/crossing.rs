//! Threshold-crossing segmentation shared by the time-major and
//! frequency-major detectors.
//!
//! The scan is a two-state machine. Outside an event, the first value at or
//! above the threshold opens one. Inside, the first later value at or below
//! the threshold closes it, unless the axis asks for a look-ahead and the
//! mean over the closing value and the next `lookahead` values is still at
//! or above the threshold. The axis turns the resulting index run into
//! physical units and events; the acceptance predicate decides which runs
//! survive.

use crate::error::Result;
use crate::event::{AcousticEvent, ScoreRange};
use crate::scale::{FrequencyMode, SpectralScale};
use crate::segment::ScoreAggregator;
use tracing::{debug, trace};

/// Half-open run of indices `[start, end)` found above the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    /// First index inside the event.
    pub start: usize,
    /// Index at which the event closed.
    pub end: usize,
}

impl Run {
    /// Number of indices in the run.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the run is empty.
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Geometry of the axis being scanned.
pub trait SegmentAxis {
    /// Values inspected past a candidate closing index. The scan stops this
    /// many values short of the end of the input.
    fn lookahead(&self) -> usize {
        0
    }

    /// Physical length of a run (seconds for time, Hertz for frequency).
    fn extent(&self, run: &Run) -> f64;

    /// Build the event covering a run.
    fn event(&self, run: &Run) -> Result<AcousticEvent>;
}

/// Accept or reject a run by its physical length.
pub trait AcceptExtent {
    /// Whether a run of this extent becomes an event.
    fn accept(&self, extent: f64) -> bool;
}

/// Lower and upper limits on a run's extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtentBounds {
    /// Lower limit.
    pub min: f64,
    /// Upper limit.
    pub max: f64,
    /// Whether values exactly at a limit are accepted.
    pub inclusive: bool,
}

impl ExtentBounds {
    /// Accept only extents strictly between the limits.
    pub const fn open(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            inclusive: false,
        }
    }

    /// Accept extents between the limits, limits included.
    pub const fn closed(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            inclusive: true,
        }
    }
}

impl AcceptExtent for ExtentBounds {
    fn accept(&self, extent: f64) -> bool {
        if self.inclusive {
            self.min <= extent && extent <= self.max
        } else {
            self.min < extent && extent < self.max
        }
    }
}

/// Threshold and end-of-input policy for one scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    /// Opening/closing threshold.
    pub threshold: f64,
    /// Emit an event still open when the scan reaches the end of the input.
    pub close_open_event_at_end: bool,
}

/// Provenance and scoring shared by every event a detector creates.
#[derive(Debug, Clone, PartialEq)]
pub struct EventTemplate {
    /// Event label.
    pub name: String,
    /// Source recording identifier.
    pub source: Option<String>,
    /// Offset of the segment within the recording, in seconds.
    pub segment_start: f64,
    /// Frequency mode of the spectrogram.
    pub mode: FrequencyMode,
    /// Scales of the spectrogram.
    pub scale: SpectralScale,
    /// Range used to normalise event scores.
    pub score_range: ScoreRange,
}

impl EventTemplate {
    /// Stamp provenance and scales onto a freshly built event.
    pub fn apply(&self, event: AcousticEvent) -> AcousticEvent {
        let event = event
            .with_name(self.name.clone())
            .with_segment_start(self.segment_start)
            .with_mode(self.mode)
            .with_scale(self.scale);
        match &self.source {
            Some(source) => event.with_source(source.clone()),
            None => event,
        }
    }
}

/// Find the runs where `values` crosses the threshold.
pub fn find_runs(values: &[f64], crossing: &Crossing, lookahead: usize) -> Vec<Run> {
    let scan_end = values.len().saturating_sub(lookahead);
    let mut runs = Vec::new();
    let mut open: Option<usize> = None;

    for (i, &value) in values.iter().enumerate().take(scan_end) {
        match open {
            None if value >= crossing.threshold => open = Some(i),
            Some(start) if value <= crossing.threshold => {
                if lookahead > 0 {
                    let window = &values[i..=(i + lookahead).min(values.len() - 1)];
                    #[allow(clippy::cast_precision_loss)]
                    let mean = window.iter().sum::<f64>() / window.len() as f64;
                    if mean >= crossing.threshold {
                        continue;
                    }
                }
                open = None;
                runs.push(Run { start, end: i });
            }
            _ => {}
        }
    }

    if let Some(start) = open {
        if crossing.close_open_event_at_end {
            runs.push(Run {
                start,
                end: scan_end,
            });
        } else {
            trace!("Dropping event still open at index {start} when input ended");
        }
    }

    runs
}

/// Segment `values` into scored events.
///
/// Runs failing the acceptance predicate are dropped, as are runs whose
/// geometry cannot form a valid event. The event score is the aggregate of
/// the values inside the run. Returns each accepted run with its event.
pub fn segment<X, P, G>(
    values: &[f64],
    crossing: &Crossing,
    axis: &X,
    accept: &P,
    aggregator: &G,
    score_range: ScoreRange,
) -> Vec<(Run, AcousticEvent)>
where
    X: SegmentAxis + ?Sized,
    P: AcceptExtent + ?Sized,
    G: ScoreAggregator + ?Sized,
{
    find_runs(values, crossing, axis.lookahead())
        .into_iter()
        .filter_map(|run| {
            let extent = axis.extent(&run);
            if !accept.accept(extent) {
                trace!(
                    "Rejecting run {}..{} with extent {extent:.3}",
                    run.start, run.end
                );
                return None;
            }

            let mut event = match axis.event(&run) {
                Ok(event) => event,
                Err(e) => {
                    debug!("Skipping degenerate run {}..{}: {e}", run.start, run.end);
                    return None;
                }
            };
            event.set_scores(
                aggregator.aggregate(&values[run.start..run.end]),
                score_range,
            );
            Some((run, event))
        })
        .collect()
}
