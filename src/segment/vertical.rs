//! Frequency-major segmentation: short vertical tracks (clicks, chirps)
//! spanning many bins in one or two frames.

use crate::constants::vertical_track::{DURATION_FRAMES, LOOKAHEAD_BINS, MAX_SCORE_MULTIPLIER};
use crate::error::{Error, Result};
use crate::event::{AcousticEvent, ScoreRange};
use crate::scale::FrequencyMode;
use crate::segment::{
    Crossing, EventTemplate, ExtentBounds, Run, ScoreAggregator, SegmentAxis, SegmentOutput,
    segment,
};
use crate::spectrogram::Spectrogram;
use tracing::debug;

/// Parameters for vertical track detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalTrackParams {
    /// Threshold applied to bin values within a frame.
    pub threshold: f64,
    /// Minimum track bandwidth in Hz (inclusive).
    pub min_bandwidth: f64,
    /// Maximum track bandwidth in Hz (inclusive).
    pub max_bandwidth: f64,
    /// Lower edge of the searched band.
    pub min_hz: f64,
    /// Upper edge of the searched band.
    pub max_hz: f64,
    /// Emit a track still open at the top of the band.
    pub close_open_event_at_end: bool,
}

/// The bins of one frame; runs span bins, events last a fixed number of frames.
struct FrequencyAxis<'a> {
    template: &'a EventTemplate,
    frame: usize,
    min_hz: f64,
    bin_width: f64,
}

impl SegmentAxis for FrequencyAxis<'_> {
    fn lookahead(&self) -> usize {
        LOOKAHEAD_BINS
    }

    #[allow(clippy::cast_precision_loss)]
    fn extent(&self, run: &Run) -> f64 {
        (run.len() as f64 * self.bin_width).round()
    }

    #[allow(clippy::cast_precision_loss)]
    fn event(&self, run: &Run) -> Result<AcousticEvent> {
        let time = &self.template.scale.time;
        let low = self.min_hz + (run.start as f64 * self.bin_width).round();
        let event = AcousticEvent::new(
            time.row_to_time(self.frame),
            DURATION_FRAMES as f64 * time.frame_offset(),
            low,
            low + self.extent(run),
        )?;
        Ok(self.template.apply(event))
    }
}

/// Detect vertical tracks in a linear-scale spectrogram.
///
/// Each interior frame keeps only the band cells that are local maxima in
/// time, with negative values floored at zero. Frames whose strongest cell
/// stays below the threshold are skipped; the others are scanned from the
/// bottom of the band upwards. Scores are normalised against
/// `[0, 5 * threshold]`, and the intensity array adds each track's score to
/// its frame.
pub fn detect_vertical_tracks<G>(
    spectrogram: &Spectrogram,
    params: &VerticalTrackParams,
    aggregator: &G,
    template: &EventTemplate,
) -> Result<SegmentOutput>
where
    G: ScoreAggregator + ?Sized,
{
    if spectrogram.mode() != FrequencyMode::Linear {
        return Err(Error::UnsupportedFrequencyMode {
            mode: "vertical track".to_string(),
        });
    }

    let score_range = ScoreRange::new(0.0, MAX_SCORE_MULTIPLIER * params.threshold)?;
    let crossing = Crossing {
        threshold: params.threshold,
        close_open_event_at_end: params.close_open_event_at_end,
    };
    let bounds = ExtentBounds::closed(params.min_bandwidth, params.max_bandwidth);

    let frequency = &spectrogram.scale().frequency;
    let data = spectrogram.data();
    let frames = spectrogram.frame_count();
    let min_bin = frequency.hz_to_bin(params.min_hz, FrequencyMode::Linear);
    let max_bin = frequency
        .hz_to_bin(params.max_hz, FrequencyMode::Linear)
        .min(spectrogram.bin_count());

    let mut intensity = vec![0.0; frames];
    let mut events = Vec::new();
    if min_bin >= max_bin {
        debug!(
            "Band {}-{} Hz holds no bins, no vertical tracks searched",
            params.min_hz, params.max_hz
        );
        return Ok(SegmentOutput { events, intensity });
    }

    let mut bins = vec![0.0; max_bin - min_bin];
    for frame in 1..frames.saturating_sub(1) {
        for (slot, bin) in bins.iter_mut().zip(min_bin..max_bin) {
            let value = data[[frame, bin]];
            let is_peak = value >= data[[frame - 1, bin]] && value >= data[[frame + 1, bin]];
            *slot = if is_peak { value.max(0.0) } else { 0.0 };
        }

        let strongest = bins.iter().copied().fold(0.0, f64::max);
        if strongest < params.threshold {
            continue;
        }

        let axis = FrequencyAxis {
            template,
            frame,
            min_hz: params.min_hz,
            bin_width: frequency.bin_width(),
        };
        for (_, event) in segment(&bins, &crossing, &axis, &bounds, aggregator, score_range) {
            intensity[frame] += event.score();
            events.push(event);
        }
    }

    debug!(
        "Found {} vertical track(s) across {frames} frames",
        events.len()
    );

    Ok(SegmentOutput { events, intensity })
}
