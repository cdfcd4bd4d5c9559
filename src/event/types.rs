//! The acoustic event record.

use crate::constants::{DEFAULT_EVENT_NAME, score};
use crate::error::{Error, Result};
use crate::event::{Region, RegionState};
use crate::scale::{FrequencyMode, SpectralScale};

/// Raw score interval used to normalise scores into `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRange {
    min: f64,
    max: f64,
}

impl ScoreRange {
    /// Create a range. `max` must exceed `min` and both must be finite.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(Error::InvalidScoreRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Lower bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Map a raw score into `[0, 1]`, clipping at both ends.
    pub fn normalise(&self, raw: f64) -> f64 {
        ((raw - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

impl Default for ScoreRange {
    fn default() -> Self {
        Self {
            min: score::DEFAULT_MIN,
            max: score::DEFAULT_MAX,
        }
    }
}

/// A detected acoustic event.
///
/// The physical extent (seconds, Hertz) is authoritative. The matrix region
/// is derived from it under the attached [`SpectralScale`] and cached; any
/// change to the extent invalidates the cache until [`derive_region`] is
/// called again.
///
/// [`derive_region`]: AcousticEvent::derive_region
#[derive(Debug, Clone, PartialEq)]
pub struct AcousticEvent {
    name: String,
    source: Option<String>,
    segment_start: f64,
    start: f64,
    duration: f64,
    min_hz: f64,
    max_hz: f64,
    mode: FrequencyMode,
    scale: Option<SpectralScale>,
    region: RegionState,
    score: f64,
    normalised_score: f64,
    score_range: ScoreRange,
    component_starts: Vec<f64>,
}

impl AcousticEvent {
    /// Create an event from its physical extent.
    ///
    /// # Arguments
    ///
    /// * `start` - Start time in seconds, relative to the analysed segment
    /// * `duration` - Duration in seconds
    /// * `min_hz` - Lower frequency bound
    /// * `max_hz` - Upper frequency bound
    pub fn new(start: f64, duration: f64, min_hz: f64, max_hz: f64) -> Result<Self> {
        check_extent(start, duration, min_hz, max_hz)?;
        Ok(Self {
            name: DEFAULT_EVENT_NAME.to_string(),
            source: None,
            segment_start: 0.0,
            start,
            duration,
            min_hz,
            max_hz,
            mode: FrequencyMode::Linear,
            scale: None,
            region: RegionState::Unset,
            score: 0.0,
            normalised_score: 0.0,
            score_range: ScoreRange::default(),
            component_starts: vec![start],
        })
    }

    /// Reconstruct an event from a stored bounding box.
    pub fn from_region(region: Region, scale: SpectralScale, mode: FrequencyMode) -> Result<Self> {
        let (start, duration) = scale.time.rows_to_span(region.top, region.bottom);
        let (min_hz, max_hz) = scale.frequency.bins_to_band(region.left, region.right, mode);
        let mut event = Self::new(start, duration, min_hz, max_hz)?;
        event.mode = mode;
        event.scale = Some(scale);
        event.region = RegionState::Derived(region);
        Ok(event)
    }

    /// Set the event label.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the source recording identifier.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Anchor the event to a segment starting `offset` seconds into the recording.
    #[must_use]
    pub fn with_segment_start(mut self, offset: f64) -> Self {
        let shift = offset - self.segment_start;
        self.segment_start = offset;
        for component in &mut self.component_starts {
            *component += shift;
        }
        self
    }

    /// Set the frequency mode. Invalidates the cached region.
    #[must_use]
    pub fn with_mode(mut self, mode: FrequencyMode) -> Self {
        self.mode = mode;
        self.region = RegionState::Unset;
        self
    }

    /// Attach scales and derive the matrix region.
    #[must_use]
    pub fn with_scale(mut self, scale: SpectralScale) -> Self {
        self.set_scale(scale);
        self
    }

    /// Attach scales and derive the matrix region.
    pub fn set_scale(&mut self, scale: SpectralScale) -> Region {
        self.scale = Some(scale);
        self.region = RegionState::Unset;
        self.compute_region(&scale)
    }

    /// Recompute the cached region from the physical extent.
    ///
    /// Returns `None` when no scales are attached.
    pub fn derive_region(&mut self) -> Option<Region> {
        let scale = self.scale?;
        Some(self.compute_region(&scale))
    }

    fn compute_region(&mut self, scale: &SpectralScale) -> Region {
        let (top, bottom) = scale.time.span_to_rows(self.start, self.duration);
        let (left, right) = scale
            .frequency
            .band_to_bins(self.min_hz, self.max_hz, self.mode);
        let region = Region::new(top, bottom, left, right);
        self.region = RegionState::Derived(region);
        region
    }

    /// Cached region, `None` if never derived or invalidated since.
    pub fn region(&self) -> Option<&Region> {
        self.region.region()
    }

    /// Cached region state.
    pub fn region_state(&self) -> RegionState {
        self.region
    }

    /// Set the raw score and the range used to normalise it.
    pub fn set_scores(&mut self, score: f64, range: ScoreRange) {
        self.score_range = range;
        self.set_score(score);
    }

    /// Set the raw score, renormalising with the current range.
    pub fn set_score(&mut self, score: f64) {
        self.score = score;
        self.normalised_score = self.score_range.normalise(score);
    }

    /// Event label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source recording identifier.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Offset of the analysed segment within the recording, in seconds.
    pub fn segment_start(&self) -> f64 {
        self.segment_start
    }

    /// Start time relative to the segment.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// End time relative to the segment.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Start time on the recording timeline.
    pub fn absolute_start(&self) -> f64 {
        self.segment_start + self.start
    }

    /// End time on the recording timeline.
    pub fn absolute_end(&self) -> f64 {
        self.segment_start + self.end()
    }

    /// Lower frequency bound in Hz.
    pub fn min_hz(&self) -> f64 {
        self.min_hz
    }

    /// Upper frequency bound in Hz.
    pub fn max_hz(&self) -> f64 {
        self.max_hz
    }

    /// Bandwidth in Hz, counting the top bin as occupied.
    ///
    /// Without attached scales the bin width is unknown and the plain
    /// frequency span is returned.
    pub fn bandwidth_hz(&self) -> f64 {
        let span = self.max_hz - self.min_hz;
        self.scale
            .map_or(span, |scale| span + scale.frequency.bin_width())
    }

    /// Frequency mode of the bounds.
    pub fn mode(&self) -> FrequencyMode {
        self.mode
    }

    /// Attached scales.
    pub fn scale(&self) -> Option<&SpectralScale> {
        self.scale.as_ref()
    }

    /// Raw detector score.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Score normalised into `[0, 1]`.
    pub fn normalised_score(&self) -> f64 {
        self.normalised_score
    }

    /// Range used for normalisation.
    pub fn score_range(&self) -> ScoreRange {
        self.score_range
    }

    /// Recording-absolute start times of the merged components.
    pub fn component_starts(&self) -> &[f64] {
        &self.component_starts
    }

    /// Number of events merged into this one (1 for a simple event).
    pub fn component_count(&self) -> usize {
        self.component_starts.len()
    }

    /// Mean start-to-start interval between components.
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_period(&self) -> Option<f64> {
        let count = self.component_starts.len();
        if count < 2 {
            return None;
        }
        let first = self.component_starts[0];
        let last = self.component_starts[count - 1];
        Some((last - first) / (count - 1) as f64)
    }

    /// Whether two events belong to the same recording.
    pub fn same_source(&self, other: &Self) -> bool {
        self.source == other.source
    }

    /// Whether the time intervals intersect on the recording timeline.
    ///
    /// Frequency is ignored.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.absolute_start() < other.absolute_end() && other.absolute_start() < self.absolute_end()
    }

    /// First event in `events` from the same recording that overlaps this one.
    pub fn first_overlapping<'a>(&self, events: &'a [Self]) -> Option<&'a Self> {
        events
            .iter()
            .find(|other| self.same_source(other) && self.overlaps(other))
    }

    /// Grow this event to cover `other`.
    ///
    /// Time and frequency spans become their unions and components are
    /// pooled. The cached region is invalidated; the score is left to the
    /// caller.
    pub fn absorb(&mut self, other: &Self) {
        let start = self.absolute_start().min(other.absolute_start());
        let end = self.absolute_end().max(other.absolute_end());
        self.segment_start = self.segment_start.min(other.segment_start);
        self.start = start - self.segment_start;
        self.duration = end - start;
        self.min_hz = self.min_hz.min(other.min_hz);
        self.max_hz = self.max_hz.max(other.max_hz);
        self.region = RegionState::Unset;

        self.component_starts
            .extend_from_slice(&other.component_starts);
        self.component_starts.sort_by(f64::total_cmp);
    }
}

fn check_extent(start: f64, duration: f64, min_hz: f64, max_hz: f64) -> Result<()> {
    let reason = if ![start, duration, min_hz, max_hz].iter().all(|v| v.is_finite()) {
        "all bounds must be finite".to_string()
    } else if start < 0.0 {
        format!("start time must be non-negative, got {start}")
    } else if duration <= 0.0 {
        format!("duration must be positive, got {duration}")
    } else if min_hz < 0.0 {
        format!("minimum frequency must be non-negative, got {min_hz}")
    } else if max_hz < min_hz {
        format!("maximum frequency {max_hz} is below minimum frequency {min_hz}")
    } else {
        return Ok(());
    };
    Err(Error::InvalidEvent { reason })
}
