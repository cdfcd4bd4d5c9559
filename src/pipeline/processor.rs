//! Single segment detection pipeline.

use crate::config::{Config, DetectionConfig, DetectionMode, validate_config};
use crate::error::{Error, Result};
use crate::event::{AcousticEvent, ScoreRange};
use crate::pipeline::{PostProcessor, StageCount};
use crate::segment::{
    Crossing, EventTemplate, ScoreSegmentation, SegmentOutput, VerticalTrackParams,
    detect_vertical_tracks, segment_scores,
};
use crate::spectrogram::Spectrogram;
use std::borrow::Cow;
use tracing::{debug, info, warn};

/// Result of running the detector over one segment.
#[derive(Debug, Clone, Default)]
pub struct DetectionResult {
    /// Events that survived post-processing.
    pub events: Vec<AcousticEvent>,
    /// Temporal intensity array, one value per frame.
    pub intensity: Vec<f64>,
    /// Surviving event count after each post-processing stage.
    pub stage_counts: Vec<StageCount>,
}

/// Segmenter plus post-processing for one audio segment at a time.
///
/// The detector holds no mutable state; one instance can serve many
/// threads, each with its own spectrogram.
#[derive(Debug, Clone)]
pub struct EventDetector {
    detection: DetectionConfig,
    score_range: ScoreRange,
    postprocessor: PostProcessor,
}

impl EventDetector {
    /// Validate the configuration and build the detector.
    pub fn new(config: Config) -> Result<Self> {
        validate_config(&config)?;
        let score_range = config.detection.score_range()?;
        Ok(Self {
            detection: config.detection,
            score_range,
            postprocessor: PostProcessor::new(config.postprocessing)?,
        })
    }

    /// Segmentation settings.
    pub fn detection(&self) -> &DetectionConfig {
        &self.detection
    }

    /// Detect events in one segment.
    ///
    /// # Arguments
    ///
    /// * `spectrogram` - The segment's spectrogram
    /// * `scores` - Per-frame scores; when absent, the mean of each frame over
    ///   the detection band is used (score mode only)
    /// * `source` - Identifier of the recording the segment belongs to
    /// * `segment_start` - Offset of the segment within the recording, in seconds
    pub fn detect(
        &self,
        spectrogram: &Spectrogram,
        scores: Option<&[f64]>,
        source: Option<&str>,
        segment_start: f64,
    ) -> Result<DetectionResult> {
        if !segment_start.is_finite() || segment_start < 0.0 {
            return Err(Error::InvalidEvent {
                reason: format!("segment start must be non-negative, got {segment_start}"),
            });
        }

        let detection = &self.detection;
        let nyquist = spectrogram.scale().frequency.nyquist();
        if detection.min_hertz >= nyquist {
            return Err(Error::ConfigValidation {
                message: format!(
                    "min_hertz {} lies at or above the spectrogram's top frequency {nyquist}",
                    detection.min_hertz
                ),
            });
        }

        let template = EventTemplate {
            name: detection.name.clone(),
            source: source.map(ToString::to_string),
            segment_start,
            mode: spectrogram.mode(),
            scale: *spectrogram.scale(),
            score_range: self.score_range,
        };
        let crossing = Crossing {
            threshold: detection.threshold,
            close_open_event_at_end: detection.close_open_event_at_end,
        };

        let SegmentOutput { events, intensity } = match detection.mode {
            DetectionMode::Score => {
                let scores = match scores {
                    Some(scores) => {
                        spectrogram.check_scores(scores)?;
                        Cow::Borrowed(scores)
                    }
                    None => {
                        debug!(
                            "No score array supplied, using band intensity over {}-{} Hz",
                            detection.min_hertz, detection.max_hertz
                        );
                        Cow::Owned(
                            spectrogram.band_intensity(detection.min_hertz, detection.max_hertz),
                        )
                    }
                };
                let params = ScoreSegmentation {
                    crossing,
                    min_duration: detection.min_duration,
                    max_duration: detection.max_duration,
                    min_hz: detection.min_hertz,
                    max_hz: detection.max_hertz.min(nyquist),
                };
                segment_scores(&scores, &params, &detection.aggregator, &template)?
            }
            DetectionMode::VerticalTrack => {
                if scores.is_some() {
                    warn!("Score array ignored in {} mode", detection.mode);
                }
                let params = VerticalTrackParams {
                    threshold: detection.threshold,
                    min_bandwidth: detection.min_bandwidth,
                    max_bandwidth: detection.max_bandwidth,
                    min_hz: detection.min_hertz,
                    max_hz: detection.max_hertz,
                    close_open_event_at_end: detection.close_open_event_at_end,
                };
                detect_vertical_tracks(spectrogram, &params, &detection.aggregator, &template)?
            }
        };

        let candidates = events.len();
        let outcome = self.postprocessor.process(events, spectrogram);
        info!(
            "Accepted {} of {candidates} candidate event(s) at {segment_start:.1}s",
            outcome.events.len()
        );

        Ok(DetectionResult {
            events: outcome.events,
            intensity,
            stage_counts: outcome.stage_counts,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::config::DurationConfig;
    use crate::scale::{FrequencyMode, FrequencyScale, SpectralScale, TimeScale};
    use ndarray::Array2;

    fn scale() -> SpectralScale {
        SpectralScale::new(
            TimeScale::from_frames_per_second(10.0).unwrap(),
            FrequencyScale::new(32, 100.0).unwrap(),
        )
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.detection.name = "call".to_string();
        config.detection.min_hertz = 500.0;
        config.detection.max_hertz = 1500.0;
        config.detection.min_duration = 0.1;
        config.detection.max_duration = 5.0;
        config
    }

    /// Frames 3..6 carry a 1.0 tone across bins 5..=15.
    fn spectrogram(frames: usize) -> Spectrogram {
        let data = Array2::from_shape_fn((frames, 32), |(frame, bin)| {
            if (3..6).contains(&frame) && (5..=15).contains(&bin) {
                1.0
            } else {
                0.0
            }
        });
        Spectrogram::new(data, scale(), FrequencyMode::Linear).unwrap()
    }

    #[test]
    fn test_detect_with_scores() {
        let detector = EventDetector::new(config()).unwrap();
        let spectrogram = spectrogram(7);
        let scores = [0.0, 0.0, 0.8, 0.9, 0.7, 0.0, 0.0];

        let result = detector
            .detect(&spectrogram, Some(&scores), Some("site.wav"), 60.0)
            .unwrap();

        assert_eq!(result.events.len(), 1);
        let event = &result.events[0];
        assert!((event.start() - 0.2).abs() < 1e-9);
        assert!((event.absolute_start() - 60.2).abs() < 1e-9);
        assert_eq!(event.source(), Some("site.wav"));
        assert_eq!(event.name(), "call");
        assert_eq!(result.intensity.len(), 7);
    }

    #[test]
    fn test_detect_from_band_intensity() {
        let detector = EventDetector::new(config()).unwrap();
        let result = detector.detect(&spectrogram(10), None, None, 0.0).unwrap();

        assert_eq!(result.events.len(), 1);
        let event = &result.events[0];
        assert!((event.start() - 0.3).abs() < 1e-9);
        assert!((event.duration() - 0.3).abs() < 1e-9);
        assert_eq!(event.score(), 1.0);
    }

    #[test]
    fn test_band_above_nyquist_rejected() {
        let mut config = config();
        config.detection.min_hertz = 3200.0;
        config.detection.max_hertz = 4000.0;
        let detector = EventDetector::new(config).unwrap();
        let scores = [0.0, 0.0, 0.8, 0.9, 0.7, 0.0, 0.0];

        let result = detector.detect(&spectrogram(7), Some(&scores), None, 0.0);
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }

    #[test]
    fn test_detect_on_mel_spectrogram() {
        let detector = EventDetector::new(config()).unwrap();
        let frequency = scale().frequency;
        let (left, right) = frequency.band_to_bins(500.0, 1500.0, FrequencyMode::Mel);
        assert_ne!((left, right), (5, 15));

        let data = Array2::from_shape_fn((10, 32), |(frame, bin)| {
            if (3..6).contains(&frame) && (left..=right).contains(&bin) {
                1.0
            } else {
                0.0
            }
        });
        let spectrogram = Spectrogram::new(data, scale(), FrequencyMode::Mel).unwrap();

        let from_intensity = detector.detect(&spectrogram, None, None, 0.0).unwrap();
        assert_eq!(from_intensity.events.len(), 1);
        assert_eq!(from_intensity.events[0].score(), 1.0);

        let scores = [0.0, 0.0, 0.8, 0.9, 0.7, 0.0, 0.0, 0.0, 0.0, 0.0];
        let result = detector
            .detect(&spectrogram, Some(&scores), None, 0.0)
            .unwrap();
        assert_eq!(result.events.len(), 1);
        let event = &result.events[0];
        assert_eq!(event.mode(), FrequencyMode::Mel);
        let region = event.region().unwrap();
        assert_eq!(region.rows(), 2..=4);
        assert_eq!(region.columns(), left..=right);
    }

    #[test]
    fn test_score_length_mismatch() {
        let detector = EventDetector::new(config()).unwrap();
        let result = detector.detect(&spectrogram(10), Some(&[0.0; 4]), None, 0.0);
        assert!(matches!(
            result,
            Err(Error::ScoreLengthMismatch {
                expected: 10,
                actual: 4
            })
        ));
    }

    #[test]
    fn test_post_processing_applied() {
        let mut config = config();
        config.postprocessing.duration = Some(DurationConfig {
            expected_duration: 2.0,
            duration_standard_deviation: 0.1,
            sigma_threshold: 3.0,
        });
        let detector = EventDetector::new(config).unwrap();
        let result = detector.detect(&spectrogram(10), None, None, 0.0).unwrap();

        assert!(result.events.is_empty());
        assert_eq!(result.stage_counts.last().map(|c| c.events), Some(0));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = config();
        config.detection.max_duration = 0.05;
        assert!(matches!(
            EventDetector::new(config),
            Err(Error::ConfigValidation { .. })
        ));
    }

    #[test]
    fn test_vertical_track_mode() {
        let mut config = config();
        config.detection.mode = DetectionMode::VerticalTrack;
        config.detection.min_hertz = 0.0;
        config.detection.max_hertz = 3200.0;
        config.detection.threshold = 0.5;
        config.detection.min_bandwidth = 100.0;
        config.detection.max_bandwidth = 2000.0;
        let detector = EventDetector::new(config).unwrap();

        let mut data = Array2::zeros((5, 32));
        for bin in 4..10 {
            data[[2, bin]] = 1.0;
        }
        let spectrogram = Spectrogram::new(data, scale(), FrequencyMode::Linear).unwrap();
        let result = detector.detect(&spectrogram, None, None, 0.0).unwrap();

        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].min_hz(), 400.0);
        assert_eq!(result.events[0].max_hz(), 1000.0);
        assert_eq!(result.intensity[2], 1.0);
    }

    #[test]
    fn test_segments_processed_concurrently() {
        let detector = EventDetector::new(config()).unwrap();
        let spectrograms: Vec<Spectrogram> = (0..4).map(|_| spectrogram(10)).collect();

        let counts: Vec<usize> = std::thread::scope(|scope| {
            let handles: Vec<_> = spectrograms
                .iter()
                .enumerate()
                .map(|(i, spectrogram)| {
                    let detector = &detector;
                    scope.spawn(move || {
                        #[allow(clippy::cast_precision_loss)]
                        let offset = i as f64 * 10.0;
                        detector
                            .detect(spectrogram, None, Some("long.wav"), offset)
                            .unwrap()
                            .events
                            .len()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(counts, vec![1, 1, 1, 1]);
    }
}
