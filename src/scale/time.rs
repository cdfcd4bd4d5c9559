//! Frame timing.

use crate::error::{Error, Result};

/// Maps between seconds and frame rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    frame_duration: f64,
    frame_offset: f64,
}

impl TimeScale {
    /// Derive the frame timing from STFT parameters.
    ///
    /// `frame_duration = window_size / sample_rate`,
    /// `frame_offset = window_step / sample_rate`.
    pub fn from_window(sample_rate: u32, window_size: usize, window_step: usize) -> Result<Self> {
        if sample_rate == 0 || window_size == 0 || window_step == 0 {
            return Err(Error::InvalidScale {
                reason: format!(
                    "sample rate, window size and window step must be positive \
                     (got {sample_rate} Hz, {window_size}, {window_step})"
                ),
            });
        }

        let rate = f64::from(sample_rate);
        #[allow(clippy::cast_precision_loss)]
        Ok(Self {
            frame_duration: window_size as f64 / rate,
            frame_offset: window_step as f64 / rate,
        })
    }

    /// Build a scale from the frame rate alone.
    ///
    /// Frame duration is unknown in this case and is taken to equal the
    /// frame offset.
    pub fn from_frames_per_second(frames_per_second: f64) -> Result<Self> {
        if !frames_per_second.is_finite() || frames_per_second <= 0.0 {
            return Err(Error::InvalidScale {
                reason: format!("frames per second must be positive, got {frames_per_second}"),
            });
        }
        let frame_offset = 1.0 / frames_per_second;
        Ok(Self {
            frame_duration: frame_offset,
            frame_offset,
        })
    }

    /// Frame length in seconds.
    pub fn frame_duration(&self) -> f64 {
        self.frame_duration
    }

    /// Time between successive frame starts in seconds.
    pub fn frame_offset(&self) -> f64 {
        self.frame_offset
    }

    /// Inverse of the frame offset.
    pub fn frames_per_second(&self) -> f64 {
        1.0 / self.frame_offset
    }

    /// Row containing the given time. Negative times map to row 0.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn time_to_row(&self, seconds: f64) -> usize {
        (seconds / self.frame_offset).round().max(0.0) as usize
    }

    /// Start time of a row.
    #[allow(clippy::cast_precision_loss)]
    pub fn row_to_time(&self, row: usize) -> f64 {
        row as f64 * self.frame_offset
    }

    /// Convert a time span to an inclusive `(top, bottom)` row pair.
    ///
    /// A row covers one whole frame, so the span ending at `end` occupies
    /// rows up to `round(end / offset) - 1`. The bottom row never precedes
    /// the top row.
    pub fn span_to_rows(&self, start: f64, duration: f64) -> (usize, usize) {
        let top = self.time_to_row(start);
        let end_row = self.time_to_row(start + duration);
        let bottom = end_row.saturating_sub(1).max(top);
        (top, bottom)
    }

    /// Convert an inclusive `(top, bottom)` row pair to `(start, duration)`.
    #[allow(clippy::cast_precision_loss)]
    pub fn rows_to_span(&self, top: usize, bottom: usize) -> (f64, f64) {
        let start = self.row_to_time(top);
        let frames = (bottom + 1).saturating_sub(top);
        (start, frames as f64 * self.frame_offset)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn ten_fps() -> TimeScale {
        TimeScale::from_frames_per_second(10.0).unwrap()
    }

    #[test]
    fn test_from_window() {
        let scale = TimeScale::from_window(22_050, 512, 256).unwrap();
        assert!((scale.frame_duration() - 512.0 / 22_050.0).abs() < 1e-12);
        assert!((scale.frame_offset() - 256.0 / 22_050.0).abs() < 1e-12);
        assert!((scale.frames_per_second() - 22_050.0 / 256.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(TimeScale::from_window(22_050, 512, 0).is_err());
        assert!(TimeScale::from_frames_per_second(0.0).is_err());
        assert!(TimeScale::from_frames_per_second(f64::NAN).is_err());
    }

    #[test]
    fn test_time_to_row_rounds() {
        let scale = ten_fps();
        assert_eq!(scale.time_to_row(0.0), 0);
        assert_eq!(scale.time_to_row(0.24), 2);
        assert_eq!(scale.time_to_row(0.26), 3);
        assert_eq!(scale.time_to_row(-1.0), 0);
    }

    #[test]
    fn test_span_uses_closed_row_interval() {
        let scale = ten_fps();
        assert_eq!(scale.span_to_rows(0.2, 0.3), (2, 4));

        let (start, duration) = scale.rows_to_span(2, 4);
        assert!((start - 0.2).abs() < 1e-9);
        assert!((duration - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_single_row_span() {
        let scale = ten_fps();
        let (start, duration) = scale.rows_to_span(7, 7);
        assert!((start - 0.7).abs() < 1e-9);
        assert!((duration - 0.1).abs() < 1e-9);
        assert_eq!(scale.span_to_rows(start, duration), (7, 7));
    }

    #[test]
    fn test_rows_round_trip_exactly() {
        let scale = TimeScale::from_window(22_050, 512, 256).unwrap();
        for top in [0_usize, 1, 17, 400] {
            for len in [0_usize, 1, 5, 63] {
                let bottom = top + len;
                let (start, duration) = scale.rows_to_span(top, bottom);
                assert_eq!(scale.span_to_rows(start, duration), (top, bottom));
            }
        }
    }

    #[test]
    fn test_time_round_trip_within_one_frame() {
        let scale = TimeScale::from_window(22_050, 512, 256).unwrap();
        let offset = scale.frame_offset();
        for (start, duration) in [(0.0, 0.5), (1.234, 0.071), (12.5, 3.3), (59.0, 0.02)] {
            let (top, bottom) = scale.span_to_rows(start, duration);
            let (back_start, back_duration) = scale.rows_to_span(top, bottom);
            assert!((back_start - start).abs() <= offset);
            assert!((back_start + back_duration - (start + duration)).abs() <= offset);
        }
    }
}
