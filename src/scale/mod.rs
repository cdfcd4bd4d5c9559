//! Conversions between physical units and spectrogram matrix coordinates.
//!
//! Rows of a spectrogram matrix are time frames and columns are frequency
//! bins. Everything here is plain arithmetic: constructors reject unusable
//! parameters, conversions never fail, and clamping to the matrix bounds is
//! left to the caller.

mod frequency;
mod time;

pub use frequency::{FrequencyMode, FrequencyScale, hz_to_mel, mel_to_hz};
pub use time::TimeScale;

use crate::error::Result;

/// Time and frequency scales of one spectrogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralScale {
    /// Frame timing.
    pub time: TimeScale,
    /// Bin layout.
    pub frequency: FrequencyScale,
}

impl SpectralScale {
    /// Create from explicit time and frequency scales.
    pub const fn new(time: TimeScale, frequency: FrequencyScale) -> Self {
        Self { time, frequency }
    }

    /// Derive both scales from the STFT parameters.
    ///
    /// # Arguments
    ///
    /// * `sample_rate` - Sample rate in Hz
    /// * `window_size` - FFT window length in samples
    /// * `window_step` - Hop between successive windows in samples
    pub fn from_window(sample_rate: u32, window_size: usize, window_step: usize) -> Result<Self> {
        Ok(Self {
            time: TimeScale::from_window(sample_rate, window_size, window_step)?,
            frequency: FrequencyScale::from_window(sample_rate, window_size)?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_from_window_combines_both_scales() {
        let scale = SpectralScale::from_window(22_050, 512, 256).unwrap();
        assert_eq!(scale.frequency.bin_count(), 256);
        assert!((scale.time.frame_offset() - 256.0 / 22_050.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_window_rejects_zero_sample_rate() {
        assert!(SpectralScale::from_window(0, 512, 256).is_err());
    }
}
