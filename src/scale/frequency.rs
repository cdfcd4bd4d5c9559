//! Frequency bin layout for linear-Hertz and Mel spectrograms.

use crate::constants::mel;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Frequency axis of a spectrogram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyMode {
    /// Bins are evenly spaced in Hertz.
    #[default]
    Linear,
    /// Bins are evenly spaced in Mels.
    Mel,
}

impl std::fmt::Display for FrequencyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Mel => write!(f, "mel"),
        }
    }
}

/// Convert Hertz to Mels.
pub fn hz_to_mel(hz: f64) -> f64 {
    mel::SCALE * (1.0 + hz / mel::CORNER_HZ).log10()
}

/// Convert Mels to Hertz.
pub fn mel_to_hz(mels: f64) -> f64 {
    mel::CORNER_HZ * (10f64.powf(mels / mel::SCALE) - 1.0)
}

/// Maps between Hertz and frequency bin columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyScale {
    bin_count: usize,
    bin_width: f64,
}

impl FrequencyScale {
    /// Create a scale from an explicit bin layout.
    pub fn new(bin_count: usize, bin_width: f64) -> Result<Self> {
        if bin_count == 0 || !bin_width.is_finite() || bin_width <= 0.0 {
            return Err(Error::InvalidScale {
                reason: format!(
                    "bin count and bin width must be positive (got {bin_count} bins of {bin_width} Hz)"
                ),
            });
        }
        Ok(Self {
            bin_count,
            bin_width,
        })
    }

    /// Derive the bin layout from STFT parameters.
    ///
    /// `bin_count = window_size / 2`, `bin_width = sample_rate / window_size`.
    pub fn from_window(sample_rate: u32, window_size: usize) -> Result<Self> {
        if sample_rate == 0 || window_size < 2 {
            return Err(Error::InvalidScale {
                reason: format!(
                    "sample rate must be positive and window size at least 2 \
                     (got {sample_rate} Hz, {window_size})"
                ),
            });
        }
        #[allow(clippy::cast_precision_loss)]
        Self::new(window_size / 2, f64::from(sample_rate) / window_size as f64)
    }

    /// Number of frequency bins.
    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    /// Width of one linear bin in Hz.
    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    /// Highest representable frequency.
    #[allow(clippy::cast_precision_loss)]
    pub fn nyquist(&self) -> f64 {
        self.bin_count as f64 * self.bin_width
    }

    /// Mel columns per Mel, with the Mel range taken as `mel(nyquist) + 1`
    /// truncated to a whole number.
    #[allow(clippy::cast_precision_loss)]
    fn bins_per_mel(&self) -> f64 {
        let mel_range = (hz_to_mel(self.nyquist()) + 1.0).trunc();
        self.bin_count as f64 / mel_range
    }

    /// Column holding the given frequency.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn hz_to_bin(&self, hz: f64, mode: FrequencyMode) -> usize {
        let column = match mode {
            FrequencyMode::Linear => hz / self.bin_width,
            FrequencyMode::Mel => hz_to_mel(hz) * self.bins_per_mel(),
        };
        column.round().max(0.0) as usize
    }

    /// Frequency at the given column.
    #[allow(clippy::cast_precision_loss)]
    pub fn bin_to_hz(&self, bin: usize, mode: FrequencyMode) -> f64 {
        match mode {
            FrequencyMode::Linear => bin as f64 * self.bin_width,
            FrequencyMode::Mel => mel_to_hz(bin as f64 / self.bins_per_mel()),
        }
    }

    /// Convert a frequency band to an inclusive `(left, right)` column pair.
    pub fn band_to_bins(&self, min_hz: f64, max_hz: f64, mode: FrequencyMode) -> (usize, usize) {
        (self.hz_to_bin(min_hz, mode), self.hz_to_bin(max_hz, mode))
    }

    /// Convert an inclusive `(left, right)` column pair to `(min_hz, max_hz)`.
    pub fn bins_to_band(&self, left: usize, right: usize, mode: FrequencyMode) -> (f64, f64) {
        (self.bin_to_hz(left, mode), self.bin_to_hz(right, mode))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn scale() -> FrequencyScale {
        FrequencyScale::from_window(22_050, 512).unwrap()
    }

    #[test]
    fn test_from_window() {
        let scale = scale();
        assert_eq!(scale.bin_count(), 256);
        assert!((scale.bin_width() - 43.066_406_25).abs() < 1e-9);
        assert!((scale.nyquist() - 11_025.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(FrequencyScale::new(0, 43.0).is_err());
        assert!(FrequencyScale::new(256, 0.0).is_err());
        assert!(FrequencyScale::from_window(22_050, 1).is_err());
    }

    #[test]
    fn test_mel_formula() {
        assert!(hz_to_mel(0.0).abs() < 1e-12);
        assert!((hz_to_mel(1000.0) - 999.985).abs() < 0.01);
        assert!((mel_to_hz(hz_to_mel(3456.0)) - 3456.0).abs() < 1e-6);
    }

    #[test]
    fn test_linear_bins() {
        let scale = FrequencyScale::new(256, 10.0).unwrap();
        assert_eq!(scale.band_to_bins(200.0, 800.0, FrequencyMode::Linear), (20, 80));
        assert_eq!(scale.hz_to_bin(204.0, FrequencyMode::Linear), 20);
        assert_eq!(scale.hz_to_bin(206.0, FrequencyMode::Linear), 21);
        assert_eq!(scale.bins_to_band(20, 80, FrequencyMode::Linear), (200.0, 800.0));
    }

    #[test]
    fn test_mel_bins_are_monotonic_and_bounded() {
        let scale = scale();
        let mut previous = 0;
        for hz in (0..=11_025).step_by(25) {
            let bin = scale.hz_to_bin(f64::from(hz), FrequencyMode::Mel);
            assert!(bin >= previous);
            assert!(bin <= scale.bin_count());
            previous = bin;
        }
    }

    #[test]
    fn test_mel_bins_favour_low_frequencies() {
        let scale = scale();
        let low = scale.hz_to_bin(1000.0, FrequencyMode::Mel);
        let linear_low = scale.hz_to_bin(1000.0, FrequencyMode::Linear);
        assert!(low > linear_low);
    }

    #[test]
    fn test_round_trip_within_one_bin() {
        let scale = scale();
        for mode in [FrequencyMode::Linear, FrequencyMode::Mel] {
            for hz in [0.0, 150.0, 987.0, 4321.0, 10_000.0] {
                let bin = scale.hz_to_bin(hz, mode);
                let back = scale.bin_to_hz(bin, mode);
                assert_eq!(scale.hz_to_bin(back, mode), bin);

                let lower = scale.bin_to_hz(bin.saturating_sub(1), mode);
                let upper = scale.bin_to_hz(bin + 1, mode);
                assert!(hz >= lower && hz <= upper, "{hz} outside [{lower}, {upper}] ({mode})");
            }
        }
    }

    #[test]
    fn test_mode_from_str() {
        let mode: FrequencyMode = serde_json::from_str("\"mel\"").unwrap();
        assert_eq!(mode, FrequencyMode::Mel);
        assert_eq!(FrequencyMode::Linear.to_string(), "linear");
    }
}
