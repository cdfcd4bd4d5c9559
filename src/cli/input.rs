//! Spectrogram input documents read by the driver.

use crate::error::{Error, Result};
use crate::scale::{FrequencyMode, SpectralScale};
use crate::spectrogram::Spectrogram;
use serde::Deserialize;
use std::path::Path;

/// A spectrogram and its optional score array, as stored on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct SpectrogramInput {
    /// Sample rate of the analysed audio in Hz.
    pub sample_rate: u32,
    /// FFT window length in samples.
    pub window_size: usize,
    /// Hop between successive windows in samples.
    pub window_step: usize,
    /// Frequency axis of the matrix.
    #[serde(default)]
    pub frequency_mode: FrequencyMode,
    /// Identifier of the source recording.
    #[serde(default)]
    pub source: Option<String>,
    /// Offset of the segment within the recording, in seconds.
    #[serde(default)]
    pub segment_start: f64,
    /// Rows are frames, columns are frequency bins.
    pub matrix: Vec<Vec<f64>>,
    /// Per-frame scores.
    #[serde(default)]
    pub scores: Option<Vec<f64>>,
}

impl SpectrogramInput {
    /// Read and parse a JSON input document.
    pub fn read(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::InputRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_str(&contents).map_err(|e| Error::InputParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Validate the matrix and split off the score array.
    pub fn into_spectrogram(self) -> Result<(Spectrogram, Option<Vec<f64>>)> {
        let scale = SpectralScale::from_window(self.sample_rate, self.window_size, self.window_step)?;
        let spectrogram = Spectrogram::from_rows(self.matrix, scale, self.frequency_mode)?;
        Ok((spectrogram, self.scores))
    }
}
