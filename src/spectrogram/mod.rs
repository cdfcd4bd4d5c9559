//! Validated spectrogram matrix with its scale parameters.
//!
//! The matrix itself is produced elsewhere (FFT, noise reduction). This
//! module only checks that it is usable and answers the questions the
//! detector asks of it: which columns form a band, what the mean level of a
//! block of cells is, and whether a score array lines up with its frames.

use crate::error::{Error, Result};
use crate::scale::{FrequencyMode, SpectralScale};
use ndarray::{Array2, s};
use std::ops::RangeInclusive;

/// A spectrogram: rows are time frames, columns are frequency bins.
#[derive(Debug, Clone)]
pub struct Spectrogram {
    data: Array2<f64>,
    scale: SpectralScale,
    mode: FrequencyMode,
}

impl Spectrogram {
    /// Wrap a matrix, rejecting empty matrices and non-finite cells.
    pub fn new(data: Array2<f64>, scale: SpectralScale, mode: FrequencyMode) -> Result<Self> {
        let (frames, bins) = data.dim();
        if frames == 0 || bins == 0 {
            return Err(Error::EmptyMatrix { frames, bins });
        }

        if let Some(((row, column), value)) = data.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::NonFiniteCell {
                row,
                column,
                value: *value,
            });
        }

        Ok(Self { data, scale, mode })
    }

    /// Build from row vectors, rejecting ragged input.
    pub fn from_rows(rows: Vec<Vec<f64>>, scale: SpectralScale, mode: FrequencyMode) -> Result<Self> {
        let frames = rows.len();
        let bins = rows.first().map_or(0, Vec::len);

        if let Some((row, actual)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != bins)
        {
            return Err(Error::RaggedMatrix {
                row,
                expected: bins,
                actual,
            });
        }

        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        let data = Array2::from_shape_vec((frames, bins), flat).map_err(|e| Error::InvalidScale {
            reason: e.to_string(),
        })?;
        Self::new(data, scale, mode)
    }

    /// Underlying matrix.
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// Time and frequency scales.
    pub fn scale(&self) -> &SpectralScale {
        &self.scale
    }

    /// Frequency axis mode.
    pub fn mode(&self) -> FrequencyMode {
        self.mode
    }

    /// Number of frames (rows).
    pub fn frame_count(&self) -> usize {
        self.data.nrows()
    }

    /// Number of bins (columns) actually present in the matrix.
    pub fn bin_count(&self) -> usize {
        self.data.ncols()
    }

    /// Columns covering `[min_hz, max_hz]`, clamped to the matrix.
    ///
    /// Returns `None` when the band lies entirely above the top bin or is
    /// inverted.
    pub fn band_columns(&self, min_hz: f64, max_hz: f64) -> Option<RangeInclusive<usize>> {
        let (left, right) = self.scale.frequency.band_to_bins(min_hz, max_hz, self.mode);
        let last = self.bin_count() - 1;
        if left > last || left > right {
            return None;
        }
        Some(left..=right.min(last))
    }

    /// Mean value of each frame across the given frequency band.
    ///
    /// This is the raw-magnitude score feature. Frames yield 0.0 when the
    /// band lies outside the matrix.
    pub fn band_intensity(&self, min_hz: f64, max_hz: f64) -> Vec<f64> {
        let Some(columns) = self.band_columns(min_hz, max_hz) else {
            return vec![0.0; self.frame_count()];
        };
        let band = self.data.slice(s![.., columns]);
        band.rows()
            .into_iter()
            .map(|row| row.mean().unwrap_or(0.0))
            .collect()
    }

    /// Mean over a block of cells, clamped to the matrix.
    ///
    /// Returns `None` when the clamped block contains no cells.
    pub fn region_mean(
        &self,
        rows: RangeInclusive<usize>,
        columns: RangeInclusive<usize>,
    ) -> Option<f64> {
        let (top, bottom) = (*rows.start(), (*rows.end()).min(self.frame_count() - 1));
        let (left, right) = (*columns.start(), (*columns.end()).min(self.bin_count() - 1));
        if top > bottom || left > right {
            return None;
        }
        self.data.slice(s![top..=bottom, left..=right]).mean()
    }

    /// Check that a score array lines up with the frames and is finite.
    pub fn check_scores(&self, scores: &[f64]) -> Result<()> {
        if scores.len() != self.frame_count() {
            return Err(Error::ScoreLengthMismatch {
                expected: self.frame_count(),
                actual: scores.len(),
            });
        }
        crate::segment::ensure_finite(scores)
    }
}
