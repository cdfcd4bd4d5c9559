//! Matrix-coordinate bounding regions.

use std::ops::RangeInclusive;

/// Inclusive bounding box of an event in matrix coordinates.
///
/// Origin is the top-left of the spectrogram matrix: rows grow with time,
/// columns grow with frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    /// First frame.
    pub top: usize,
    /// Last frame (inclusive).
    pub bottom: usize,
    /// Lowest frequency bin.
    pub left: usize,
    /// Highest frequency bin (inclusive).
    pub right: usize,
}

impl Region {
    /// Create a region, ordering the bounds if given reversed.
    pub fn new(top: usize, bottom: usize, left: usize, right: usize) -> Self {
        Self {
            top: top.min(bottom),
            bottom: top.max(bottom),
            left: left.min(right),
            right: left.max(right),
        }
    }

    /// Frame rows covered.
    pub fn rows(&self) -> RangeInclusive<usize> {
        self.top..=self.bottom
    }

    /// Bin columns covered.
    pub fn columns(&self) -> RangeInclusive<usize> {
        self.left..=self.right
    }

    /// Number of frames covered.
    pub fn frame_count(&self) -> usize {
        self.bottom - self.top + 1
    }

    /// Number of bins covered.
    pub fn bin_count(&self) -> usize {
        self.right - self.left + 1
    }
}

/// Cached matrix region of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegionState {
    /// Not derived yet, or invalidated by a change to the physical extent.
    #[default]
    Unset,
    /// Derived from the physical extent under the event's scales.
    Derived(Region),
}

impl RegionState {
    /// The cached region, if any.
    pub fn region(&self) -> Option<&Region> {
        match self {
            Self::Unset => None,
            Self::Derived(region) => Some(region),
        }
    }
}
