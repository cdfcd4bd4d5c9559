//! Event counts per unit of recording time.

use crate::constants::score::MAX_SUMMARY_UNITS;
use crate::error::{Error, Result};
use crate::event::AcousticEvent;
use tracing::trace;

/// Event counts for one unit of recording time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitCount {
    /// Start of the unit on the recording timeline, in seconds.
    pub start: f64,
    /// Events starting within the unit.
    pub total: usize,
    /// Of those, events whose normalised score exceeds the threshold.
    pub above_threshold: usize,
}

/// Count events per unit of time across a recording.
///
/// Events are binned by their recording-absolute start. A trailing
/// fractional unit gets its own bin. Events starting past the recording end
/// are ignored. A unit so short that the recording spans more than
/// [`MAX_SUMMARY_UNITS`] units is rejected.
///
/// # Arguments
///
/// * `events` - Events from one recording
/// * `unit` - Unit length in seconds (e.g. 60 for per-minute counts)
/// * `total_duration` - Recording length in seconds
/// * `score_threshold` - Normalised score an event must exceed to count as strong
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn events_per_unit_time(
    events: &[AcousticEvent],
    unit: f64,
    total_duration: f64,
    score_threshold: f64,
) -> Result<Vec<UnitCount>> {
    if !unit.is_finite() || unit <= 0.0 {
        return Err(Error::ConfigValidation {
            message: format!("unit time must be positive, got {unit}"),
        });
    }
    if !total_duration.is_finite() || total_duration < 0.0 {
        return Err(Error::ConfigValidation {
            message: format!("recording duration must be non-negative, got {total_duration}"),
        });
    }

    let units = (total_duration / unit).ceil();
    if !units.is_finite() || units > MAX_SUMMARY_UNITS as f64 {
        return Err(Error::ConfigValidation {
            message: format!(
                "unit time {unit}s splits {total_duration}s into more than {MAX_SUMMARY_UNITS} units"
            ),
        });
    }
    let unit_count = units as usize;
    let mut counts: Vec<UnitCount> = (0..unit_count)
        .map(|i| UnitCount {
            start: i as f64 * unit,
            total: 0,
            above_threshold: 0,
        })
        .collect();

    for event in events {
        let index = (event.absolute_start() / unit).floor() as usize;
        let Some(count) = counts.get_mut(index) else {
            trace!(
                "Event at {:.2}s lies beyond the recording end",
                event.absolute_start()
            );
            continue;
        };
        count.total += 1;
        if event.normalised_score() > score_threshold {
            count.above_threshold += 1;
        }
    }

    Ok(counts)
}
