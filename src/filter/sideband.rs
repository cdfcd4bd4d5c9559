//! Sideband activity filter.
//!
//! A clean call has quiet spectrum directly above and below it. The buffer
//! zones span the event's frames and extend `lower_hertz_buffer` below the
//! low edge and `upper_hertz_buffer` above the high edge, excluding the
//! event's own edge bins.

use crate::config::SidebandConfig;
use crate::event::AcousticEvent;
use crate::spectrogram::Spectrogram;
use std::ops::RangeInclusive;
use tracing::trace;

/// Drop events whose buffer zones carry too much acoustic activity.
///
/// A zone's mean cell value must not exceed
/// `max_average_sideband_decibels`. A zero buffer skips that side, and a
/// zone pushed entirely off the matrix has no cells and passes. Events whose
/// frames lie outside the matrix are dropped.
pub fn filter_sideband_activity(
    events: Vec<AcousticEvent>,
    spectrogram: &Spectrogram,
    config: &SidebandConfig,
) -> Vec<AcousticEvent> {
    events
        .into_iter()
        .filter(|event| passes(event, spectrogram, config))
        .collect()
}

fn passes(event: &AcousticEvent, spectrogram: &Spectrogram, config: &SidebandConfig) -> bool {
    let time = &spectrogram.scale().time;
    let (top, bottom) = time.span_to_rows(event.start(), event.duration());
    if top >= spectrogram.frame_count() {
        trace!(
            "Sideband filter rejected event at {:.3}s: frames {top}..={bottom} outside the matrix",
            event.absolute_start()
        );
        return false;
    }

    let frequency = &spectrogram.scale().frequency;
    let mode = spectrogram.mode();
    let low_bin = frequency.hz_to_bin(event.min_hz(), mode);
    let high_bin = frequency.hz_to_bin(event.max_hz(), mode);

    let lower = (config.lower_hertz_buffer > 0.0).then(|| {
        let edge = frequency.hz_to_bin((event.min_hz() - config.lower_hertz_buffer).max(0.0), mode);
        zone(edge, low_bin.checked_sub(1))
    });
    let upper = (config.upper_hertz_buffer > 0.0).then(|| {
        let edge = frequency.hz_to_bin(event.max_hz() + config.upper_hertz_buffer, mode);
        zone(high_bin + 1, Some(edge))
    });

    for (side, columns) in [("lower", lower), ("upper", upper)] {
        let Some(Some(columns)) = columns else {
            continue;
        };
        let Some(mean) = spectrogram.region_mean(top..=bottom, columns) else {
            continue;
        };
        if mean > config.max_average_sideband_decibels {
            trace!(
                "Sideband filter rejected event at {:.3}s: {side} zone mean {mean:.2} exceeds {}",
                event.absolute_start(),
                config.max_average_sideband_decibels
            );
            return false;
        }
    }
    true
}

/// Column range of a buffer zone, `None` when it holds no bins.
fn zone(left: usize, right: Option<usize>) -> Option<RangeInclusive<usize>> {
    right.filter(|&right| right >= left).map(|right| left..=right)
}
