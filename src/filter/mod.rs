//! Statistical filters over event lists.
//!
//! Every filter keeps the events it accepts, in order, and drops the rest.
//! None of them modifies an event.

mod sideband;

pub use sideband::filter_sideband_activity;

use crate::config::{BandwidthConfig, DurationConfig, SyllableSequenceConfig};
use crate::constants::syllable::GAP_SIGMAS;
use crate::event::AcousticEvent;
use tracing::trace;

/// Accepts values within `sigma` standard deviations of an expected value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SigmaFilter {
    /// Expected value.
    pub expected: f64,
    /// Standard deviation around the expected value.
    pub standard_deviation: f64,
    /// Number of standard deviations tolerated.
    pub sigma: f64,
}

impl SigmaFilter {
    /// Whether `value` lies within the tolerated band (bounds included).
    pub fn accepts(&self, value: f64) -> bool {
        (value - self.expected).abs() <= self.sigma * self.standard_deviation
    }
}

impl From<&DurationConfig> for SigmaFilter {
    fn from(config: &DurationConfig) -> Self {
        Self {
            expected: config.expected_duration,
            standard_deviation: config.duration_standard_deviation,
            sigma: config.sigma_threshold,
        }
    }
}

impl From<&BandwidthConfig> for SigmaFilter {
    fn from(config: &BandwidthConfig) -> Self {
        Self {
            expected: config.expected_bandwidth,
            standard_deviation: config.bandwidth_standard_deviation,
            sigma: config.sigma_threshold,
        }
    }
}

/// Drop events whose duration is implausible.
pub fn filter_by_duration(
    events: Vec<AcousticEvent>,
    config: &DurationConfig,
) -> Vec<AcousticEvent> {
    let filter = SigmaFilter::from(config);
    retain_logged(events, "duration", |event| filter.accepts(event.duration()))
}

/// Drop events whose bandwidth is implausible.
pub fn filter_by_bandwidth(
    events: Vec<AcousticEvent>,
    config: &BandwidthConfig,
) -> Vec<AcousticEvent> {
    let filter = SigmaFilter::from(config);
    retain_logged(events, "bandwidth", |event| {
        filter.accepts(event.bandwidth_hz())
    })
}

/// Drop syllable sequences with too many syllables or an irregular period.
///
/// Single events have no period and only face the count limit.
pub fn filter_syllable_sequences(
    events: Vec<AcousticEvent>,
    config: &SyllableSequenceConfig,
) -> Vec<AcousticEvent> {
    let period = SigmaFilter {
        expected: config.expected_period,
        standard_deviation: config.period_standard_deviation(),
        sigma: GAP_SIGMAS,
    };
    retain_logged(events, "syllable sequence", |event| {
        event.component_count() <= config.syllable_max_count
            && event.mean_period().is_none_or(|p| period.accepts(p))
    })
}

fn retain_logged<F>(events: Vec<AcousticEvent>, stage: &str, accept: F) -> Vec<AcousticEvent>
where
    F: Fn(&AcousticEvent) -> bool,
{
    events
        .into_iter()
        .filter(|event| {
            let keep = accept(event);
            if !keep {
                trace!(
                    "{stage} filter rejected event at {:.3}s ({:.3}s, {:.0}-{:.0} Hz)",
                    event.absolute_start(),
                    event.duration(),
                    event.min_hz(),
                    event.max_hz()
                );
            }
            keep
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::scale::{FrequencyScale, SpectralScale, TimeScale};

    fn event(start: f64, duration: f64, min_hz: f64, max_hz: f64) -> AcousticEvent {
        AcousticEvent::new(start, duration, min_hz, max_hz).unwrap()
    }

    fn bandwidth(expected: f64, sd: f64) -> BandwidthConfig {
        BandwidthConfig {
            expected_bandwidth: expected,
            bandwidth_standard_deviation: sd,
            sigma_threshold: 3.0,
        }
    }

    #[test]
    fn test_narrow_event_rejected_on_bandwidth() {
        let events = vec![event(0.0, 0.5, 1000.0, 1050.0)];
        assert!(filter_by_bandwidth(events, &bandwidth(500.0, 100.0)).is_empty());
    }

    #[test]
    fn test_bandwidth_counts_top_bin() {
        let scale = SpectralScale::new(
            TimeScale::from_frames_per_second(10.0).unwrap(),
            FrequencyScale::new(256, 10.0).unwrap(),
        );
        // 790 Hz span plus one 10 Hz bin sits exactly at the upper limit
        let events = vec![event(0.0, 0.5, 1000.0, 1790.0).with_scale(scale)];
        assert_eq!(filter_by_bandwidth(events, &bandwidth(500.0, 100.0)).len(), 1);

        let events = vec![event(0.0, 0.5, 1000.0, 1800.0).with_scale(scale)];
        assert!(filter_by_bandwidth(events, &bandwidth(500.0, 100.0)).is_empty());
    }

    #[test]
    fn test_duration_filter_keeps_order() {
        let config = DurationConfig {
            expected_duration: 0.5,
            duration_standard_deviation: 0.1,
            sigma_threshold: 2.0,
        };
        let events = vec![
            event(0.0, 0.45, 0.0, 100.0),
            event(1.0, 0.9, 0.0, 100.0),
            event(2.0, 0.6, 0.0, 100.0),
            event(3.0, 0.05, 0.0, 100.0),
        ];
        let kept = filter_by_duration(events, &config);
        let starts: Vec<f64> = kept.iter().map(AcousticEvent::start).collect();
        assert_eq!(starts, vec![0.0, 2.0]);
    }

    #[test]
    fn test_tighter_sigma_never_keeps_more() {
        let events: Vec<_> = (1..=10)
            .map(|i| event(f64::from(i), f64::from(i) * 0.1, 0.0, 100.0))
            .collect();
        let mut previous = usize::MAX;
        for sigma in [5.0, 3.0, 2.0, 1.0, 0.5] {
            let config = DurationConfig {
                expected_duration: 0.5,
                duration_standard_deviation: 0.1,
                sigma_threshold: sigma,
            };
            let kept = filter_by_duration(events.clone(), &config).len();
            assert!(kept <= previous);
            previous = kept;
        }
    }

    #[test]
    fn test_tighter_bandwidth_sigma_never_keeps_more() {
        let events: Vec<_> = [400.0, 500.0, 700.0, 1000.0]
            .iter()
            .map(|bw| event(0.0, 0.5, 1000.0, 1000.0 + bw))
            .collect();
        let mut counts = Vec::new();
        for sigma in [3.0, 1.0, 0.5] {
            let config = BandwidthConfig {
                sigma_threshold: sigma,
                ..bandwidth(500.0, 100.0)
            };
            counts.push(filter_by_bandwidth(events.clone(), &config).len());
        }
        assert_eq!(counts, vec![3, 2, 1]);
    }

    #[test]
    fn test_syllable_count_limit() {
        let config = SyllableSequenceConfig {
            syllable_start_difference: 0.6,
            expected_period: 0.3,
            syllable_max_count: 2,
            filter_syllable_sequence: true,
            ..SyllableSequenceConfig::default()
        };
        let mut sequence = event(0.0, 0.1, 0.0, 100.0);
        for start in [0.3, 0.6] {
            sequence.absorb(&event(start, 0.1, 0.0, 100.0));
        }
        let single = event(5.0, 0.1, 0.0, 100.0);

        let kept = filter_syllable_sequences(vec![sequence, single], &config);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].start(), 5.0);
    }

    #[test]
    fn test_syllable_period_limit() {
        // period sd = (0.6 - 0.3) / 3 = 0.1, so periods up to 0.6 pass
        let config = SyllableSequenceConfig {
            syllable_start_difference: 0.6,
            expected_period: 0.3,
            filter_syllable_sequence: true,
            ..SyllableSequenceConfig::default()
        };
        let mut regular = event(0.0, 0.1, 0.0, 100.0);
        regular.absorb(&event(0.35, 0.1, 0.0, 100.0));
        let mut slow = event(2.0, 0.1, 0.0, 100.0);
        slow.absorb(&event(2.7, 0.1, 0.0, 100.0));

        let kept = filter_syllable_sequences(vec![regular, slow], &config);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].start(), 0.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(filter_by_bandwidth(Vec::new(), &bandwidth(500.0, 100.0)).is_empty());
    }
}
