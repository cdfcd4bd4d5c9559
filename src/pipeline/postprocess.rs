//! Ordered post-processing of a raw event list.

use crate::combine::{combine_overlapping, combine_proximal};
use crate::config::{PostProcessingConfig, validate_postprocessing};
use crate::error::Result;
use crate::event::AcousticEvent;
use crate::filter::{
    filter_by_bandwidth, filter_by_duration, filter_sideband_activity, filter_syllable_sequences,
};
use crate::spectrogram::Spectrogram;
use tracing::debug;

/// Named post-processing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Events as they entered post-processing.
    Input,
    /// After merging overlapping events.
    CombineOverlapping,
    /// After merging syllable sequences.
    CombineSyllables,
    /// After the syllable count and periodicity filter.
    SyllableFilter,
    /// After the duration filter.
    Duration,
    /// After the bandwidth filter.
    Bandwidth,
    /// After the sideband activity filter.
    SidebandActivity,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::CombineOverlapping => write!(f, "combine overlapping"),
            Self::CombineSyllables => write!(f, "combine syllables"),
            Self::SyllableFilter => write!(f, "syllable filter"),
            Self::Duration => write!(f, "duration filter"),
            Self::Bandwidth => write!(f, "bandwidth filter"),
            Self::SidebandActivity => write!(f, "sideband filter"),
        }
    }
}

/// Number of events left after a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageCount {
    /// Stage that ran.
    pub stage: Stage,
    /// Events surviving it.
    pub events: usize,
}

/// Events accepted by post-processing, with per-stage counts.
#[derive(Debug, Clone, Default)]
pub struct PostProcessOutcome {
    /// Accepted events.
    pub events: Vec<AcousticEvent>,
    /// Surviving event count after each stage that ran, in order.
    pub stage_counts: Vec<StageCount>,
}

/// Runs the configured stages in a fixed order: overlap merge, syllable
/// merge and filter, duration, bandwidth, sideband activity.
#[derive(Debug, Clone)]
pub struct PostProcessor {
    config: PostProcessingConfig,
}

impl PostProcessor {
    /// Validate the configuration and build the processor.
    pub fn new(config: PostProcessingConfig) -> Result<Self> {
        validate_postprocessing(&config)?;
        Ok(Self { config })
    }

    /// Stage configuration.
    pub fn config(&self) -> &PostProcessingConfig {
        &self.config
    }

    /// Run every enabled stage over `events`.
    ///
    /// The spectrogram is only read by the sideband filter.
    pub fn process(
        &self,
        mut events: Vec<AcousticEvent>,
        spectrogram: &Spectrogram,
    ) -> PostProcessOutcome {
        let config = &self.config;
        let mut counts = Vec::new();
        let mut record = |stage: Stage, events: &[AcousticEvent]| {
            debug!("Event count after {stage} = {}", events.len());
            counts.push(StageCount {
                stage,
                events: events.len(),
            });
        };

        record(Stage::Input, &events);

        if config.combine_overlapping_events {
            events = combine_overlapping(events, config.score_combination);
            record(Stage::CombineOverlapping, &events);
        }

        if let Some(sequence) = &config.syllable_sequence
            && sequence.combine_possible_syllable_sequence
        {
            events = combine_proximal(
                events,
                &sequence.proximity_rule(),
                config.score_combination,
            );
            record(Stage::CombineSyllables, &events);

            if sequence.filter_syllable_sequence {
                events = filter_syllable_sequences(events, sequence);
                record(Stage::SyllableFilter, &events);
            }
        }

        if let Some(duration) = &config.duration {
            events = filter_by_duration(events, duration);
            record(Stage::Duration, &events);
        }

        if let Some(bandwidth) = &config.bandwidth {
            events = filter_by_bandwidth(events, bandwidth);
            record(Stage::Bandwidth, &events);
        }

        if let Some(sideband) = &config.sideband_activity {
            events = filter_sideband_activity(events, spectrogram, sideband);
            record(Stage::SidebandActivity, &events);
        }

        PostProcessOutcome {
            events,
            stage_counts: counts,
        }
    }
}
