//! Merging of overlapping and proximal events.
//!
//! Both merges work the same way: events are sorted by recording-absolute
//! start, every combinable pair is joined in a [`DisjointSet`], and each
//! cluster collapses into one event spanning the union of its members. The
//! round repeats until nothing merges, because a grown event can reach
//! neighbours its members could not. The result is therefore transitive and
//! running a merge twice changes nothing.

mod disjoint;

pub use disjoint::DisjointSet;

use crate::event::AcousticEvent;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// How member scores combine into the score of a merged event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreCombination {
    /// Highest member score.
    #[default]
    Max,
    /// Mean of member scores.
    Mean,
}

impl ScoreCombination {
    /// Combine a non-empty list of scores.
    #[allow(clippy::cast_precision_loss)]
    pub fn combine(self, scores: &[f64]) -> f64 {
        match self {
            Self::Max => scores.iter().copied().reduce(f64::max).unwrap_or(0.0),
            Self::Mean if scores.is_empty() => 0.0,
            Self::Mean => scores.iter().sum::<f64>() / scores.len() as f64,
        }
    }
}

/// Where the gap between two candidate syllables is measured from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartGap {
    /// Earlier event's start to later event's start.
    ///
    /// Matches the start-to-start period the sequence filter checks.
    #[default]
    FromPreviousStart,
    /// Earlier event's end to later event's start.
    FromPreviousEnd,
}

/// Proximity rule for joining syllables into a sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityRule {
    /// Largest allowed start gap in seconds.
    pub start_difference: f64,
    /// Largest allowed difference between the low edges, and between the
    /// high edges, in Hz.
    pub hertz_gap: f64,
    /// Reference point of the start gap.
    pub start_gap: StartGap,
}

impl ProximityRule {
    /// Whether `later` continues the sequence started by `earlier`.
    pub fn is_proximal(&self, earlier: &AcousticEvent, later: &AcousticEvent) -> bool {
        let reference = match self.start_gap {
            StartGap::FromPreviousStart => earlier.absolute_start(),
            StartGap::FromPreviousEnd => earlier.absolute_end(),
        };
        later.absolute_start() - reference <= self.start_difference
            && (earlier.min_hz() - later.min_hz()).abs() <= self.hertz_gap
            && (earlier.max_hz() - later.max_hz()).abs() <= self.hertz_gap
    }
}

/// Merge events from the same recording whose time intervals overlap.
///
/// Frequency is ignored; the merged band is the union of the member bands.
pub fn combine_overlapping(
    events: Vec<AcousticEvent>,
    scoring: ScoreCombination,
) -> Vec<AcousticEvent> {
    merge_until_stable(events, scoring, |earlier, later| {
        earlier.same_source(later) && earlier.overlaps(later)
    })
}

/// Merge events from the same recording that look like successive
/// syllables of one call.
pub fn combine_proximal(
    events: Vec<AcousticEvent>,
    rule: &ProximityRule,
    scoring: ScoreCombination,
) -> Vec<AcousticEvent> {
    merge_until_stable(events, scoring, |earlier, later| {
        earlier.same_source(later) && rule.is_proximal(earlier, later)
    })
}

fn merge_until_stable<F>(
    mut events: Vec<AcousticEvent>,
    scoring: ScoreCombination,
    combinable: F,
) -> Vec<AcousticEvent>
where
    F: Fn(&AcousticEvent, &AcousticEvent) -> bool,
{
    let input = events.len();
    let mut rounds = 0;
    loop {
        events.sort_by(|a, b| a.absolute_start().total_cmp(&b.absolute_start()));
        let before = events.len();
        events = merge_round(events, scoring, &combinable);
        rounds += 1;
        if events.len() == before {
            break;
        }
    }

    for event in &mut events {
        if event.region().is_none() {
            event.derive_region();
        }
    }

    debug!(
        "Merged {input} event(s) into {} over {rounds} round(s)",
        events.len()
    );
    events
}

fn merge_round<F>(
    events: Vec<AcousticEvent>,
    scoring: ScoreCombination,
    combinable: &F,
) -> Vec<AcousticEvent>
where
    F: Fn(&AcousticEvent, &AcousticEvent) -> bool,
{
    let mut set = DisjointSet::new(events.len());
    for i in 0..events.len() {
        for j in (i + 1)..events.len() {
            if combinable(&events[i], &events[j]) {
                set.union(i, j);
            }
        }
    }

    let mut slots: Vec<Option<AcousticEvent>> = events.into_iter().map(Some).collect();
    let mut merged = Vec::new();
    for group in set.groups() {
        let mut members = group.iter().filter_map(|&index| slots[index].take());
        let Some(mut event) = members.next() else {
            continue;
        };
        let mut scores = vec![event.score()];
        for member in members {
            trace!(
                "Absorbing event at {:.3}s into event at {:.3}s",
                member.absolute_start(),
                event.absolute_start()
            );
            scores.push(member.score());
            event.absorb(&member);
        }
        if scores.len() > 1 {
            event.set_score(scoring.combine(&scores));
        }
        merged.push(event);
    }
    merged
}
