//! Scoring detections against labelled events.

use crate::event::AcousticEvent;
use std::collections::HashSet;

/// Detection accuracy against a set of labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccuracyReport {
    /// Detections overlapping a label of the same recording.
    pub true_positives: usize,
    /// Detections overlapping no label.
    pub false_positives: usize,
    /// Labels no detection overlapped, counted only for recordings that
    /// produced detections.
    pub false_negatives: usize,
    /// `tp / (tp + fp)`, 0 when there are no detections.
    pub precision: f64,
    /// `tp / (tp + fn)`, 0 when nothing was matched or missed.
    pub recall: f64,
    /// Mean of precision and recall.
    pub accuracy: f64,
}

/// Events from the given recording.
pub fn events_in_source<'a>(events: &'a [AcousticEvent], source: &str) -> Vec<&'a AcousticEvent> {
    events
        .iter()
        .filter(|event| event.source() == Some(source))
        .collect()
}

/// Score detections against labels.
///
/// A detection is a true positive when it overlaps in time any label of the
/// same recording; several detections may match one label.
#[allow(clippy::cast_precision_loss)]
pub fn evaluate_detections(detections: &[AcousticEvent], labels: &[AcousticEvent]) -> AccuracyReport {
    let mut matched = vec![false; labels.len()];
    let mut sources = HashSet::new();
    let mut true_positives = 0;
    let mut false_positives = 0;

    for detection in detections {
        sources.insert(detection.source());
        let hit = labels
            .iter()
            .position(|label| detection.same_source(label) && detection.overlaps(label));
        match hit {
            Some(index) => {
                true_positives += 1;
                matched[index] = true;
            }
            None => false_positives += 1,
        }
    }

    let false_negatives = labels
        .iter()
        .zip(&matched)
        .filter(|(label, hit)| !**hit && sources.contains(&label.source()))
        .count();

    let ratio = |numerator: usize, denominator: usize| {
        if denominator == 0 {
            0.0
        } else {
            numerator as f64 / denominator as f64
        }
    };
    let precision = ratio(true_positives, true_positives + false_positives);
    let recall = ratio(true_positives, true_positives + false_negatives);

    AccuracyReport {
        true_positives,
        false_positives,
        false_negatives,
        precision,
        recall,
        accuracy: (precision + recall) / 2.0,
    }
}
