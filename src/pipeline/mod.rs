//! Detection and post-processing pipeline.

mod postprocess;
mod processor;

pub use postprocess::{PostProcessOutcome, PostProcessor, Stage, StageCount};
pub use processor::{DetectionResult, EventDetector};
