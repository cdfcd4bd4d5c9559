//! The acoustic event entity and operations over event lists.

mod accuracy;
mod region;
mod summary;
mod types;

pub use accuracy::{AccuracyReport, evaluate_detections, events_in_source};
pub use region::{Region, RegionState};
pub use summary::{UnitCount, events_per_unit_time};
pub use types::{AcousticEvent, ScoreRange};
