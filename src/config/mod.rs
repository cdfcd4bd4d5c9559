//! Configuration loading and validation.

mod file;
mod types;
mod validate;

pub use file::load_config_file;
pub use types::{
    BandwidthConfig, Config, DetectionConfig, DetectionMode, DurationConfig, PostProcessingConfig,
    SidebandConfig, SyllableSequenceConfig,
};
pub use validate::{validate_config, validate_detection, validate_postprocessing};
