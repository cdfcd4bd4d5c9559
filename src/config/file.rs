//! Configuration file loading.

use crate::config::Config;
use crate::error::{Error, Result};
use std::path::Path;

/// Load configuration from a TOML file.
///
/// Returns default config if the file does not exist.
pub fn load_config_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::combine::{ScoreCombination, StartGap};
    use crate::config::DetectionMode;
    use crate::segment::Aggregator;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_nonexistent_file_returns_default() {
        let path = Path::new("/nonexistent/path/config.toml");
        let config = load_config_file(path);
        assert!(config.is_ok());
        let config = config.ok().unwrap();
        assert_eq!(config.detection.mode, DetectionMode::Score);
        assert!(config.postprocessing.duration.is_none());
    }

    #[test]
    fn test_load_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[detection]
name = "whistle"
mode = "vertical_track"
min_hertz = 500.0
max_hertz = 3000.0
threshold = 2.0
aggregator = "peak"

[postprocessing]
combine_overlapping_events = true
score_combination = "mean"

[postprocessing.syllable_sequence]
syllable_start_difference = 0.6
syllable_hertz_gap = 150.0
start_gap = "from_previous_end"

[postprocessing.bandwidth]
expected_bandwidth = 1000.0
bandwidth_standard_deviation = 200.0
"#
        )
        .unwrap();

        let config = load_config_file(file.path()).unwrap();
        assert_eq!(config.detection.name, "whistle");
        assert_eq!(config.detection.mode, DetectionMode::VerticalTrack);
        assert_eq!(config.detection.aggregator, Aggregator::Peak);
        assert_eq!(config.detection.threshold, 2.0);
        assert!(config.postprocessing.combine_overlapping_events);
        assert_eq!(
            config.postprocessing.score_combination,
            ScoreCombination::Mean
        );

        let sequence = config.postprocessing.syllable_sequence.unwrap();
        assert!(sequence.combine_possible_syllable_sequence);
        assert_eq!(sequence.start_gap, StartGap::FromPreviousEnd);
        assert_eq!(sequence.syllable_hertz_gap, 150.0);

        let bandwidth = config.postprocessing.bandwidth.unwrap();
        assert_eq!(bandwidth.sigma_threshold, 3.0);
        assert!(config.postprocessing.sideband_activity.is_none());
    }

    #[test]
    fn test_load_invalid_toml_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "this is not valid toml {{{{").unwrap();

        let config = load_config_file(file.path());
        assert!(matches!(config, Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_load_unknown_mode_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[detection]\nmode = \"spectral_peak\"").unwrap();
        assert!(load_config_file(file.path()).is_err());
    }
}
