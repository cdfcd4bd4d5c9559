//! Configuration validation.

use crate::config::{
    BandwidthConfig, Config, DetectionConfig, DetectionMode, DurationConfig, PostProcessingConfig,
    SidebandConfig, SyllableSequenceConfig,
};
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_detection(&config.detection)?;
    validate_postprocessing(&config.postprocessing)?;
    Ok(())
}

/// Validate segmentation settings.
pub fn validate_detection(detection: &DetectionConfig) -> Result<()> {
    non_negative("min_hertz", detection.min_hertz)?;
    ordered("min_hertz", detection.min_hertz, "max_hertz", detection.max_hertz)?;

    if !detection.threshold.is_finite() {
        return Err(invalid(format!(
            "threshold must be finite, got {}",
            detection.threshold
        )));
    }

    match detection.mode {
        DetectionMode::Score => {
            non_negative("min_duration", detection.min_duration)?;
            ordered(
                "min_duration",
                detection.min_duration,
                "max_duration",
                detection.max_duration,
            )?;
            if detection.score_max <= detection.score_min
                || !detection.score_min.is_finite()
                || !detection.score_max.is_finite()
            {
                return Err(invalid(format!(
                    "score_max ({}) must exceed score_min ({})",
                    detection.score_max, detection.score_min
                )));
            }
        }
        DetectionMode::VerticalTrack => {
            // scores normalise against [0, 5 * threshold]
            if detection.threshold <= 0.0 {
                return Err(invalid(format!(
                    "vertical track threshold must be positive, got {}",
                    detection.threshold
                )));
            }
            non_negative("min_bandwidth", detection.min_bandwidth)?;
            ordered(
                "min_bandwidth",
                detection.min_bandwidth,
                "max_bandwidth",
                detection.max_bandwidth,
            )?;
        }
    }

    Ok(())
}

/// Validate post-processing stages.
pub fn validate_postprocessing(postprocessing: &PostProcessingConfig) -> Result<()> {
    if let Some(sequence) = &postprocessing.syllable_sequence {
        validate_syllable_sequence(sequence)?;
    }
    if let Some(duration) = &postprocessing.duration {
        validate_duration(duration)?;
    }
    if let Some(bandwidth) = &postprocessing.bandwidth {
        validate_bandwidth(bandwidth)?;
    }
    if let Some(sideband) = &postprocessing.sideband_activity {
        validate_sideband(sideband)?;
    }
    Ok(())
}

fn validate_syllable_sequence(sequence: &SyllableSequenceConfig) -> Result<()> {
    non_negative("syllable_start_difference", sequence.syllable_start_difference)?;
    non_negative("syllable_hertz_gap", sequence.syllable_hertz_gap)?;

    if sequence.filter_syllable_sequence {
        non_negative("expected_period", sequence.expected_period)?;
        if sequence.syllable_max_count == 0 {
            return Err(invalid("syllable_max_count must be at least 1"));
        }
        if sequence.syllable_start_difference < sequence.expected_period {
            return Err(invalid(format!(
                "syllable_start_difference ({}) must not be below expected_period ({})",
                sequence.syllable_start_difference, sequence.expected_period
            )));
        }
    }
    Ok(())
}

fn validate_duration(duration: &DurationConfig) -> Result<()> {
    non_negative("expected_duration", duration.expected_duration)?;
    non_negative(
        "duration_standard_deviation",
        duration.duration_standard_deviation,
    )?;
    positive_sigma(duration.sigma_threshold)
}

fn validate_bandwidth(bandwidth: &BandwidthConfig) -> Result<()> {
    non_negative("expected_bandwidth", bandwidth.expected_bandwidth)?;
    non_negative(
        "bandwidth_standard_deviation",
        bandwidth.bandwidth_standard_deviation,
    )?;
    positive_sigma(bandwidth.sigma_threshold)
}

fn validate_sideband(sideband: &SidebandConfig) -> Result<()> {
    non_negative("lower_hertz_buffer", sideband.lower_hertz_buffer)?;
    non_negative("upper_hertz_buffer", sideband.upper_hertz_buffer)?;
    if !sideband.max_average_sideband_decibels.is_finite() {
        return Err(invalid(format!(
            "max_average_sideband_decibels must be finite, got {}",
            sideband.max_average_sideband_decibels
        )));
    }
    Ok(())
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(format!(
            "{name} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}

fn ordered(min_name: &str, min: f64, max_name: &str, max: f64) -> Result<()> {
    if !max.is_finite() || max < min {
        return Err(invalid(format!(
            "{max_name} ({max}) must not be below {min_name} ({min})"
        )));
    }
    Ok(())
}

fn positive_sigma(sigma: f64) -> Result<()> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(invalid(format!(
            "sigma_threshold must be positive, got {sigma}"
        )));
    }
    Ok(())
}

fn invalid(message: impl Into<String>) -> Error {
    Error::ConfigValidation {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_inverted_durations() {
        let mut config = Config::default();
        config.detection.min_duration = 2.0;
        config.detection.max_duration = 1.0;
        let result = validate_config(&config);
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }

    #[test]
    fn test_validate_inverted_band() {
        let mut config = Config::default();
        config.detection.min_hertz = 3000.0;
        config.detection.max_hertz = 1000.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_empty_score_range() {
        let mut config = Config::default();
        config.detection.score_max = config.detection.score_min;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_vertical_track_threshold() {
        let mut config = Config::default();
        config.detection.mode = DetectionMode::VerticalTrack;
        config.detection.threshold = 0.0;
        assert!(validate_config(&config).is_err());

        config.detection.threshold = 3.0;
        config.detection.min_bandwidth = 500.0;
        config.detection.max_bandwidth = 100.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_negative_buffer() {
        let mut config = Config::default();
        config.postprocessing.sideband_activity = Some(SidebandConfig {
            lower_hertz_buffer: -10.0,
            upper_hertz_buffer: 0.0,
            max_average_sideband_decibels: 3.0,
        });
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_negative_standard_deviation() {
        let mut config = Config::default();
        config.postprocessing.duration = Some(DurationConfig {
            expected_duration: 0.5,
            duration_standard_deviation: -0.1,
            sigma_threshold: 3.0,
        });
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_non_positive_sigma() {
        let mut config = Config::default();
        config.postprocessing.bandwidth = Some(BandwidthConfig {
            expected_bandwidth: 500.0,
            bandwidth_standard_deviation: 100.0,
            sigma_threshold: 0.0,
        });
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_gap_below_expected_period() {
        let mut config = Config::default();
        config.postprocessing.syllable_sequence = Some(SyllableSequenceConfig {
            syllable_start_difference: 0.2,
            expected_period: 0.3,
            filter_syllable_sequence: true,
            ..SyllableSequenceConfig::default()
        });
        assert!(validate_config(&config).is_err());

        // only checked when sequences are filtered
        if let Some(sequence) = config.postprocessing.syllable_sequence.as_mut() {
            sequence.filter_syllable_sequence = false;
        }
        assert!(validate_config(&config).is_ok());
    }
}
