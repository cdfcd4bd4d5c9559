//! CLI argument validators.

/// Parse a finite number.
pub fn parse_finite(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !value.is_finite() {
        return Err(format!("value must be finite, got {value}"));
    }

    Ok(value)
}

/// Parse a strictly positive number of seconds.
pub fn parse_seconds(s: &str) -> Result<f64, String> {
    let value = parse_finite(s)?;
    if value <= 0.0 {
        return Err(format!("duration must be positive, got {value}"));
    }
    Ok(value)
}
