use thiserror::Error;

/// Bad input shape or range. Surfaced to HTTP clients as `400` with the
/// `Display` text as the detail message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid time format. Use HH:MM:SS or 'sunset'")]
    InvalidTime,

    #[error("Invalid duration format. Use like '1h', '30m', etc.")]
    InvalidDuration,

    #[error("Invalid temperature reading")]
    TemperatureOutOfRange(f64),

    #[error("size must be between 1 and {max}", max = crate::telemetry::HISTORY_CAPACITY)]
    InvalidGraphSize(usize),
}
