use chrono::{DateTime, NaiveTime, Utc};
use uuid::Uuid;

/// Default temperature threshold (°C) above which the fan may run.
pub const DEFAULT_TEMPERATURE_THRESHOLD: f64 = 25.0;

/// The single current desired-state record.
///
/// Replaced wholesale on every successful update; `light_off` is always
/// derived from `light_on` plus a parsed duration, never set directly.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsSnapshot {
    /// Version marker, regenerated on every update.
    pub id: Uuid,
    /// Degrees Celsius
    pub temperature_threshold: f64,
    pub light_on: NaiveTime,
    pub light_off: NaiveTime,
    pub last_updated: DateTime<Utc>,
}

impl Default for SettingsSnapshot {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            temperature_threshold: DEFAULT_TEMPERATURE_THRESHOLD,
            light_on: NaiveTime::from_hms_opt(18, 0, 0).expect("18:00:00 is a valid time of day"),
            light_off: NaiveTime::from_hms_opt(22, 0, 0).expect("22:00:00 is a valid time of day"),
            last_updated: Utc::now(),
        }
    }
}

/// One sensor sample. Immutable once stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    /// Degrees Celsius
    pub temperature: f64,
    pub presence: bool,
    /// Assigned by the server at ingestion; never taken from the device.
    pub recorded_at: DateTime<Utc>,
}
