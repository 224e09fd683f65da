use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::models::{SensorReading, SettingsSnapshot};

/// Derived actuator state. Recomputed on every query, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlCommand {
    pub fan: bool,
    pub light: bool,
    pub evaluated_at: DateTime<Utc>,
}

/// Map the current settings, the latest reading and the current instant to
/// actuator commands.
///
/// - No reading: everything off.
/// - Fan: temperature strictly above the threshold and someone present.
/// - Light: time of day (UTC) inside `[light_on, light_off]` and someone
///   present.
pub fn evaluate(
    settings: &SettingsSnapshot,
    latest: Option<&SensorReading>,
    now: DateTime<Utc>,
) -> ControlCommand {
    let Some(reading) = latest else {
        info!("No sensor readings available, defaulting to OFF");
        return ControlCommand {
            fan: false,
            light: false,
            evaluated_at: now,
        };
    };

    let time_of_day = now.time();

    let fan = reading.temperature > settings.temperature_threshold && reading.presence;
    // TODO: treat light_off < light_on as a window spanning midnight; today
    // such a window never matches.
    let light = settings.light_on <= time_of_day
        && time_of_day <= settings.light_off
        && reading.presence;

    debug!(
        temperature = reading.temperature,
        threshold = settings.temperature_threshold,
        presence = reading.presence,
        time = %time_of_day,
        light_on = %settings.light_on,
        light_off = %settings.light_off,
        "Control inputs"
    );
    info!(fan, light, "Control decision");

    ControlCommand {
        fan,
        light,
        evaluated_at: now,
    }
}
