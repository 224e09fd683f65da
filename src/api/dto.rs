use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    control::ControlCommand,
    models::{SensorReading, SettingsSnapshot},
    settings::SettingsUpdate,
};

/// Request body for `PUT /settings`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SettingsRequest {
    /// Fan threshold, degrees Celsius.
    pub user_temp: f64,
    /// Light on-time: `"HH:MM:SS"` or `"sunset"`.
    #[schema(example = "sunset")]
    pub user_light: String,
    /// How long the light stays on, e.g. `"4h"`, `"30m"`, `"1h30m"`.
    #[schema(example = "1h30m")]
    pub light_duration: String,
}

impl From<SettingsRequest> for SettingsUpdate {
    fn from(r: SettingsRequest) -> Self {
        Self {
            temperature_threshold: r.user_temp,
            light_on: r.user_light,
            light_duration: r.light_duration,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SettingsDto {
    /// Regenerated on every update.
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user_temp: f64,
    #[schema(value_type = String, example = "18:00:00")]
    pub user_light: NaiveTime,
    #[schema(value_type = String, example = "22:00:00")]
    pub light_time_off: NaiveTime,
    pub last_updated: DateTime<Utc>,
}

impl From<SettingsSnapshot> for SettingsDto {
    fn from(s: SettingsSnapshot) -> Self {
        Self {
            id: s.id,
            user_temp: s.temperature_threshold,
            user_light: s.light_on,
            light_time_off: s.light_off,
            last_updated: s.last_updated,
        }
    }
}

/// Request body for `POST /sensor-data`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SensorDataRequest {
    /// Degrees Celsius, must lie within [-20, 60].
    pub temperature: f64,
    pub presence: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SensorReadingDto {
    pub temperature: f64,
    pub presence: bool,
    /// Server-assigned ingestion time (UTC).
    #[serde(rename = "datetime")]
    pub recorded_at: DateTime<Utc>,
}

impl From<SensorReading> for SensorReadingDto {
    fn from(r: SensorReading) -> Self {
        Self {
            temperature: r.temperature,
            presence: r.presence,
            recorded_at: r.recorded_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ControlDto {
    pub fan: bool,
    pub light: bool,
    pub timestamp: DateTime<Utc>,
}

impl From<ControlCommand> for ControlDto {
    fn from(c: ControlCommand) -> Self {
        Self {
            fan: c.fan,
            light: c.light,
            timestamp: c.evaluated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusMessage {
    pub message: String,
    pub status: String,
}

impl StatusMessage {
    pub fn new(message: &str, status: &str) -> Self {
        Self {
            message: message.to_owned(),
            status: status.to_owned(),
        }
    }
}

/// Full system state, for diagnostics only.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DebugDto {
    pub settings: SettingsDto,
    pub latest_sensor: Option<SensorReadingDto>,
    pub sensor_count: usize,
    pub server_time: DateTime<Utc>,
    pub system_status: String,
}
