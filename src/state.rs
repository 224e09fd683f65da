use crate::{settings::SettingsStore, telemetry::TelemetryHistory};

/// Shared handler state. Each component carries its own lock.
#[derive(Clone)]
pub struct AppState {
    pub settings: SettingsStore,
    pub history: TelemetryHistory,
}

impl AppState {
    pub fn new(settings: SettingsStore, history: TelemetryHistory) -> Self {
        Self { settings, history }
    }
}
