pub mod duration;
pub mod window;

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use self::window::WindowResolver;
use crate::{error::ValidationError, models::SettingsSnapshot};

/// A requested settings change, before window resolution.
#[derive(Debug, Clone)]
pub struct SettingsUpdate {
    pub temperature_threshold: f64,
    /// `"HH:MM:SS"` or `"sunset"`.
    pub light_on: String,
    /// Compact duration such as `"1h30m"`.
    pub light_duration: String,
}

/// Holder of the single current [`SettingsSnapshot`].
///
/// Cheap to clone; clones share the same snapshot. Updates replace the whole
/// snapshot under the write lock, so readers never observe a partial update.
#[derive(Clone)]
pub struct SettingsStore {
    inner: Arc<RwLock<SettingsSnapshot>>,
    resolver: WindowResolver,
}

impl SettingsStore {
    /// Start from the built-in defaults (25 °C, light 18:00:00–22:00:00).
    pub fn new(resolver: WindowResolver) -> Self {
        Self::with_snapshot(resolver, SettingsSnapshot::default())
    }

    pub fn with_snapshot(resolver: WindowResolver, snapshot: SettingsSnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(snapshot)),
            resolver,
        }
    }

    /// Return a copy of the current snapshot.
    pub async fn current(&self) -> SettingsSnapshot {
        self.inner.read().await.clone()
    }

    /// Resolve the light window and replace the snapshot.
    ///
    /// The window (and any sunset lookup) is resolved before the lock is
    /// taken. On error the current snapshot is left untouched.
    pub async fn update(&self, update: SettingsUpdate) -> Result<SettingsSnapshot, ValidationError> {
        let window = self
            .resolver
            .resolve(&update.light_on, &update.light_duration)
            .await?;

        let snapshot = SettingsSnapshot {
            id: Uuid::new_v4(),
            temperature_threshold: update.temperature_threshold,
            light_on: window.on,
            light_off: window.off,
            last_updated: Utc::now(),
        };

        *self.inner.write().await = snapshot.clone();

        info!(
            id = %snapshot.id,
            temperature_threshold = snapshot.temperature_threshold,
            light_on = %snapshot.light_on,
            light_off = %snapshot.light_off,
            "Settings updated"
        );
        Ok(snapshot)
    }
}
