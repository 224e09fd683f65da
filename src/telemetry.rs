use std::{collections::VecDeque, ops::RangeInclusive, sync::Arc};

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::{error::ValidationError, models::SensorReading};

/// Maximum number of readings retained.
pub const HISTORY_CAPACITY: usize = 100;

/// Plausible physical range (°C) a reading must fall within to be stored.
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = -20.0..=60.0;

/// In-memory, fixed-capacity history of sensor readings in arrival order.
///
/// Wrapped in `Arc` so it can be cheaply cloned and shared across tasks.
/// Once full, each append evicts the oldest reading.
#[derive(Clone)]
pub struct TelemetryHistory {
    inner: Arc<RwLock<VecDeque<SensorReading>>>,
}

impl Default for TelemetryHistory {
    fn default() -> Self {
        Self {
            inner: Arc::new(RwLock::new(VecDeque::with_capacity(HISTORY_CAPACITY + 1))),
        }
    }
}

impl TelemetryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate, timestamp and store a reading. Returns the stored reading.
    pub async fn append(
        &self,
        temperature: f64,
        presence: bool,
    ) -> Result<SensorReading, ValidationError> {
        if !TEMPERATURE_RANGE.contains(&temperature) {
            warn!(temperature, "Invalid temperature reading");
            return Err(ValidationError::TemperatureOutOfRange(temperature));
        }

        let reading = SensorReading {
            temperature,
            presence,
            recorded_at: Utc::now(),
        };

        let mut readings = self.inner.write().await;
        readings.push_back(reading.clone());
        if readings.len() > HISTORY_CAPACITY {
            readings.pop_front();
        }
        drop(readings);

        info!(
            temperature = reading.temperature,
            presence = reading.presence,
            recorded_at = %reading.recorded_at,
            "Stored sensor reading"
        );
        Ok(reading)
    }

    /// The most recently appended reading, if any.
    pub async fn latest(&self) -> Option<SensorReading> {
        self.inner.read().await.back().cloned()
    }

    /// The last `n` readings, oldest first. Returns everything stored when
    /// fewer than `n` are available.
    pub async fn recent(&self, n: usize) -> Vec<SensorReading> {
        let readings = self.inner.read().await;
        let skip = readings.len().saturating_sub(n);
        readings.iter().skip(skip).cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_history_returns_nothing() {
        let history = TelemetryHistory::new();
        assert!(history.latest().await.is_none());
        assert!(history.recent(10).await.is_empty());
        assert!(history.is_empty().await);
    }

    #[tokio::test]
    async fn append_assigns_server_timestamp() {
        let history = TelemetryHistory::new();
        let before = Utc::now();

        let stored = history.append(22.5, true).await.unwrap();

        assert_eq!(stored.temperature, 22.5);
        assert!(stored.presence);
        assert!(stored.recorded_at >= before && stored.recorded_at <= Utc::now());
        assert_eq!(history.latest().await, Some(stored));
    }

    #[tokio::test]
    async fn latest_is_last_appended() {
        let history = TelemetryHistory::new();
        history.append(20.0, false).await.unwrap();
        history.append(21.0, true).await.unwrap();

        let latest = history.latest().await.unwrap();
        assert_eq!(latest.temperature, 21.0);
        assert!(latest.presence);
    }

    #[tokio::test]
    async fn out_of_range_temperature_is_rejected() {
        let history = TelemetryHistory::new();

        assert_eq!(
            history.append(61.0, true).await,
            Err(ValidationError::TemperatureOutOfRange(61.0))
        );
        assert!(history.append(-20.1, true).await.is_err());
        assert!(history.append(f64::NAN, true).await.is_err());
        assert!(history.is_empty().await);
    }

    #[tokio::test]
    async fn range_bounds_are_inclusive() {
        let history = TelemetryHistory::new();
        history.append(-20.0, false).await.unwrap();
        history.append(60.0, false).await.unwrap();
        history.append(59.9, false).await.unwrap();
        assert_eq!(history.len().await, 3);
    }

    #[tokio::test]
    async fn recent_returns_tail_oldest_first() {
        let history = TelemetryHistory::new();
        for t in [10.0, 11.0, 12.0, 13.0] {
            history.append(t, true).await.unwrap();
        }

        let temps: Vec<f64> = history.recent(2).await.iter().map(|r| r.temperature).collect();
        assert_eq!(temps, vec![12.0, 13.0]);
    }

    #[tokio::test]
    async fn recent_more_than_available_returns_all() {
        let history = TelemetryHistory::new();
        history.append(10.0, true).await.unwrap();
        history.append(11.0, true).await.unwrap();

        assert_eq!(history.recent(100).await.len(), 2);
    }

    #[tokio::test]
    async fn capacity_is_bounded_with_fifo_eviction() {
        let history = TelemetryHistory::new();
        for i in 0..150_i32 {
            // Keep within the accepted range.
            history.append(f64::from(i % 60), i % 2 == 0).await.unwrap();
        }

        assert_eq!(history.len().await, HISTORY_CAPACITY);

        let recent = history.recent(100).await;
        assert_eq!(recent.len(), 100);
        let expected: Vec<f64> = (50..150_i32).map(|i| f64::from(i % 60)).collect();
        let got: Vec<f64> = recent.iter().map(|r| r.temperature).collect();
        assert_eq!(got, expected);
        assert!(recent
            .windows(2)
            .all(|w| w[0].recorded_at <= w[1].recorded_at));
    }

    #[tokio::test]
    async fn clone_shares_state() {
        let history = TelemetryHistory::new();
        let clone = history.clone();

        history.append(30.0, true).await.unwrap();

        assert_eq!(clone.latest().await.unwrap().temperature, 30.0);
    }
}
