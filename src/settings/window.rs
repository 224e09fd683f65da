use std::sync::Arc;

use chrono::{NaiveTime, Timelike};
use tracing::debug;

use super::duration::parse_duration;
use crate::{
    error::ValidationError,
    sunset::{Coordinates, SunsetOracle},
};

/// On/off time-of-day pair for the light.
///
/// `off` may be earlier than `on` when the window crosses midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightWindow {
    pub on: NaiveTime,
    pub off: NaiveTime,
}

/// Turns a requested on-time (`"HH:MM:SS"` or `"sunset"`) and a duration
/// expression into a [`LightWindow`].
#[derive(Clone)]
pub struct WindowResolver {
    oracle: Arc<dyn SunsetOracle>,
    coords: Coordinates,
}

impl WindowResolver {
    pub fn new(oracle: Arc<dyn SunsetOracle>, coords: Coordinates) -> Self {
        Self { oracle, coords }
    }

    /// Resolve the window. The on-time is validated before the duration, so
    /// a bad on-time is reported even when the duration is also bad.
    ///
    /// A "sunset" request performs exactly one oracle lookup; a bad duration
    /// after a sunset lookup still fails.
    pub async fn resolve(
        &self,
        requested_on: &str,
        duration_text: &str,
    ) -> Result<LightWindow, ValidationError> {
        let on = if requested_on.trim().eq_ignore_ascii_case("sunset") {
            self.oracle.resolve_sunset(self.coords).await
        } else {
            parse_time_of_day(requested_on)?
        };

        let duration = parse_duration(duration_text)?;

        // Wraps past midnight; the day component is discarded.
        let (off, _) = on.overflowing_add_signed(duration);

        debug!(on = %on, off = %off, duration_secs = duration.num_seconds(), "Resolved light window");
        Ok(LightWindow { on, off })
    }
}

/// Parse a literal `HH:MM:SS` (or `HH:MM`) time of day.
///
/// Every field is exactly two digits and no surrounding whitespace is
/// allowed. Leap seconds (`23:59:60`) are rejected.
pub fn parse_time_of_day(text: &str) -> Result<NaiveTime, ValidationError> {
    let well_formed = matches!(text.len(), 5 | 8)
        && text.bytes().enumerate().all(|(i, b)| {
            if i % 3 == 2 {
                b == b':'
            } else {
                b.is_ascii_digit()
            }
        });
    if !well_formed {
        return Err(ValidationError::InvalidTime);
    }

    let format = if text.len() == 8 { "%H:%M:%S" } else { "%H:%M" };
    let time =
        NaiveTime::parse_from_str(text, format).map_err(|_| ValidationError::InvalidTime)?;

    // chrono's %S admits a leap second, encoded as nanosecond >= 1e9.
    if time.nanosecond() >= 1_000_000_000 {
        return Err(ValidationError::InvalidTime);
    }
    Ok(time)
}
