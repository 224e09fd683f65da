use anyhow::{anyhow, Context};
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Response envelope: GET /json?lat=..&lng=..&formatted=0
//
// Success:
//   { "results": { "sunrise": "2024-06-01T10:33:12+00:00",
//                  "sunset":  "2024-06-01T23:39:05+00:00", ... },
//     "status": "OK" }
//
// Failure:
//   { "results": "", "status": "INVALID_REQUEST" }
//
// `results` is an empty string on failure, so it is kept untyped until the
// status has been checked.
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SunriseSunsetResponse {
    /// `"OK"` on success; `"INVALID_REQUEST"`, `"INVALID_DATE"`,
    /// `"UNKNOWN_ERROR"` or `"INVALID_TZID"` otherwise.
    pub status: String,

    #[serde(default)]
    pub results: serde_json::Value,
}

impl SunriseSunsetResponse {
    /// Convert into `anyhow::Result<SunTimes>`, mapping API-level failures to errors.
    pub fn into_result(self) -> anyhow::Result<SunTimes> {
        if self.status != "OK" {
            return Err(anyhow!("sunrise-sunset API error: status={}", self.status));
        }
        serde_json::from_value(self.results).context("malformed sunrise-sunset results")
    }
}

/// Payload inside a successful response. Only the fields this service uses
/// are declared; the rest are ignored.
#[derive(Debug, Deserialize)]
pub struct SunTimes {
    pub sunrise: Option<DateTime<FixedOffset>>,
    /// ISO-8601 instant; UTC when `formatted=0` and no `tzid` is sent.
    pub sunset: DateTime<FixedOffset>,
}
