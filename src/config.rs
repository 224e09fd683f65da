use std::{ops::RangeInclusive, time::Duration};

use anyhow::{ensure, Context, Result};

use crate::sunset::Coordinates;

pub const DEFAULT_CORS_ORIGINS: &str =
    "https://simple-smart-hub-client.netlify.app,http://localhost:3000,https://wokwi.com";
pub const DEFAULT_SUNSET_API_URL: &str = "https://api.sunrise-sunset.org/json";
/// Accepted range for `SUNSET_TIMEOUT_SECS`.
pub const SUNSET_TIMEOUT_RANGE_SECS: RangeInclusive<u64> = 1..=10;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// Origins allowed to make credentialed cross-origin requests.
    pub cors_origins: Vec<String>,
    pub sunset_api_url: String,
    /// Location the sunset is looked up for.
    pub sunset_coords: Coordinates,
    /// Upper bound on a single sunset lookup.
    pub sunset_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server_host: optional("SERVER_HOST", "0.0.0.0"),
            server_port: optional("SERVER_PORT", "8000")
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            cors_origins: parse_list(&optional("CORS_ALLOWED_ORIGINS", DEFAULT_CORS_ORIGINS)),
            sunset_api_url: optional("SUNSET_API_URL", DEFAULT_SUNSET_API_URL),
            sunset_coords: Coordinates {
                latitude: optional("SUNSET_LATITUDE", &Coordinates::KINGSTON.latitude.to_string())
                    .parse()
                    .context("SUNSET_LATITUDE must be a number")?,
                longitude: optional(
                    "SUNSET_LONGITUDE",
                    &Coordinates::KINGSTON.longitude.to_string(),
                )
                .parse()
                .context("SUNSET_LONGITUDE must be a number")?,
            },
            sunset_timeout: parse_timeout(&optional("SUNSET_TIMEOUT_SECS", "3"))?,
        })
    }
}

/// Split a comma-separated list, dropping blanks.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parse a whole number of seconds within [`SUNSET_TIMEOUT_RANGE_SECS`].
fn parse_timeout(raw: &str) -> Result<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .context("SUNSET_TIMEOUT_SECS must be a whole number of seconds")?;
    ensure!(
        SUNSET_TIMEOUT_RANGE_SECS.contains(&secs),
        "SUNSET_TIMEOUT_SECS must be between {} and {}, got {secs}",
        SUNSET_TIMEOUT_RANGE_SECS.start(),
        SUNSET_TIMEOUT_RANGE_SECS.end()
    );
    Ok(Duration::from_secs(secs))
}

fn optional(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
