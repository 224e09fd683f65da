pub mod models;

use std::{future::Future, pin::Pin, time::Duration};

use anyhow::{Context, Result};
use chrono::NaiveTime;
use reqwest::Client;
use tracing::{debug, info, warn};

use self::models::SunriseSunsetResponse;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Latitude/longitude pair the sunset is looked up for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Kingston, Jamaica.
    pub const KINGSTON: Self = Self {
        latitude: 17.9970,
        longitude: -76.7936,
    };
}

/// Time-of-day used whenever the sunset cannot be looked up.
pub fn fallback_sunset() -> NaiveTime {
    NaiveTime::from_hms_opt(18, 0, 0).expect("18:00:00 is a valid time of day")
}

/// Resolves "sunset" into a time-of-day. Total: implementations absorb every
/// failure and return [`fallback_sunset`] instead.
pub trait SunsetOracle: Send + Sync {
    fn resolve_sunset(&self, coords: Coordinates) -> BoxFuture<'_, NaiveTime>;
}

// ---------------------------------------------------------------------------
// sunrise-sunset.org client
// ---------------------------------------------------------------------------

/// HTTP client for the sunrise-sunset.org lookup API.
///
/// One attempt per call, bounded by the client timeout. No caching.
#[derive(Debug, Clone)]
pub struct SunriseSunsetClient {
    http: Client,
    base_url: String,
}

impl SunriseSunsetClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build sunset HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Fetch today's sunset for `coords` and return its UTC time-of-day.
    pub async fn fetch_sunset(&self, coords: Coordinates) -> Result<NaiveTime> {
        let url = format!(
            "{}?lat={}&lng={}&formatted=0",
            self.base_url, coords.latitude, coords.longitude
        );
        debug!(url = %url, "Requesting sunset time");

        let bytes = self
            .http
            .get(&url)
            .send()
            .await
            .context("Sunset request failed")?
            .error_for_status()
            .context("Sunset endpoint returned error status")?
            .bytes()
            .await
            .context("Failed to read sunset response body")?;

        let times = serde_json::from_slice::<SunriseSunsetResponse>(&bytes)
            .context("Failed to deserialize sunset response")?
            .into_result()?;

        Ok(times.sunset.naive_utc().time())
    }
}

impl SunsetOracle for SunriseSunsetClient {
    fn resolve_sunset(&self, coords: Coordinates) -> BoxFuture<'_, NaiveTime> {
        Box::pin(async move {
            match self.fetch_sunset(coords).await {
                Ok(sunset) => {
                    info!(sunset = %sunset, "Retrieved sunset time");
                    sunset
                }
                Err(e) => {
                    let fallback = fallback_sunset();
                    warn!(error = %format!("{e:#}"), fallback = %fallback, "Error getting sunset time, using fallback");
                    fallback
                }
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Fixed oracle
// ---------------------------------------------------------------------------

/// Always answers with the same time. Deterministic stand-in for tests and
/// offline runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedSunset(pub NaiveTime);

impl SunsetOracle for FixedSunset {
    fn resolve_sunset(&self, _coords: Coordinates) -> BoxFuture<'_, NaiveTime> {
        let sunset = self.0;
        Box::pin(async move { sunset })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
    };

    use axum::{extract::Query, http::StatusCode, routing::get, Router};
    use tokio::net::TcpListener;

    use super::*;

    const OK_BODY: &str = r#"{
        "results": {
            "sunrise": "2024-06-01T10:33:12+00:00",
            "sunset": "2024-06-01T23:39:05+00:00"
        },
        "status": "OK"
    }"#;

    /// Serve `app` on an ephemeral local port and return the lookup URL.
    async fn spawn(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/json")
    }

    fn client(url: &str) -> SunriseSunsetClient {
        SunriseSunsetClient::new(url, Duration::from_millis(500)).unwrap()
    }

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[tokio::test]
    async fn returns_sunset_from_service() {
        let url = spawn(Router::new().route("/json", get(|| async { OK_BODY }))).await;

        let sunset = client(&url).resolve_sunset(Coordinates::KINGSTON).await;

        assert_eq!(sunset, hms(23, 39, 5));
    }

    #[tokio::test]
    async fn sends_coordinates_as_query_parameters() {
        let app = Router::new().route(
            "/json",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                let expected = q.get("lat").map(String::as_str) == Some("17.997")
                    && q.get("lng").map(String::as_str) == Some("-76.7936")
                    && q.get("formatted").map(String::as_str) == Some("0");
                if expected {
                    (StatusCode::OK, OK_BODY)
                } else {
                    (StatusCode::BAD_REQUEST, "")
                }
            }),
        );
        let url = spawn(app).await;

        let sunset = client(&url).fetch_sunset(Coordinates::KINGSTON).await.unwrap();

        assert_eq!(sunset, hms(23, 39, 5));
    }

    #[tokio::test]
    async fn non_utc_offset_is_normalised_to_utc() {
        let body = r#"{ "results": { "sunset": "2024-06-01T18:39:05-05:00" }, "status": "OK" }"#;
        let url = spawn(Router::new().route("/json", get(move || async move { body }))).await;

        let sunset = client(&url).fetch_sunset(Coordinates::KINGSTON).await.unwrap();

        assert_eq!(sunset, hms(23, 39, 5));
    }

    #[tokio::test]
    async fn error_status_falls_back() {
        let app = Router::new().route(
            "/json",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let url = spawn(app).await;

        let c = client(&url);
        assert!(c.fetch_sunset(Coordinates::KINGSTON).await.is_err());
        assert_eq!(c.resolve_sunset(Coordinates::KINGSTON).await, fallback_sunset());
    }

    #[tokio::test]
    async fn failed_lookup_is_not_retried() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/json",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
                }
            }),
        );
        let url = spawn(app).await;

        let sunset = client(&url).resolve_sunset(Coordinates::KINGSTON).await;

        assert_eq!(sunset, fallback_sunset());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn successive_lookups_are_not_cached() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/json",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    OK_BODY
                }
            }),
        );
        let url = spawn(app).await;
        let c = client(&url);

        c.resolve_sunset(Coordinates::KINGSTON).await;
        c.resolve_sunset(Coordinates::KINGSTON).await;

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn api_level_failure_falls_back() {
        let body = r#"{ "results": "", "status": "INVALID_REQUEST" }"#;
        let url = spawn(Router::new().route("/json", get(move || async move { body }))).await;

        let sunset = client(&url).resolve_sunset(Coordinates::KINGSTON).await;

        assert_eq!(sunset, fallback_sunset());
    }

    #[tokio::test]
    async fn malformed_body_falls_back() {
        let url = spawn(Router::new().route("/json", get(|| async { "not json" }))).await;

        let sunset = client(&url).resolve_sunset(Coordinates::KINGSTON).await;

        assert_eq!(sunset, fallback_sunset());
    }

    #[tokio::test]
    async fn timeout_falls_back() {
        let app = Router::new().route(
            "/json",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                OK_BODY
            }),
        );
        let url = spawn(app).await;
        let c = SunriseSunsetClient::new(url, Duration::from_millis(100)).unwrap();

        assert_eq!(c.resolve_sunset(Coordinates::KINGSTON).await, fallback_sunset());
    }

    #[tokio::test]
    async fn unreachable_service_falls_back() {
        // Nothing listens on port 1.
        let c = client("http://127.0.0.1:1/json");

        assert_eq!(c.resolve_sunset(Coordinates::KINGSTON).await, fallback_sunset());
    }

    #[tokio::test]
    async fn fixed_oracle_ignores_coordinates() {
        let oracle = FixedSunset(hms(19, 5, 0));
        let far_away = Coordinates {
            latitude: 64.1,
            longitude: -21.9,
        };

        assert_eq!(oracle.resolve_sunset(far_away).await, hms(19, 5, 0));
    }
}
