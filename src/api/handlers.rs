use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};
use utoipa::OpenApi;

use super::{
    dto::{
        ControlDto, DebugDto, SensorDataRequest, SensorReadingDto, SettingsDto, SettingsRequest,
        StatusMessage,
    },
    errors::AppError,
};
use crate::{control, error::ValidationError, state::AppState, telemetry::HISTORY_CAPACITY};

/// Number of readings `GET /graph` returns when `size` is omitted.
pub const DEFAULT_GRAPH_SIZE: usize = 10;

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct GraphParams {
    pub size: Option<usize>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Liveness message.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is running", body = StatusMessage),
    ),
    tag = "system"
)]
pub async fn root() -> Json<StatusMessage> {
    Json(StatusMessage::new("Smart Hub API is running", "healthy"))
}

/// Return the current settings snapshot.
#[utoipa::path(
    get,
    path = "/settings",
    responses(
        (status = 200, description = "Current settings", body = SettingsDto),
    ),
    tag = "settings"
)]
pub async fn get_settings(State(state): State<AppState>) -> Json<SettingsDto> {
    info!("Returning current settings");
    Json(state.settings.current().await.into())
}

/// Replace the settings. `user_light` may be `"sunset"`, in which case the
/// on-time is looked up (falling back to 18:00:00 if the lookup fails).
#[utoipa::path(
    put,
    path = "/settings",
    request_body = SettingsRequest,
    responses(
        (status = 200, description = "Settings applied", body = SettingsDto),
        (status = 400, description = "Invalid time or duration format"),
        (status = 422, description = "Body does not match the request schema"),
    ),
    tag = "settings"
)]
pub async fn update_settings(
    State(state): State<AppState>,
    payload: Result<Json<SettingsRequest>, JsonRejection>,
) -> Result<Json<SettingsDto>, AppError> {
    let Json(req) = payload?;
    info!(
        user_temp = req.user_temp,
        user_light = %req.user_light,
        light_duration = %req.light_duration,
        "Received settings update"
    );

    let user_light = req.user_light.clone();
    let light_duration = req.light_duration.clone();

    let snapshot = state.settings.update(req.into()).await.map_err(|e| {
        warn!(
            user_light = %user_light,
            light_duration = %light_duration,
            error = %e,
            "Rejected settings update"
        );
        e
    })?;

    Ok(Json(snapshot.into()))
}

/// Ingest one sensor reading. The timestamp is assigned by the server.
#[utoipa::path(
    post,
    path = "/sensor-data",
    request_body = SensorDataRequest,
    responses(
        (status = 200, description = "Reading stored", body = StatusMessage),
        (status = 400, description = "Temperature outside [-20, 60]"),
        (status = 422, description = "Body does not match the request schema"),
    ),
    tag = "sensors"
)]
pub async fn receive_sensor_data(
    State(state): State<AppState>,
    payload: Result<Json<SensorDataRequest>, JsonRejection>,
) -> Result<Json<StatusMessage>, AppError> {
    let Json(req) = payload?;
    state.history.append(req.temperature, req.presence).await?;
    Ok(Json(StatusMessage::new("Data received", "success")))
}

/// The most recent readings, oldest first.
#[utoipa::path(
    get,
    path = "/graph",
    params(
        ("size" = Option<usize>, Query, description = "Number of readings, 1..=100 (default 10)"),
    ),
    responses(
        (status = 200, description = "Recent readings", body = Vec<SensorReadingDto>),
        (status = 400, description = "size out of range or not a number"),
    ),
    tag = "sensors"
)]
pub async fn get_graph_data(
    State(state): State<AppState>,
    params: Result<Query<GraphParams>, QueryRejection>,
) -> Result<Json<Vec<SensorReadingDto>>, AppError> {
    let Query(params) = params?;
    let size = params.size.unwrap_or(DEFAULT_GRAPH_SIZE);
    if !(1..=HISTORY_CAPACITY).contains(&size) {
        return Err(ValidationError::InvalidGraphSize(size).into());
    }

    info!(size, "Requested graph data");
    let readings = state.history.recent(size).await;
    Ok(Json(readings.into_iter().map(Into::into).collect()))
}

/// Fan and light commands derived from the settings and the latest reading.
/// Always succeeds; both are off while no reading has been received.
#[utoipa::path(
    get,
    path = "/control",
    responses(
        (status = 200, description = "Actuator commands", body = ControlDto),
    ),
    tag = "control"
)]
pub async fn get_control_commands(State(state): State<AppState>) -> Json<ControlDto> {
    let settings = state.settings.current().await;
    let latest = state.history.latest().await;

    let command = control::evaluate(&settings, latest.as_ref(), Utc::now());
    Json(command.into())
}

/// Full system state for debugging.
#[utoipa::path(
    get,
    path = "/debug",
    responses(
        (status = 200, description = "System state", body = DebugDto),
    ),
    tag = "system"
)]
pub async fn debug_info(State(state): State<AppState>) -> Json<DebugDto> {
    Json(DebugDto {
        settings: state.settings.current().await.into(),
        latest_sensor: state.history.latest().await.map(Into::into),
        sensor_count: state.history.len().await,
        server_time: Utc::now(),
        system_status: "operational".to_owned(),
    })
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(
        root,
        get_settings,
        update_settings,
        receive_sensor_data,
        get_graph_data,
        get_control_commands,
        debug_info
    ),
    components(schemas(
        SettingsRequest,
        SettingsDto,
        SensorDataRequest,
        SensorReadingDto,
        ControlDto,
        StatusMessage,
        DebugDto
    )),
    tags(
        (name = "settings", description = "Desired-state settings"),
        (name = "sensors",  description = "Sensor telemetry"),
        (name = "control",  description = "Actuator commands"),
        (name = "system",   description = "System endpoints"),
    ),
    info(
        title = "Smart Hub API",
        version = "0.1.0",
        description = "Settings, telemetry and fan/light control for a single smart-hub device"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
