pub mod api;
pub mod config;
pub mod control;
pub mod error;
pub mod models;
pub mod settings;
pub mod state;
pub mod sunset;
pub mod telemetry;
