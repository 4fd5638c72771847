//! Health check endpoint.

use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Serialize)]
pub struct Health {
    pub status: String,
    pub time: String,
}

/// Health check endpoint.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
    })
}
