use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::i18n;
use crate::lunar::{self, SolarDate};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
    /// Current date in Vietnam, the zone every conversion is computed in.
    pub local_date: SolarDate,
}

pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: i18n::t("app.name"),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        local_date: lunar::today(),
    };

    (StatusCode::OK, Json(response))
}
