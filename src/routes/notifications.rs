use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::Datelike;
use serde::Deserialize;
use serde_json::json;

use crate::db::NotificationSetting;
use crate::error::{AppError, AppResult};
use crate::i18n;
use crate::lunar::{self, SUPPORTED_YEARS};
use crate::services::{BatchReport, YearlyBatch};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/yearly-batch",
            get(list_yearly_settings).post(run_yearly_batch),
        )
        .route("/settings/:id", get(get_setting))
}

#[derive(Debug, Default, Deserialize)]
pub struct YearlyBatchRequest {
    /// Defaults to next year.
    pub target_year: Option<i32>,
    pub lang: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}

/// Materialize next instances of all yearly lunar notifications.
async fn run_yearly_batch(
    State(state): State<Arc<AppState>>,
    body: Option<Json<YearlyBatchRequest>>,
) -> AppResult<Json<BatchReport>> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let today = lunar::today();
    let target_year = req.target_year.unwrap_or(today.year() + 1);
    if !SUPPORTED_YEARS.contains(&target_year) {
        return Err(AppError::BadRequest(format!(
            "target_year {} is outside {}..={}",
            target_year,
            SUPPORTED_YEARS.start(),
            SUPPORTED_YEARS.end()
        )));
    }
    let lang = i18n::resolve_language(req.lang.as_deref(), &state.config.default_language);

    let report = YearlyBatch::run(
        state.store.as_ref(),
        &state.resolver,
        target_year,
        today,
        Some(&lang),
    )
    .await;

    Ok(Json(report))
}

/// Settings a batch for `year` would process.
async fn list_yearly_settings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<YearQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let year = query.year.unwrap_or(lunar::today().year() + 1);
    let settings = state.store.yearly_repeating_settings().await?;

    Ok(Json(json!({
        "year": year,
        "count": settings.len(),
        "settings": settings,
    })))
}

async fn get_setting(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<NotificationSetting>> {
    state
        .store
        .find_setting(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Notification setting {}", id)))
}
