use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::db::{EventDateAnchor, RecurrencePolicy};
use crate::error::AppResult;
use crate::lunar::{self, SolarDate};
use crate::services::recurrence::{days_until, is_occurrence_day};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/next", get(next))
        .route("/previous", get(previous))
        .route("/base-date", post(base_date))
}

#[derive(Debug, Deserialize)]
pub struct OccurrenceQuery {
    pub day: u32,
    pub month: u32,
    #[serde(default)]
    pub leap: bool,
    /// Defaults to today in Vietnam.
    pub reference: Option<SolarDate>,
}

#[derive(Debug, Deserialize)]
pub struct BaseDateRequest {
    #[serde(flatten)]
    pub anchor: EventDateAnchor,
    #[serde(default)]
    pub is_yearly_lunar_repeat: bool,
    #[serde(default)]
    pub advance_days: i64,
    pub reference: Option<SolarDate>,
}

async fn next(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OccurrenceQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let reference = query.reference.unwrap_or_else(lunar::today);
    let occurrence = state
        .resolver
        .next_occurrence(query.day, query.month, query.leap, reference)?;

    Ok(Json(json!({
        "date": occurrence.date,
        "source_lunar_year": occurrence.source_lunar_year,
        "days_until": days_until(occurrence.date, reference),
        "is_today": is_occurrence_day(query.day, query.month, query.leap, reference)?,
    })))
}

async fn previous(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OccurrenceQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let reference = query.reference.unwrap_or_else(lunar::today);
    let occurrence = state
        .resolver
        .previous_occurrence(query.day, query.month, query.leap, reference)?;

    Ok(Json(json!({
        "date": occurrence.date,
        "source_lunar_year": occurrence.source_lunar_year,
        "days_until": days_until(occurrence.date, reference),
    })))
}

async fn base_date(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BaseDateRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let reference = req.reference.unwrap_or_else(lunar::today);
    let occurrence = state
        .resolver
        .resolve(&req.anchor, req.is_yearly_lunar_repeat, reference)?;
    let policy = RecurrencePolicy {
        repeat_yearly: req.is_yearly_lunar_repeat,
        advance_days: req.advance_days,
    };

    Ok(Json(json!({
        "base_date": occurrence.date,
        "source_lunar_year": occurrence.source_lunar_year,
        "trigger_date": policy.trigger_date(occurrence.date)?,
        "days_until": days_until(occurrence.date, reference),
    })))
}
