use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppResult, CalendarError};
use crate::i18n;
use crate::lunar::{self, SolarDate, SUPPORTED_YEARS};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/today", get(today))
        .route("/from-solar", get(from_solar))
        .route("/to-solar", get(to_solar))
        .route("/leap-months/:year", get(leap_months))
        .route("/detail", get(detail))
}

#[derive(Debug, Deserialize)]
pub struct SolarDateQuery {
    pub date: SolarDate,
    pub lang: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LunarDateQuery {
    pub day: u32,
    pub month: u32,
    pub year: i32,
    #[serde(default)]
    pub leap: bool,
}

async fn today(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LangQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let date = lunar::today();
    let info = lunar::detail_info(date)?;
    let lang = i18n::resolve_language(query.lang.as_deref(), &state.config.default_language);

    Ok(Json(json!({
        "solar_date": date,
        "text": i18n::lunar_date_text(Some(&lang), &info.lunar_date),
        "detail": info,
    })))
}

async fn from_solar(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SolarDateQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let lunar_date = lunar::solar_to_lunar(query.date)?;
    let lang = i18n::resolve_language(query.lang.as_deref(), &state.config.default_language);

    Ok(Json(json!({
        "solar_date": query.date,
        "lunar_date": lunar_date,
        "text": i18n::lunar_date_text(Some(&lang), &lunar_date),
    })))
}

async fn to_solar(Query(query): Query<LunarDateQuery>) -> AppResult<Json<serde_json::Value>> {
    let solar_date = lunar::lunar_to_solar(query.day, query.month, query.year, query.leap)?;

    Ok(Json(json!({
        "solar_date": solar_date,
        "day_of_week": lunar::detail::day_of_week(solar_date),
    })))
}

async fn leap_months(Path(year): Path<i32>) -> AppResult<Json<serde_json::Value>> {
    if !SUPPORTED_YEARS.contains(&year) {
        return Err(CalendarError::UnsupportedYear(year).into());
    }
    let months = lunar::leap_months(year);

    Ok(Json(json!({
        "year": year,
        "is_leap_year": !months.is_empty(),
        "leap_months": months,
    })))
}

async fn detail(Query(query): Query<SolarDateQuery>) -> AppResult<Json<lunar::LunarDetailInfo>> {
    Ok(Json(lunar::detail_info(query.date)?))
}
