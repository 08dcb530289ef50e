use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;

/// Failures of the conversion engine and the recurrence resolver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    #[error("Cannot convert solar date {0} to a lunar date")]
    Conversion(NaiveDate),

    #[error("Lunar year {year} has no leap month {month}")]
    LeapMonthNotFound { month: u32, year: i32 },

    #[error("Lunar month {month} of {year} has only {days_in_month} days, day {day} does not exist")]
    DayOutOfRange {
        day: u32,
        month: u32,
        year: i32,
        is_leap_month: bool,
        days_in_month: u32,
    },

    #[error("Invalid lunar date: day {day}, month {month}")]
    InvalidLunarDate { day: u32, month: u32 },

    #[error("Year {0} is outside the supported range")]
    UnsupportedYear(i32),

    #[error("No occurrence of lunar day {day}/{month} found within {years} years")]
    SearchExhausted { day: u32, month: u32, years: u32 },

    #[error("Invalid event date: {0}")]
    InvalidAnchor(String),

    #[error("Advance of {advance_days} days from {base} leaves the calendar")]
    AdvanceOutOfRange { base: NaiveDate, advance_days: i64 },
}

impl CalendarError {
    /// The requested lunar day does not exist in that particular year, which
    /// a yearly search treats as "no occurrence this year".
    pub fn is_missing_occurrence(&self) -> bool {
        matches!(
            self,
            CalendarError::LeapMonthNotFound { .. } | CalendarError::DayOutOfRange { .. }
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),

    #[error("Event store error: {0}")]
    Store(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Calendar(e) => {
                let (status, code) = match e {
                    CalendarError::Conversion(_) => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "CONVERSION_ERROR")
                    }
                    CalendarError::LeapMonthNotFound { .. } => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "LEAP_MONTH_NOT_FOUND")
                    }
                    CalendarError::DayOutOfRange { .. } => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "DAY_OUT_OF_RANGE")
                    }
                    CalendarError::SearchExhausted { .. } => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "RECURRENCE_SEARCH_EXHAUSTED")
                    }
                    CalendarError::InvalidLunarDate { .. }
                    | CalendarError::UnsupportedYear(_)
                    | CalendarError::InvalidAnchor(_)
                    | CalendarError::AdvanceOutOfRange { .. } => {
                        (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
                    }
                };
                (status, code, e.to_string())
            }
            AppError::Store(msg) => {
                tracing::error!("Event store error: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "STORE_UNAVAILABLE",
                    "The event store is unavailable".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_occurrence_kinds() {
        assert!(CalendarError::LeapMonthNotFound { month: 4, year: 2024 }.is_missing_occurrence());
        assert!(CalendarError::DayOutOfRange {
            day: 30,
            month: 2,
            year: 2024,
            is_leap_month: false,
            days_in_month: 29,
        }
        .is_missing_occurrence());
        assert!(!CalendarError::UnsupportedYear(2500).is_missing_occurrence());
        assert!(!CalendarError::InvalidLunarDate { day: 31, month: 1 }.is_missing_occurrence());
    }

    #[test]
    fn calendar_errors_map_to_status_codes() {
        let resp = AppError::from(CalendarError::LeapMonthNotFound { month: 4, year: 2024 })
            .into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let resp = AppError::from(CalendarError::InvalidAnchor("missing lunar day".into()))
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
