use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CalendarError;

// ============================================================================
// Event Models (owned by the event store)
// ============================================================================

/// Stored date of an event. Exactly one of the lunar fields or `solar_date`
/// is authoritative, depending on `is_lunar`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EventDateAnchor {
    pub is_lunar: bool,
    #[serde(default)]
    pub lunar_day: Option<u32>,
    #[serde(default)]
    pub lunar_month: Option<u32>,
    #[serde(default)]
    pub lunar_year: Option<i32>,
    #[serde(default)]
    pub is_leap_month: bool,
    #[serde(default)]
    pub solar_date: Option<NaiveDate>,
}

/// Validated form of an [`EventDateAnchor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorDate {
    Lunar {
        day: u32,
        month: u32,
        /// Missing for events only ever used as yearly anniversaries.
        year: Option<i32>,
        is_leap_month: bool,
    },
    Solar(NaiveDate),
}

impl EventDateAnchor {
    pub fn lunar(day: u32, month: u32, year: Option<i32>, is_leap_month: bool) -> Self {
        Self {
            is_lunar: true,
            lunar_day: Some(day),
            lunar_month: Some(month),
            lunar_year: year,
            is_leap_month,
            solar_date: None,
        }
    }

    pub fn solar(date: NaiveDate) -> Self {
        Self {
            is_lunar: false,
            solar_date: Some(date),
            ..Default::default()
        }
    }

    /// Check that the authoritative fields are present.
    pub fn date(&self) -> Result<AnchorDate, CalendarError> {
        if self.is_lunar {
            let day = self
                .lunar_day
                .ok_or_else(|| CalendarError::InvalidAnchor("missing lunar day".to_string()))?;
            let month = self
                .lunar_month
                .ok_or_else(|| CalendarError::InvalidAnchor("missing lunar month".to_string()))?;
            Ok(AnchorDate::Lunar {
                day,
                month,
                year: self.lunar_year,
                is_leap_month: self.is_leap_month,
            })
        } else {
            self.solar_date
                .map(AnchorDate::Solar)
                .ok_or_else(|| CalendarError::InvalidAnchor("missing solar date".to_string()))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub anchor: EventDateAnchor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lunar_anchor_requires_day_and_month() {
        let anchor = EventDateAnchor {
            is_lunar: true,
            lunar_month: Some(3),
            ..Default::default()
        };
        assert!(matches!(anchor.date(), Err(CalendarError::InvalidAnchor(_))));

        let anchor = EventDateAnchor::lunar(10, 3, Some(2024), false);
        assert_eq!(
            anchor.date(),
            Ok(AnchorDate::Lunar {
                day: 10,
                month: 3,
                year: Some(2024),
                is_leap_month: false,
            })
        );
    }

    #[test]
    fn solar_anchor_ignores_lunar_fields() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let anchor = EventDateAnchor {
            lunar_day: Some(1),
            ..EventDateAnchor::solar(date)
        };
        assert_eq!(anchor.date(), Ok(AnchorDate::Solar(date)));
        assert!(EventDateAnchor::default().date().is_err());
    }

    #[test]
    fn event_record_json_is_flat() {
        let json = r#"{
            "id": "evt-1",
            "title": "Giỗ ông nội",
            "is_lunar": true,
            "lunar_day": 15,
            "lunar_month": 7
        }"#;
        let event: EventRecord = serde_json::from_str(json).unwrap();
        assert_eq!(event.anchor, EventDateAnchor::lunar(15, 7, None, false));
        assert_eq!(event.description, None);
    }
}
