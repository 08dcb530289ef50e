use chrono::{Datelike, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use super::event::EventRecord;
use crate::error::CalendarError;

/// How a notification setting recurs and how far ahead it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RecurrencePolicy {
    pub repeat_yearly: bool,
    /// Days before the event. Negative values fire after it (e.g. -49 for
    /// the 49th day after a death).
    pub advance_days: i64,
}

impl RecurrencePolicy {
    /// Calendar day the notification fires for an event on `base`.
    pub fn trigger_date(&self, base: NaiveDate) -> Result<NaiveDate, CalendarError> {
        TimeDelta::try_days(self.advance_days)
            .and_then(|advance| base.checked_sub_signed(advance))
            .ok_or(CalendarError::AdvanceOutOfRange {
                base,
                advance_days: self.advance_days,
            })
    }
}

/// A notification channel attached to an event, joined with its event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSetting {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    pub provider_id: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub advance_days: i64,
    #[serde(default)]
    pub lunar_repeat_yearly: bool,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
    pub event: EventRecord,
}

fn default_enabled() -> bool {
    true
}

impl NotificationSetting {
    pub fn policy(&self) -> RecurrencePolicy {
        RecurrencePolicy {
            repeat_yearly: self.lunar_repeat_yearly,
            advance_days: self.advance_days,
        }
    }

    /// Whether the next yearly instance still has to be created, given the
    /// solar year the setting last fired in.
    pub fn should_create_next_instance(
        &self,
        last_triggered_year: Option<i32>,
        today: NaiveDate,
    ) -> bool {
        if !self.lunar_repeat_yearly {
            return false;
        }
        last_triggered_year.map_or(true, |year| year < today.year())
    }
}
