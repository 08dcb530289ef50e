use serde::Serialize;
use tracing::debug;

use crate::db::models::{AnchorDate, EventDateAnchor};
use crate::error::CalendarError;
use crate::lunar::{lunar_to_solar, solar_to_lunar, SolarDate};

/// Default number of lunar years a yearly search inspects.
pub const DEFAULT_SEARCH_YEARS: u32 = 5;

/// One concrete trigger point of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub date: SolarDate,
    /// Lunar year the occurrence was computed for; `None` for solar events.
    pub source_lunar_year: Option<i32>,
}

/// Resolves when an event occurs relative to a reference date.
///
/// Holds no state besides the search bound: every answer is recomputed from
/// `(anchor, policy, reference)`, so nothing drifts as time passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurrenceResolver {
    search_years: u32,
}

impl Default for RecurrenceResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_YEARS)
    }
}

impl RecurrenceResolver {
    pub fn new(search_years: u32) -> Self {
        Self {
            search_years: search_years.max(1),
        }
    }

    pub fn search_years(&self) -> u32 {
        self.search_years
    }

    /// First solar date on or after `reference` falling on lunar
    /// `day`/`month`.
    ///
    /// Years in which that lunar day does not exist (no such leap month, or a
    /// 29-day month asked for day 30) are skipped.
    pub fn next_occurrence(
        &self,
        day: u32,
        month: u32,
        is_leap_month: bool,
        reference: SolarDate,
    ) -> Result<Occurrence, CalendarError> {
        let start = solar_to_lunar(reference)?.year;
        let years = (start..).take(self.search_years as usize);
        self.search(day, month, is_leap_month, years, |date| date >= reference)
    }

    /// Last solar date strictly before `reference` falling on lunar
    /// `day`/`month`.
    pub fn previous_occurrence(
        &self,
        day: u32,
        month: u32,
        is_leap_month: bool,
        reference: SolarDate,
    ) -> Result<Occurrence, CalendarError> {
        let start = solar_to_lunar(reference)?.year;
        let years = (0..self.search_years as i32).map(|offset| start - offset);
        self.search(day, month, is_leap_month, years, |date| date < reference)
    }

    fn search(
        &self,
        day: u32,
        month: u32,
        is_leap_month: bool,
        years: impl Iterator<Item = i32>,
        accept: impl Fn(SolarDate) -> bool,
    ) -> Result<Occurrence, CalendarError> {
        for year in years {
            match lunar_to_solar(day, month, year, is_leap_month) {
                Ok(date) if accept(date) => {
                    return Ok(Occurrence {
                        date,
                        source_lunar_year: Some(year),
                    })
                }
                Ok(_) => {}
                Err(e) if e.is_missing_occurrence() => {
                    debug!("Skipping lunar year {}: {}", year, e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(CalendarError::SearchExhausted {
            day,
            month,
            years: self.search_years,
        })
    }

    /// Occurrence an event's notifications are computed from.
    ///
    /// | anchor | yearly | result |
    /// |---|---|---|
    /// | lunar | no | the stored lunar date converted once |
    /// | solar | no | the stored solar date |
    /// | lunar | yes | next occurrence of the stored day/month (regular month) |
    /// | solar | yes | next occurrence of the stored date's lunar day/month (regular month) |
    pub fn resolve(
        &self,
        anchor: &EventDateAnchor,
        is_yearly_lunar_repeat: bool,
        reference: SolarDate,
    ) -> Result<Occurrence, CalendarError> {
        match (anchor.date()?, is_yearly_lunar_repeat) {
            (
                AnchorDate::Lunar {
                    day,
                    month,
                    year,
                    is_leap_month,
                },
                false,
            ) => {
                let year = match year {
                    Some(year) => year,
                    None => solar_to_lunar(reference)?.year,
                };
                let date = lunar_to_solar(day, month, year, is_leap_month)?;
                Ok(Occurrence {
                    date,
                    source_lunar_year: Some(year),
                })
            }
            (AnchorDate::Solar(date), false) => Ok(Occurrence {
                date,
                source_lunar_year: None,
            }),
            (AnchorDate::Lunar { day, month, .. }, true) => {
                self.next_occurrence(day, month, false, reference)
            }
            (AnchorDate::Solar(date), true) => {
                let lunar = solar_to_lunar(date)?;
                self.next_occurrence(lunar.day, lunar.month, false, reference)
            }
        }
    }

    /// Solar date notifications of an event are based on. Callers subtract
    /// the setting's advance days themselves.
    pub fn calculate_notification_base_date(
        &self,
        anchor: &EventDateAnchor,
        is_yearly_lunar_repeat: bool,
        reference: SolarDate,
    ) -> Result<SolarDate, CalendarError> {
        self.resolve(anchor, is_yearly_lunar_repeat, reference)
            .map(|occurrence| occurrence.date)
    }
}

/// Whether `date` is lunar `day`/`month` (in the leap or regular month).
pub fn is_occurrence_day(
    day: u32,
    month: u32,
    is_leap_month: bool,
    date: SolarDate,
) -> Result<bool, CalendarError> {
    let lunar = solar_to_lunar(date)?;
    Ok(lunar.day == day && lunar.month == month && lunar.is_leap_month == is_leap_month)
}

/// Whole days from `reference` to `date`, negative when `date` has passed.
pub fn days_until(date: SolarDate, reference: SolarDate) -> i64 {
    (date - reference).num_days()
}
