use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;

use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::astro::{
    date_from_jdn, jdn, leap_month_offset, lunation_at, lunation_before, month11_start,
    new_moon_day, TIME_ZONE,
};
use crate::error::CalendarError;

/// Gregorian calendar date. Carries no lunar metadata.
pub type SolarDate = NaiveDate;

/// Years (solar and lunar) the conversion is defined for.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1800..=2199;

/// A day of the Vietnamese lunisolar calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LunarDate {
    pub day: u32,
    pub month: u32,
    pub year: i32,
    /// The inserted duplicate month, as opposed to its regular sibling.
    pub is_leap_month: bool,
    /// The lunar year contains a leap month.
    pub is_leap_year: bool,
}

impl fmt::Display for LunarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.day, self.month, self.year)?;
        if self.is_leap_month {
            write!(f, " (nhuận)")?;
        }
        Ok(())
    }
}

/// Current solar date in Vietnam.
pub fn today() -> SolarDate {
    let offset = Duration::seconds((TIME_ZONE * 3600.0) as i64);
    (Utc::now() + offset).date_naive()
}

pub fn today_lunar() -> Result<LunarDate, CalendarError> {
    solar_to_lunar(today())
}

/// Month number of a leap month sitting `offset` months after month 11.
fn leap_month_number(offset: i64) -> u32 {
    ((offset + 10 - 1).rem_euclid(12) + 1) as u32
}

/// Leap month of the 11th-month-to-11th-month cycle starting in solar `year`.
fn cycle_leap_month(year: i32) -> Option<u32> {
    let a11 = month11_start(year);
    let b11 = month11_start(year + 1);
    (b11 - a11 > 365).then(|| leap_month_number(leap_month_offset(a11)))
}

/// Leap month of a lunar year, if it has one.
///
/// Months 1 to 10 of lunar year `Y` belong to the cycle starting at month 11
/// of `Y - 1`, months 11 and 12 to the cycle starting at month 11 of `Y`.
pub fn leap_month(lunar_year: i32) -> Option<u32> {
    cycle_leap_month(lunar_year - 1)
        .filter(|month| *month <= 10)
        .or_else(|| cycle_leap_month(lunar_year).filter(|month| *month >= 11))
}

/// All leap month numbers of a lunar year. Holds at most one element.
pub fn leap_months(lunar_year: i32) -> BTreeSet<u32> {
    leap_month(lunar_year).into_iter().collect()
}

pub fn is_leap_year(lunar_year: i32) -> bool {
    leap_month(lunar_year).is_some()
}

/// Convert a Gregorian date to its Vietnamese lunar date.
pub fn solar_to_lunar(date: SolarDate) -> Result<LunarDate, CalendarError> {
    if !SUPPORTED_YEARS.contains(&date.year()) {
        return Err(CalendarError::Conversion(date));
    }

    let day_number = jdn(date);
    let k = lunation_before(day_number);
    let mut month_start = new_moon_day(k + 1);
    if month_start > day_number {
        month_start = new_moon_day(k);
    }

    let year = date.year();
    let mut a11 = month11_start(year);
    let mut b11 = a11;
    let mut lunar_year;
    if a11 >= month_start {
        lunar_year = year;
        a11 = month11_start(year - 1);
    } else {
        lunar_year = year + 1;
        b11 = month11_start(year + 1);
    }

    let day = day_number - month_start + 1;
    let diff = (month_start - a11) / 29;
    let mut month = diff + 11;
    let mut is_leap_month = false;
    if b11 - a11 > 365 {
        let leap_offset = leap_month_offset(a11);
        if diff >= leap_offset {
            month = diff + 10;
            is_leap_month = diff == leap_offset;
        }
    }
    if month > 12 {
        month -= 12;
    }
    if month >= 11 && diff < 4 {
        lunar_year -= 1;
    }

    // Dates before Tết 1800 fall in lunar 1799.
    if !(1..=30).contains(&day)
        || !(1..=12).contains(&month)
        || !SUPPORTED_YEARS.contains(&lunar_year)
    {
        return Err(CalendarError::Conversion(date));
    }

    Ok(LunarDate {
        day: day as u32,
        month: month as u32,
        year: lunar_year,
        is_leap_month,
        is_leap_year: is_leap_year(lunar_year),
    })
}

/// Start day (JDN) of a lunar month and of the month after it.
fn month_bounds(month: u32, year: i32, is_leap_month: bool) -> Result<(i64, i64), CalendarError> {
    if !(1..=12).contains(&month) {
        return Err(CalendarError::InvalidLunarDate { day: 1, month });
    }
    if !SUPPORTED_YEARS.contains(&year) {
        return Err(CalendarError::UnsupportedYear(year));
    }

    let (a11, b11) = if month < 11 {
        (month11_start(year - 1), month11_start(year))
    } else {
        (month11_start(year), month11_start(year + 1))
    };

    let k = lunation_at(a11);
    let mut off = (month as i64 - 11).rem_euclid(12);
    if b11 - a11 > 365 {
        let leap_offset = leap_month_offset(a11);
        if is_leap_month && month != leap_month_number(leap_offset) {
            return Err(CalendarError::LeapMonthNotFound { month, year });
        }
        if is_leap_month || off >= leap_offset {
            off += 1;
        }
    } else if is_leap_month {
        return Err(CalendarError::LeapMonthNotFound { month, year });
    }

    Ok((new_moon_day(k + off), new_moon_day(k + off + 1)))
}

/// Number of days (29 or 30) of a lunar month.
pub fn days_in_month(month: u32, year: i32, is_leap_month: bool) -> Result<u32, CalendarError> {
    let (start, next) = month_bounds(month, year, is_leap_month)?;
    Ok((next - start) as u32)
}

/// Convert a lunar date to its Gregorian date.
///
/// Fails with [`CalendarError::LeapMonthNotFound`] when `is_leap_month` is set
/// but `year` has no leap month numbered `month`, and with
/// [`CalendarError::DayOutOfRange`] when the month has only 29 days.
pub fn lunar_to_solar(
    day: u32,
    month: u32,
    year: i32,
    is_leap_month: bool,
) -> Result<SolarDate, CalendarError> {
    if !(1..=30).contains(&day) {
        return Err(CalendarError::InvalidLunarDate { day, month });
    }

    let (start, next) = month_bounds(month, year, is_leap_month)?;
    let days_in_month = (next - start) as u32;
    if day > days_in_month {
        return Err(CalendarError::DayOutOfRange {
            day,
            month,
            year,
            is_leap_month,
            days_in_month,
        });
    }

    date_from_jdn(start + day as i64 - 1).ok_or(CalendarError::UnsupportedYear(year))
}
