//! Astronomical primitives behind the lunar calendar.
//!
//! New moons and sun longitudes are approximated with the low-precision series
//! from Jean Meeus' "Astronomical Algorithms", which is accurate to a few
//! minutes over the supported range. All day numbers are Julian day numbers
//! (JDN), and local days are evaluated in Vietnam standard time.

use std::f64::consts::PI;

use chrono::{Datelike, NaiveDate};

/// Vietnam standard time offset from UTC, in hours.
pub const TIME_ZONE: f64 = 7.0;

/// Mean length of a synodic month, in days.
const SYNODIC_MONTH: f64 = 29.530588853;

/// Julian day of the new moon of 1900-01-01, used as `k = 0`.
const NEW_MOON_EPOCH: f64 = 2415021.076998695;

/// Difference between a JDN and chrono's days-from-CE count.
const JDN_CE_OFFSET: i64 = 1_721_425;

/// Julian day number of a Gregorian calendar day.
pub fn jdn_from_ymd(year: i32, month: u32, day: u32) -> i64 {
    let (year, month, day) = (year as i64, month as i64, day as i64);
    let a = (14 - month) / 12;
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;
    day + (153 * m + 2) / 5 + 365 * y + y / 4 - y / 100 + y / 400 - 32045
}

pub fn jdn(date: NaiveDate) -> i64 {
    jdn_from_ymd(date.year(), date.month(), date.day())
}

/// Gregorian date of a Julian day number, `None` if chrono cannot represent it.
pub fn date_from_jdn(jdn: i64) -> Option<NaiveDate> {
    i32::try_from(jdn - JDN_CE_OFFSET)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
}

/// Julian date (UT) of the `k`-th new moon after the 1900 epoch.
fn new_moon(k: i64) -> f64 {
    let k = k as f64;
    let t = k / 1236.85;
    let t2 = t * t;
    let t3 = t2 * t;
    let dr = PI / 180.0;

    let mut jd1 = 2415020.75933 + 29.53058868 * k + 0.0001178 * t2 - 0.000000155 * t3;
    jd1 += 0.00033 * ((166.56 + 132.87 * t - 0.009173 * t2) * dr).sin();

    // Sun's mean anomaly, moon's mean anomaly, moon's argument of latitude
    let m = 359.2242 + 29.10535608 * k - 0.0000333 * t2 - 0.00000347 * t3;
    let mpr = 306.0253 + 385.81691806 * k + 0.0107306 * t2 + 0.00001236 * t3;
    let f = 21.2964 + 390.67050646 * k - 0.0016528 * t2 - 0.00000239 * t3;

    let mut c1 = (0.1734 - 0.000393 * t) * (m * dr).sin() + 0.0021 * (2.0 * dr * m).sin();
    c1 += -0.4068 * (mpr * dr).sin() + 0.0161 * (dr * 2.0 * mpr).sin();
    c1 -= 0.0004 * (dr * 3.0 * mpr).sin();
    c1 += 0.0104 * (dr * 2.0 * f).sin() - 0.0051 * (dr * (m + mpr)).sin();
    c1 += -0.0074 * (dr * (m - mpr)).sin() + 0.0004 * (dr * (2.0 * f + m)).sin();
    c1 += -0.0004 * (dr * (2.0 * f - m)).sin() - 0.0006 * (dr * (2.0 * f + mpr)).sin();
    c1 += 0.0010 * (dr * (2.0 * f - mpr)).sin() + 0.0005 * (dr * (2.0 * mpr + m)).sin();

    let delta_t = if t < -11.0 {
        0.001 + 0.000839 * t + 0.0002261 * t2 - 0.00000845 * t3 - 0.000000081 * t * t3
    } else {
        -0.000278 + 0.000265 * t + 0.000262 * t2
    };

    jd1 + c1 - delta_t
}

/// Apparent sun longitude in radians, normalized to `[0, 2π)`.
fn sun_longitude(jd: f64) -> f64 {
    let t = (jd - 2451545.0) / 36525.0;
    let t2 = t * t;
    let dr = PI / 180.0;

    let m = 357.52910 + 35999.05030 * t - 0.0001559 * t2 - 0.00000048 * t * t2;
    let l0 = 280.46645 + 36000.76983 * t + 0.0003032 * t2;
    let mut dl = (1.914600 - 0.004817 * t - 0.000014 * t2) * (dr * m).sin();
    dl += (0.019993 - 0.000101 * t) * (dr * 2.0 * m).sin() + 0.000290 * (dr * 3.0 * m).sin();

    let l = (l0 + dl) * dr;
    l - 2.0 * PI * (l / (2.0 * PI)).floor()
}

/// Local day number on which the `k`-th new moon falls.
pub fn new_moon_day(k: i64) -> i64 {
    (new_moon(k) + 0.5 + TIME_ZONE / 24.0).floor() as i64
}

/// Index of the sun-longitude sector the sun is in at local midnight
/// starting `day`, with the ecliptic divided into `sectors` equal arcs
/// starting at the March equinox.
pub fn sun_sector(day: i64, sectors: u32) -> u32 {
    let longitude = sun_longitude(day as f64 - 0.5 - TIME_ZONE / 24.0);
    (longitude / PI * (sectors as f64 / 2.0)).floor() as u32
}

/// Index `k` of the lunation whose new moon is closest before `day`.
pub fn lunation_before(day: i64) -> i64 {
    ((day as f64 - NEW_MOON_EPOCH) / SYNODIC_MONTH).floor() as i64
}

/// Index `k` of the lunation starting on `month_start`.
pub fn lunation_at(month_start: i64) -> i64 {
    ((month_start as f64 - NEW_MOON_EPOCH) / SYNODIC_MONTH + 0.5).floor() as i64
}

/// Start day of the lunar month containing the winter solstice of `year`
/// (the 11th lunar month).
pub fn month11_start(year: i32) -> i64 {
    let off = jdn_from_ymd(year, 12, 31) - 2415021;
    let k = (off as f64 / SYNODIC_MONTH).floor() as i64;
    let start = new_moon_day(k);
    if sun_sector(start, 12) >= 9 {
        new_moon_day(k - 1)
    } else {
        start
    }
}

/// Offset, counted in months after month 11 starting `month11`, of the first
/// month containing no major solar term. That month is the leap month.
pub fn leap_month_offset(month11: i64) -> i64 {
    let k = lunation_at(month11);
    let mut i = 1;
    let mut arc = sun_sector(new_moon_day(k + i), 12);
    loop {
        let last = arc;
        i += 1;
        arc = sun_sector(new_moon_day(k + i), 12);
        if arc == last || i >= 14 {
            break;
        }
    }
    i - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jdn_matches_reference_epochs() {
        assert_eq!(jdn_from_ymd(2000, 1, 1), 2451545);
        assert_eq!(jdn_from_ymd(1900, 1, 1), 2415021);
        let date = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        assert_eq!(date_from_jdn(jdn(date)), Some(date));
    }

    #[test]
    fn new_moon_day_lands_on_known_new_moons() {
        // Tết 2024 began with the new moon of 2024-02-10 (UTC+7)
        let day = jdn_from_ymd(2024, 2, 10);
        let k = lunation_before(day);
        let start = if new_moon_day(k + 1) > day {
            new_moon_day(k)
        } else {
            new_moon_day(k + 1)
        };
        assert_eq!(start, day);
    }

    #[test]
    fn winter_solstice_sector() {
        // Between the December solstice (270°) and the following 300° mark
        let day = jdn_from_ymd(2024, 12, 25);
        assert_eq!(sun_sector(day, 12), 9);
        assert_eq!(sun_sector(day, 24), 18);
    }

    #[test]
    fn month11_contains_winter_solstice() {
        for year in [1985, 2000, 2023, 2024, 2033] {
            let start = month11_start(year);
            let solstice = jdn_from_ymd(year, 12, 22);
            assert!(start <= solstice, "{year}");
            assert!(solstice - start < 31, "{year}");
        }
    }
}
