//! Derived metadata for a calendar day: Can Chi names, day of week, solar
//! term and lucky hours ("giờ hoàng đạo").

use chrono::Datelike;
use serde::Serialize;

use super::astro::{jdn, sun_sector};
use super::convert::{solar_to_lunar, LunarDate, SolarDate};
use crate::error::CalendarError;

/// The ten heavenly stems.
pub const CAN: [&str; 10] = [
    "Giáp", "Ất", "Bính", "Đinh", "Mậu", "Kỷ", "Canh", "Tân", "Nhâm", "Quý",
];

/// The twelve earthly branches.
pub const CHI: [&str; 12] = [
    "Tý", "Sửu", "Dần", "Mão", "Thìn", "Tỵ", "Ngọ", "Mùi", "Thân", "Dậu", "Tuất", "Hợi",
];

pub const WEEKDAYS: [&str; 7] = [
    "Chủ Nhật", "Thứ Hai", "Thứ Ba", "Thứ Tư", "Thứ Năm", "Thứ Sáu", "Thứ Bảy",
];

/// The 24 solar terms, starting at the March equinox (sun longitude 0°).
pub const SOLAR_TERMS: [&str; 24] = [
    "Xuân phân",
    "Thanh minh",
    "Cốc vũ",
    "Lập hạ",
    "Tiểu mãn",
    "Mang chủng",
    "Hạ chí",
    "Tiểu thử",
    "Đại thử",
    "Lập thu",
    "Xử thử",
    "Bạch lộ",
    "Thu phân",
    "Hàn lộ",
    "Sương giáng",
    "Lập đông",
    "Tiểu tuyết",
    "Đại tuyết",
    "Đông chí",
    "Tiểu hàn",
    "Đại hàn",
    "Lập xuân",
    "Vũ thủy",
    "Kinh trập",
];

/// Lucky two-hour periods, indexed by the day's branch modulo 6. Position `i`
/// of each row marks the period of branch `i`.
const LUCKY_HOURS: [[bool; 12]; 6] = {
    const X: bool = true;
    const O: bool = false;
    [
        [X, X, O, X, O, O, X, O, X, X, O, O],
        [O, O, X, X, O, X, O, O, X, O, X, X],
        [X, X, O, O, X, X, O, X, O, O, X, O],
        [X, O, X, X, O, O, X, X, O, X, O, O],
        [O, O, X, O, X, X, O, O, X, X, O, X],
        [O, X, O, O, X, O, X, X, O, O, X, X],
    ]
};

/// A lucky two-hour window `[start_hour, end_hour)`. The Tý window wraps
/// midnight (23 to 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LuckyHour {
    pub name: String,
    pub start_hour: u32,
    pub end_hour: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LunarDetailInfo {
    pub lunar_date: LunarDate,
    pub year_name: String,
    pub month_name: String,
    pub day_name: String,
    /// Name of the first (Tý) two-hour period of the day.
    pub hour_name: String,
    pub day_of_week: String,
    pub solar_term: String,
    pub lucky_hours: Vec<LuckyHour>,
}

fn can_chi(can: i64, chi: i64) -> String {
    format!(
        "{} {}",
        CAN[can.rem_euclid(10) as usize],
        CHI[chi.rem_euclid(12) as usize]
    )
}

pub fn year_name(lunar_year: i32) -> String {
    let year = lunar_year as i64;
    can_chi(year + 6, year + 8)
}

/// Leap months share the name of their regular sibling.
pub fn month_name(month: u32, lunar_year: i32) -> String {
    let (month, year) = (month as i64, lunar_year as i64);
    can_chi(year * 12 + month + 3, month + 1)
}

pub fn day_name(date: SolarDate) -> String {
    let jd = jdn(date);
    can_chi(jd + 9, jd + 1)
}

/// Name of the two-hour period containing `hour` (0..24) of `date`.
///
/// 23:00 opens the Tý period of the following day, so its stem is the one of
/// `date + 1` at hour 0.
pub fn hour_name_at(date: SolarDate, hour: u32) -> String {
    let jd = if hour >= 23 { jdn(date) + 1 } else { jdn(date) };
    let branch = ((hour as i64 + 1) / 2).rem_euclid(12);
    can_chi((jd - 1) * 2 + branch, branch)
}

pub fn day_of_week(date: SolarDate) -> &'static str {
    WEEKDAYS[date.weekday().num_days_from_sunday() as usize]
}

/// Solar term in effect on `date`.
pub fn solar_term(date: SolarDate) -> &'static str {
    SOLAR_TERMS[sun_sector(jdn(date) + 1, 24) as usize % 24]
}

pub fn lucky_hours(date: SolarDate) -> Vec<LuckyHour> {
    let branch = (jdn(date) + 1).rem_euclid(12) as usize;
    LUCKY_HOURS[branch % 6]
        .iter()
        .enumerate()
        .filter(|(_, lucky)| **lucky)
        .map(|(i, _)| {
            let i = i as u32;
            LuckyHour {
                name: CHI[i as usize].to_string(),
                start_hour: (i * 2 + 23) % 24,
                end_hour: (i * 2 + 1) % 24,
            }
        })
        .collect()
}

/// Full lunar view of a solar date.
pub fn detail_info(date: SolarDate) -> Result<LunarDetailInfo, CalendarError> {
    let lunar_date = solar_to_lunar(date)?;

    Ok(LunarDetailInfo {
        year_name: year_name(lunar_date.year),
        month_name: month_name(lunar_date.month, lunar_date.year),
        day_name: day_name(date),
        hour_name: hour_name_at(date, 0),
        day_of_week: day_of_week(date).to_string(),
        solar_term: solar_term(date).to_string(),
        lucky_hours: lucky_hours(date),
        lunar_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ymd(year: i32, month: u32, day: u32) -> SolarDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn year_names() {
        assert_eq!(year_name(2023), "Quý Mão");
        assert_eq!(year_name(2024), "Giáp Thìn");
        assert_eq!(year_name(2025), "Ất Tỵ");
        assert_eq!(year_name(1985), "Ất Sửu");
    }

    #[test]
    fn month_names() {
        assert_eq!(month_name(1, 2024), "Bính Dần");
        assert_eq!(month_name(12, 2024), "Đinh Sửu");
    }

    #[test]
    fn day_and_hour_names() {
        let date = ymd(2000, 1, 1);
        assert_eq!(day_name(date), "Mậu Ngọ");
        assert_eq!(hour_name_at(date, 0), "Nhâm Tý");
        assert_eq!(hour_name_at(date, 12), "Mậu Ngọ");
        assert_eq!(hour_name_at(date, 22), "Quý Hợi");
        assert_eq!(hour_name_at(date, 23), "Giáp Tý");
        assert_eq!(hour_name_at(date, 23), hour_name_at(ymd(2000, 1, 2), 0));
    }

    #[test]
    fn lucky_hours_for_ngo_day() {
        let hours = lucky_hours(ymd(2000, 1, 1));
        let names: Vec<_> = hours.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, ["Tý", "Sửu", "Mão", "Ngọ", "Thân", "Dậu"]);
        assert_eq!((hours[0].start_hour, hours[0].end_hour), (23, 1));
        assert_eq!((hours[3].start_hour, hours[3].end_hour), (11, 13));
    }

    #[test]
    fn every_day_has_six_lucky_hours() {
        for row in LUCKY_HOURS {
            assert_eq!(row.iter().filter(|lucky| **lucky).count(), 6);
        }
    }

    #[test]
    fn solar_terms() {
        assert_eq!(solar_term(ymd(2024, 12, 25)), "Đông chí");
        assert_eq!(solar_term(ymd(2024, 4, 1)), "Xuân phân");
        assert_eq!(solar_term(ymd(2024, 6, 25)), "Hạ chí");
    }

    #[test]
    fn detail_info_is_complete() {
        let info = detail_info(ymd(2024, 2, 10)).unwrap();
        assert_eq!((info.lunar_date.day, info.lunar_date.month), (1, 1));
        assert_eq!(info.year_name, "Giáp Thìn");
        assert_eq!(info.month_name, "Bính Dần");
        assert_eq!(info.day_of_week, "Thứ Bảy");
        assert_eq!(info.solar_term, "Lập xuân");
        assert_eq!(info.lucky_hours.len(), 6);
    }
}
