//! Vietnamese lunar calendar: conversion between solar and lunar dates and
//! derived day metadata. Everything here is a pure function of its inputs.

pub mod astro;
pub mod convert;
pub mod detail;

pub use convert::{
    days_in_month, is_leap_year, leap_month, leap_months, lunar_to_solar, solar_to_lunar, today,
    today_lunar, LunarDate, SolarDate, SUPPORTED_YEARS,
};
pub use detail::{detail_info, hour_name_at, LuckyHour, LunarDetailInfo};
