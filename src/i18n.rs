/*
Simple i18n helper.

This module provides:
- A tiny embedded translations store for VI/EN (compile-time embedded JSON).
- A simple `tr` function to lookup translations by key + optional params.
- Helpers rendering lunar dates and yearly notification descriptions.

Usage:
    use crate::i18n;
    let text = i18n::lunar_date_text(Some("vi"), &lunar);
    let msg = i18n::tr(Some("en"), "notification.next_date", Some(&[("date", "29/01/2025")]));

Notes:
- Placeholders in translation strings use single-brace format: `{name}`.
- Default language is `vi`. If a key is missing for the requested language,
  the fallback language will be used.
*/

use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::NaiveDate;

use crate::lunar::LunarDate;

pub const DEFAULT_LANG: &str = "vi";

static TRANSLATIONS: OnceLock<HashMap<String, HashMap<String, String>>> = OnceLock::new();

const VI_JSON: &str = r#"
{
  "lunar.month.1": "Giêng",
  "lunar.month.2": "Hai",
  "lunar.month.3": "Ba",
  "lunar.month.4": "Tư",
  "lunar.month.5": "Năm",
  "lunar.month.6": "Sáu",
  "lunar.month.7": "Bảy",
  "lunar.month.8": "Tám",
  "lunar.month.9": "Chín",
  "lunar.month.10": "Mười",
  "lunar.month.11": "Mười một",
  "lunar.month.12": "Chạp",
  "lunar.leap": " nhuận",
  "lunar.date_text": "Ngày {day} tháng {month}{leap} năm {year}",
  "notification.repeat_yearly": "🔄 Lặp lại hàng năm theo âm lịch",
  "notification.next_date": "📅 Thông báo kế tiếp: {date}",
  "notification.lunar_year": "🌙 Năm âm lịch: {year}",
  "app.name": "Nhắc nhở âm lịch"
}
"#;

const EN_JSON: &str = r#"
{
  "lunar.month.1": "First",
  "lunar.month.2": "Second",
  "lunar.month.3": "Third",
  "lunar.month.4": "Fourth",
  "lunar.month.5": "Fifth",
  "lunar.month.6": "Sixth",
  "lunar.month.7": "Seventh",
  "lunar.month.8": "Eighth",
  "lunar.month.9": "Ninth",
  "lunar.month.10": "Tenth",
  "lunar.month.11": "Eleventh",
  "lunar.month.12": "Twelfth",
  "lunar.leap": " (leap)",
  "lunar.date_text": "Day {day}, {month} month{leap}, year {year}",
  "notification.repeat_yearly": "🔄 Repeats yearly by the lunar calendar",
  "notification.next_date": "📅 Next notification: {date}",
  "notification.lunar_year": "🌙 Lunar year: {year}",
  "app.name": "Lunar Reminders"
}
"#;

/// Initialize translations map (lazy).
fn build_translations() -> HashMap<String, HashMap<String, String>> {
    let mut out: HashMap<String, HashMap<String, String>> = HashMap::new();

    // Parse VI
    let vi_map: HashMap<String, String> = serde_json::from_str(VI_JSON).unwrap_or_else(|e| {
        panic!("failed to parse VI_JSON in i18n module: {}", e);
    });
    out.insert("vi".to_string(), vi_map);

    // Parse EN
    let en_map: HashMap<String, String> = serde_json::from_str(EN_JSON).unwrap_or_else(|e| {
        panic!("failed to parse EN_JSON in i18n module: {}", e);
    });
    out.insert("en".to_string(), en_map);

    out
}

/// Returns the global translations map (lang -> (key -> message)).
fn translations() -> &'static HashMap<String, HashMap<String, String>> {
    TRANSLATIONS.get_or_init(build_translations)
}

/// Normalize a language tag into a short, lowercase code (e.g. "vi-VN" -> "vi").
pub fn normalize_language(lang: &str) -> String {
    lang.split('-').next().unwrap_or(lang).to_lowercase()
}

/// Returns true if the given language code has a translation table.
pub fn is_supported_language(lang: &str) -> bool {
    translations().contains_key(lang)
}

/// Supported language for a requested tag, or `fallback` when the tag is
/// missing or unknown.
pub fn resolve_language(requested: Option<&str>, fallback: &str) -> String {
    requested
        .map(normalize_language)
        .filter(|lang| is_supported_language(lang))
        .unwrap_or_else(|| fallback.to_string())
}

/// Translate a key using an explicit language (or default if None).
///
/// If no translation is found, returns the default language value or the key
/// itself.
pub fn tr(lang: Option<&str>, key: &str, params: Option<&[(&str, &str)]>) -> String {
    let map = translations();

    let desired = lang.unwrap_or(DEFAULT_LANG);

    let val = map
        .get(desired)
        .and_then(|m| m.get(key))
        .cloned()
        .or_else(|| map.get(DEFAULT_LANG).and_then(|m| m.get(key)).cloned())
        .unwrap_or_else(|| key.to_string());

    if let Some(params) = params {
        let mut s = val;
        for (k, v) in params {
            s = s.replace(&format!("{{{}}}", k), v);
        }
        s
    } else {
        val
    }
}

/// Convenience wrapper: translate using default language (DEFAULT_LANG).
pub fn t(key: &str) -> String {
    tr(None, key, None)
}

/// Display name of a lunar month number (Giêng .. Chạp).
pub fn lunar_month_name(lang: Option<&str>, month: u32) -> String {
    tr(lang, &format!("lunar.month.{}", month), None)
}

/// Long-form text of a lunar date, e.g. "Ngày 15 tháng Giêng năm 2024".
pub fn lunar_date_text(lang: Option<&str>, date: &LunarDate) -> String {
    let leap = if date.is_leap_month {
        tr(lang, "lunar.leap", None)
    } else {
        String::new()
    };
    tr(
        lang,
        "lunar.date_text",
        Some(&[
            ("day", &date.day.to_string()),
            ("month", &lunar_month_name(lang, date.month)),
            ("leap", &leap),
            ("year", &date.year.to_string()),
        ]),
    )
}

/// Description attached to the next instance of a yearly lunar notification.
pub fn next_notification_description(
    lang: Option<&str>,
    title: &str,
    next_date: NaiveDate,
    lunar_year: Option<i32>,
) -> String {
    let mut lines = vec![
        title.to_string(),
        String::new(),
        tr(lang, "notification.repeat_yearly", None),
        tr(
            lang,
            "notification.next_date",
            Some(&[("date", &next_date.format("%d/%m/%Y").to_string())]),
        ),
    ];
    if let Some(year) = lunar_year {
        lines.push(tr(
            lang,
            "notification.lunar_year",
            Some(&[("year", &year.to_string())]),
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lunar(day: u32, month: u32, year: i32, leap: bool) -> LunarDate {
        LunarDate {
            day,
            month,
            year,
            is_leap_month: leap,
            is_leap_year: leap,
        }
    }

    #[test]
    fn test_lunar_date_text() {
        assert_eq!(
            lunar_date_text(None, &lunar(15, 1, 2024, false)),
            "Ngày 15 tháng Giêng năm 2024"
        );
        assert_eq!(
            lunar_date_text(Some("vi"), &lunar(1, 2, 2023, true)),
            "Ngày 1 tháng Hai nhuận năm 2023"
        );
        assert_eq!(
            lunar_date_text(Some("en"), &lunar(1, 12, 2024, false)),
            "Day 1, Twelfth month, year 2024"
        );
    }

    #[test]
    fn test_next_notification_description() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 29).unwrap();
        let text = next_notification_description(None, "Tết", date, Some(2025));
        assert_eq!(
            text,
            "Tết\n\n🔄 Lặp lại hàng năm theo âm lịch\n📅 Thông báo kế tiếp: 29/01/2025\n🌙 Năm âm lịch: 2025"
        );
    }

    #[test]
    fn test_fallback_to_default() {
        assert_eq!(lunar_month_name(Some("fr"), 12), "Chạp");
    }

    #[test]
    fn missing_key_returns_key() {
        let k = "non.existent.key";
        assert_eq!(t(k), k.to_string());
    }

    #[test]
    fn test_is_supported_language() {
        assert!(is_supported_language("vi"));
        assert!(is_supported_language("en"));
        assert!(!is_supported_language("ru"));
    }

    #[test]
    fn test_resolve_language() {
        assert_eq!(resolve_language(Some("en-US"), "vi"), "en");
        assert_eq!(resolve_language(Some("EN"), "vi"), "en");
        assert_eq!(resolve_language(Some("fr"), "vi"), "vi");
        assert_eq!(resolve_language(None, "en"), "en");
    }

    #[test]
    fn test_normalize_language() {
        assert_eq!(normalize_language("vi-VN"), "vi");
        assert_eq!(normalize_language("EN-us"), "en");
    }
}
