use chrono::{Duration, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::db::{EventStore, NotificationSetting};
use crate::error::CalendarError;
use crate::i18n;
use crate::lunar::{solar_to_lunar, SolarDate};
use crate::services::recurrence::{Occurrence, RecurrenceResolver};

/// Next instance of a yearly lunar notification, ready to be queued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledNotification {
    pub id: Uuid,
    pub setting_id: String,
    pub event_id: String,
    pub user_id: String,
    pub provider_id: String,
    pub occurrence_date: SolarDate,
    pub trigger_date: SolarDate,
    pub lunar_year: Option<i32>,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub year: i32,
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<String>,
    pub scheduled: Vec<ScheduledNotification>,
}

/// Materializes the next instance of every yearly-repeating lunar setting.
pub struct YearlyBatch;

impl YearlyBatch {
    /// Schedule every enabled yearly setting for `target_year`.
    ///
    /// Items are processed one by one; a failing setting is recorded in the
    /// report and does not stop the others.
    pub async fn run(
        store: &dyn EventStore,
        resolver: &RecurrenceResolver,
        target_year: i32,
        today: SolarDate,
        lang: Option<&str>,
    ) -> BatchReport {
        let mut report = BatchReport {
            year: target_year,
            ..Default::default()
        };

        let Some(year_start) = NaiveDate::from_ymd_opt(target_year, 1, 1) else {
            report
                .errors
                .push(CalendarError::UnsupportedYear(target_year).to_string());
            return report;
        };
        let reference = today.max(year_start);

        let settings = match store.yearly_repeating_settings().await {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to load yearly repeating settings: {}", e);
                report.errors.push(e.to_string());
                return report;
            }
        };

        tracing::info!(
            "Processing {} yearly lunar notifications for {} (reference {})",
            settings.len(),
            target_year,
            reference
        );

        for setting in &settings {
            match schedule_next(setting, resolver, reference, today, lang) {
                Ok(scheduled) => {
                    tracing::debug!(
                        "Setting {} scheduled for {} (event on {})",
                        setting.id,
                        scheduled.trigger_date,
                        scheduled.occurrence_date
                    );
                    report.success += 1;
                    report.scheduled.push(scheduled);
                }
                Err(e) => {
                    let message = format!(
                        "Failed to calculate next notification for setting {}: {}",
                        setting.id, e
                    );
                    tracing::warn!("{}", message);
                    report.failed += 1;
                    report.errors.push(message);
                }
            }
        }

        tracing::info!(
            "Yearly batch {} finished: {} scheduled, {} failed",
            target_year,
            report.success,
            report.failed
        );

        report
    }
}

/// First occurrence on or after `reference` whose trigger date has not
/// passed. Each retry searches from the day after the previous occurrence.
fn schedule_next(
    setting: &NotificationSetting,
    resolver: &RecurrenceResolver,
    reference: SolarDate,
    today: SolarDate,
    lang: Option<&str>,
) -> Result<ScheduledNotification, CalendarError> {
    let policy = setting.policy();
    let anchor = &setting.event.anchor;

    let mut occurrence: Occurrence = resolver.resolve(anchor, true, reference)?;
    for _ in 0..resolver.search_years() {
        let trigger_date = policy.trigger_date(occurrence.date)?;
        if trigger_date >= today {
            return Ok(ScheduledNotification {
                id: Uuid::new_v4(),
                setting_id: setting.id.clone(),
                event_id: setting.event_id.clone(),
                user_id: setting.user_id.clone(),
                provider_id: setting.provider_id.clone(),
                occurrence_date: occurrence.date,
                trigger_date,
                lunar_year: occurrence.source_lunar_year,
                description: i18n::next_notification_description(
                    lang,
                    &setting.event.title,
                    occurrence.date,
                    occurrence.source_lunar_year,
                ),
            });
        }
        occurrence = resolver.resolve(anchor, true, occurrence.date + Duration::days(1))?;
    }

    let lunar = solar_to_lunar(occurrence.date)?;
    Err(CalendarError::SearchExhausted {
        day: lunar.day,
        month: lunar.month,
        years: resolver.search_years(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{EventDateAnchor, EventRecord, InMemoryEventStore};
    use crate::error::{AppError, AppResult};
    use async_trait::async_trait;

    fn ymd(year: i32, month: u32, day: u32) -> SolarDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn setting(id: &str, anchor: EventDateAnchor, advance_days: i64) -> NotificationSetting {
        NotificationSetting {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            event_id: format!("evt-{id}"),
            provider_id: "telegram".to_string(),
            note: None,
            advance_days,
            lunar_repeat_yearly: true,
            is_enabled: true,
            event: EventRecord {
                id: format!("evt-{id}"),
                title: "Tết Nguyên Đán".to_string(),
                description: None,
                anchor,
            },
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl EventStore for BrokenStore {
        async fn yearly_repeating_settings(&self) -> AppResult<Vec<NotificationSetting>> {
            Err(AppError::Store("connection refused".to_string()))
        }

        async fn find_setting(&self, _id: &str) -> AppResult<Option<NotificationSetting>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn schedules_lunar_and_solar_anchors() {
        let store = InMemoryEventStore::new(vec![
            setting("tet", EventDateAnchor::lunar(1, 1, None, false), 3),
            // Hùng Kings festival 2023, repeated by its lunar date
            setting("hung", EventDateAnchor::solar(ymd(2023, 4, 29)), 0),
        ]);
        let resolver = RecurrenceResolver::default();

        let report = YearlyBatch::run(&store, &resolver, 2025, ymd(2024, 12, 1), None).await;

        assert_eq!(report.year, 2025);
        assert_eq!((report.success, report.failed), (2, 0));
        assert!(report.errors.is_empty());

        let tet = &report.scheduled[0];
        assert_eq!(tet.setting_id, "tet");
        assert_eq!(tet.occurrence_date, ymd(2025, 1, 29));
        assert_eq!(tet.trigger_date, ymd(2025, 1, 26));
        assert_eq!(tet.lunar_year, Some(2025));
        assert!(tet.description.contains("29/01/2025"));

        let hung = &report.scheduled[1];
        assert_eq!(hung.occurrence_date, ymd(2025, 4, 7));
        assert_eq!(hung.trigger_date, hung.occurrence_date);
    }

    #[tokio::test]
    async fn passed_trigger_moves_to_following_year() {
        let store =
            InMemoryEventStore::new(vec![setting("tet", EventDateAnchor::lunar(1, 1, None, false), 3)]);
        let resolver = RecurrenceResolver::default();

        let report = YearlyBatch::run(&store, &resolver, 2025, ymd(2025, 1, 28), None).await;

        assert_eq!(report.success, 1);
        assert_eq!(report.scheduled[0].occurrence_date, ymd(2026, 2, 17));
        assert_eq!(report.scheduled[0].trigger_date, ymd(2026, 2, 14));
    }

    #[tokio::test]
    async fn negative_advance_fires_after_event() {
        let store = InMemoryEventStore::new(vec![setting(
            "after",
            EventDateAnchor::lunar(1, 1, None, false),
            -49,
        )]);
        let resolver = RecurrenceResolver::default();

        let report = YearlyBatch::run(&store, &resolver, 2025, ymd(2025, 1, 1), None).await;

        let scheduled = &report.scheduled[0];
        assert_eq!(scheduled.occurrence_date, ymd(2025, 1, 29));
        assert_eq!(scheduled.trigger_date, ymd(2025, 3, 19));
    }

    #[tokio::test]
    async fn failing_setting_does_not_stop_the_batch() {
        let broken = EventDateAnchor {
            is_lunar: true,
            lunar_month: Some(7),
            ..Default::default()
        };
        let store = InMemoryEventStore::new(vec![
            setting("bad", broken, 0),
            setting("tet", EventDateAnchor::lunar(1, 1, None, false), 0),
        ]);
        let resolver = RecurrenceResolver::default();

        let report = YearlyBatch::run(&store, &resolver, 2025, ymd(2024, 12, 1), Some("en")).await;

        assert_eq!((report.success, report.failed), (1, 1));
        assert_eq!(report.scheduled[0].setting_id, "tet");
        assert!(report.errors[0]
            .starts_with("Failed to calculate next notification for setting bad: "));
        assert!(report.scheduled[0].description.contains("Next notification: 29/01/2025"));
    }

    #[tokio::test]
    async fn overflowing_advance_fails_only_its_setting() {
        let store = InMemoryEventStore::new(vec![
            setting("far", EventDateAnchor::lunar(1, 1, None, false), 1_000_000_000),
            setting("tet", EventDateAnchor::lunar(1, 1, None, false), 0),
        ]);
        let resolver = RecurrenceResolver::default();

        let report = YearlyBatch::run(&store, &resolver, 2025, ymd(2024, 12, 1), None).await;

        assert_eq!((report.success, report.failed), (1, 1));
        assert!(report.errors[0]
            .starts_with("Failed to calculate next notification for setting far: "));
        assert_eq!(report.scheduled[0].setting_id, "tet");
        assert_eq!(report.scheduled[0].occurrence_date, ymd(2025, 1, 29));
    }

    #[tokio::test]
    async fn store_failure_is_reported() {
        let resolver = RecurrenceResolver::default();
        let report = YearlyBatch::run(&BrokenStore, &resolver, 2025, ymd(2024, 12, 1), None).await;

        assert_eq!((report.success, report.failed), (0, 0));
        assert_eq!(report.errors.len(), 1);
        assert!(report.scheduled.is_empty());
    }
}
