use std::path::Path;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::db::models::*;
use crate::error::{AppError, AppResult};

// ============================================================================
// Event Store
// ============================================================================

/// Read access to the events and notification settings kept by the backend.
#[async_trait]
pub trait EventStore: Send + Sync + 'static {
    /// Enabled settings repeating yearly by the lunar calendar.
    async fn yearly_repeating_settings(&self) -> AppResult<Vec<NotificationSetting>>;

    async fn find_setting(&self, id: &str) -> AppResult<Option<NotificationSetting>>;
}

/// Settings held in memory, optionally seeded from a JSON array on disk.
#[derive(Default)]
pub struct InMemoryEventStore {
    settings: RwLock<Vec<NotificationSetting>>,
}

impl InMemoryEventStore {
    pub fn new(settings: Vec<NotificationSetting>) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }

    pub async fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::Store(format!("failed to read {}: {}", path.display(), e)))?;
        let settings: Vec<NotificationSetting> = serde_json::from_str(&raw)
            .map_err(|e| AppError::Store(format!("failed to parse {}: {}", path.display(), e)))?;

        tracing::info!(
            "Loaded {} notification settings from {}",
            settings.len(),
            path.display()
        );

        Ok(Self::new(settings))
    }

    pub async fn insert(&self, setting: NotificationSetting) {
        let mut settings = self.settings.write().await;
        settings.retain(|s| s.id != setting.id);
        settings.push(setting);
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn yearly_repeating_settings(&self) -> AppResult<Vec<NotificationSetting>> {
        let settings = self.settings.read().await;
        Ok(settings
            .iter()
            .filter(|s| s.lunar_repeat_yearly && s.is_enabled)
            .cloned()
            .collect())
    }

    async fn find_setting(&self, id: &str) -> AppResult<Option<NotificationSetting>> {
        let settings = self.settings.read().await;
        Ok(settings.iter().find(|s| s.id == id).cloned())
    }
}
