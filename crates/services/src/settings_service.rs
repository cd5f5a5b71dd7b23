use std::sync::Arc;

use quiz_core::model::{AdminSettings, AdminSettingsDraft};
use storage::repository::SettingsRepository;

use crate::error::SettingsError;

#[derive(Clone)]
pub struct AdminSettingsService {
    repo: Arc<dyn SettingsRepository>,
}

impl AdminSettingsService {
    #[must_use]
    pub fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        Self { repo }
    }

    /// Load persisted settings (or defaults if missing).
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` on storage failures.
    pub async fn load(&self) -> Result<AdminSettings, SettingsError> {
        let settings = self.repo.get_settings().await?;
        Ok(settings.unwrap_or_default())
    }

    /// Normalize and persist new settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` on storage failures.
    pub async fn save(&self, draft: AdminSettingsDraft) -> Result<AdminSettings, SettingsError> {
        let settings = draft.normalize();
        self.repo.save_settings(&settings).await?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn load_defaults_when_nothing_saved() {
        let service = AdminSettingsService::new(Arc::new(InMemoryRepository::new()));
        let settings = service.load().await.unwrap();
        assert_eq!(settings.notification_email(), None);
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let service = AdminSettingsService::new(Arc::new(InMemoryRepository::new()));
        service
            .save(AdminSettingsDraft {
                notification_email: Some(" admin@school.edu ".into()),
            })
            .await
            .unwrap();

        let settings = service.load().await.unwrap();
        assert_eq!(settings.notification_email(), Some("admin@school.edu"));
    }
}
