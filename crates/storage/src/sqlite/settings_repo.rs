use async_trait::async_trait;
use sqlx::Row;

use quiz_core::model::AdminSettings;

use super::SqliteRepository;
use super::mapping::ser;
use crate::repository::{SettingsRepository, StorageError};

#[async_trait]
impl SettingsRepository for SqliteRepository {
    async fn get_settings(&self) -> Result<Option<AdminSettings>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT notification_email
            FROM admin_settings
            WHERE id = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let notification_email: Option<String> = row.try_get("notification_email").map_err(ser)?;
        Ok(Some(AdminSettings::from_persisted(notification_email)))
    }

    async fn save_settings(&self, settings: &AdminSettings) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO admin_settings (id, notification_email)
            VALUES (?1, ?2)
            ON CONFLICT(id) DO UPDATE SET
                notification_email = excluded.notification_email
            ",
        )
        .bind(1_i64)
        .bind(settings.notification_email())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
