//! Platform settings service.

use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde_json::json;

use crate::server::{
    data::{audit_log::AuditLogRepository, setting::SettingRepository},
    error::AppError,
    model::{
        audit::{action, RecordAuditParam},
        setting::{Setting, SettingKey},
        user::User,
    },
    util::parse::parse_input,
};

pub struct SettingService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SettingService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists every known setting with its effective value.
    pub async fn list(&self) -> Result<Vec<Setting>, AppError> {
        Ok(SettingRepository::new(self.db).get_all().await?)
    }

    /// Changes a setting and records the change in the audit log.
    ///
    /// # Returns
    /// - `Ok(Setting)` - The updated setting
    /// - `Err(AppError::BadRequest)` - Unknown key, or value of the wrong type or range
    pub async fn update(
        &self,
        actor: &User,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<Setting, AppError> {
        let key: SettingKey = parse_input("setting key", key)?;
        let value = key.parse_json(value)?;

        let txn = self.db.begin().await?;

        let previous = SettingRepository::new(&txn).get(key).await?;
        let setting = SettingRepository::new(&txn)
            .upsert(key, &value, actor.id)
            .await?;

        AuditLogRepository::new(&txn)
            .create(RecordAuditParam {
                actor_id: Some(actor.id),
                action: action::SETTING_UPDATED,
                target_type: "setting",
                target_id: None,
                details: json!({
                    "key": key.as_str(),
                    "from": previous.value.to_json(),
                    "to": value.to_json(),
                }),
            })
            .await?;

        txn.commit().await?;

        tracing::info!("User {} set {} to {}", actor.id, key, value.to_stored());

        Ok(setting)
    }
}

/// Reads an integer setting, falling back to the key's default.
pub async fn int_setting<C: ConnectionTrait>(db: &C, key: SettingKey) -> Result<i64, AppError> {
    let setting = SettingRepository::new(db).get(key).await?;

    Ok(setting
        .value
        .as_int()
        .or_else(|| key.default_value().as_int())
        .unwrap_or(0))
}

/// Reads a boolean setting, falling back to the key's default.
pub async fn bool_setting<C: ConnectionTrait>(db: &C, key: SettingKey) -> Result<bool, AppError> {
    let setting = SettingRepository::new(db).get(key).await?;

    Ok(setting
        .value
        .as_bool()
        .or_else(|| key.default_value().as_bool())
        .unwrap_or(false))
}
