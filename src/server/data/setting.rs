//! Platform setting repository.

use chrono::Utc;
use sea_orm::{
    sea_query::OnConflict, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter,
};

use crate::server::model::setting::{Setting, SettingKey, SettingValue};

pub struct SettingRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SettingRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Gets a setting, falling back to its default when no row is stored.
    pub async fn get(&self, key: SettingKey) -> Result<Setting, DbErr> {
        let stored = entity::prelude::Setting::find()
            .filter(entity::setting::Column::Key.eq(key.as_str()))
            .one(self.db)
            .await?;

        Ok(Setting::resolve(key, stored))
    }

    /// Gets every known setting in declaration order.
    pub async fn get_all(&self) -> Result<Vec<Setting>, DbErr> {
        let stored = entity::prelude::Setting::find().all(self.db).await?;

        Ok(SettingKey::ALL
            .into_iter()
            .map(|key| {
                let row = stored.iter().find(|row| row.key == key.as_str()).cloned();
                Setting::resolve(key, row)
            })
            .collect())
    }

    pub async fn upsert(
        &self,
        key: SettingKey,
        value: &SettingValue,
        updated_by: i32,
    ) -> Result<Setting, DbErr> {
        let row = entity::setting::ActiveModel {
            key: ActiveValue::Set(key.as_str().to_string()),
            value: ActiveValue::Set(value.to_stored()),
            updated_by: ActiveValue::Set(Some(updated_by)),
            updated_at: ActiveValue::Set(Utc::now()),
        };

        entity::prelude::Setting::insert(row)
            .on_conflict(
                OnConflict::column(entity::setting::Column::Key)
                    .update_columns([
                        entity::setting::Column::Value,
                        entity::setting::Column::UpdatedBy,
                        entity::setting::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(self.db)
            .await?;

        self.get(key).await
    }
}
