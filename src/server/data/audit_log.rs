//! Audit log repository. Rows are append-only.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};

use crate::server::{
    error::{internal::InternalError, AppError},
    model::{
        audit::{AuditEntry, AuditFilter, RecordAuditParam},
        pagination::{PageParam, Paginated},
    },
};

pub struct AuditLogRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AuditLogRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, param: RecordAuditParam) -> Result<AuditEntry, AppError> {
        let details = serde_json::to_string(&param.details).map_err(InternalError::from)?;

        let entity = entity::audit_log::ActiveModel {
            actor_id: ActiveValue::Set(param.actor_id),
            action: ActiveValue::Set(param.action.to_string()),
            target_type: ActiveValue::Set(param.target_type.to_string()),
            target_id: ActiveValue::Set(param.target_id),
            details: ActiveValue::Set(details),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        AuditEntry::from_entity(entity)
    }

    /// Gets audit entries matching the filter, newest first.
    pub async fn get_paginated(
        &self,
        filter: &AuditFilter,
        page: PageParam,
    ) -> Result<Paginated<AuditEntry>, AppError> {
        let mut query = entity::prelude::AuditLog::find();

        if let Some(action) = &filter.action {
            query = query.filter(entity::audit_log::Column::Action.eq(action.as_str()));
        }
        if let Some(actor_id) = filter.actor_id {
            query = query.filter(entity::audit_log::Column::ActorId.eq(actor_id));
        }
        if let Some(target_type) = &filter.target_type {
            query = query.filter(entity::audit_log::Column::TargetType.eq(target_type.as_str()));
        }

        let paginator = query
            .order_by_desc(entity::audit_log::Column::CreatedAt)
            .order_by_desc(entity::audit_log::Column::Id)
            .paginate(self.db, page.per_page);

        let total = paginator.num_items().await?;
        let entries = paginator
            .fetch_page(page.page)
            .await?
            .into_iter()
            .map(AuditEntry::from_entity)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated::new(entries, total, page))
    }
}
