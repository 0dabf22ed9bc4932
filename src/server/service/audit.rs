//! Audit trail queries.
//!
//! Entries are written by each workflow through `AuditLogRepository` on its own
//! transaction, so an entry commits together with the change it records.

use sea_orm::DatabaseConnection;

use crate::server::{
    data::audit_log::AuditLogRepository,
    error::AppError,
    model::{
        audit::{AuditEntry, AuditFilter},
        pagination::{PageParam, Paginated},
    },
};

pub struct AuditService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AuditService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        filter: &AuditFilter,
        page: PageParam,
    ) -> Result<Paginated<AuditEntry>, AppError> {
        AuditLogRepository::new(self.db)
            .get_paginated(filter, page)
            .await
    }
}
