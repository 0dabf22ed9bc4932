use sea_orm_migration::{prelude::*, schema::*};

use super::m20260105_000001_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JoinRequest::Table)
                    .if_not_exists()
                    .col(pk_auto(JoinRequest::Id))
                    .col(string(JoinRequest::TargetType))
                    .col(integer(JoinRequest::TargetId))
                    .col(integer(JoinRequest::UserId))
                    .col(text_null(JoinRequest::Message))
                    .col(string(JoinRequest::Status).default("pending"))
                    .col(integer_null(JoinRequest::ReviewedBy))
                    .col(text_null(JoinRequest::ReviewNote))
                    .col(
                        timestamp_with_time_zone(JoinRequest::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(JoinRequest::ReviewedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_join_request_user_id")
                            .from(JoinRequest::Table, JoinRequest::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_join_request_target_status")
                    .table(JoinRequest::Table)
                    .col(JoinRequest::TargetType)
                    .col(JoinRequest::TargetId)
                    .col(JoinRequest::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JoinRequest::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum JoinRequest {
    Table,
    Id,
    TargetType,
    TargetId,
    UserId,
    Message,
    Status,
    ReviewedBy,
    ReviewNote,
    CreatedAt,
    ReviewedAt,
}
