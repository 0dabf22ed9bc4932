use sea_orm_migration::{prelude::*, schema::*};

use super::{m20260105_000001_create_user_table::User, m20260105_000002_create_hub_table::Hub};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HubMember::Table)
                    .if_not_exists()
                    .col(pk_auto(HubMember::Id))
                    .col(integer(HubMember::HubId))
                    .col(integer(HubMember::UserId))
                    .col(string(HubMember::Role))
                    .col(
                        timestamp_with_time_zone(HubMember::JoinedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hub_member_hub_id")
                            .from(HubMember::Table, HubMember::HubId)
                            .to(Hub::Table, Hub::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hub_member_user_id")
                            .from(HubMember::Table, HubMember::UserId)
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
                    .name("idx_hub_member_hub_user")
                    .table(HubMember::Table)
                    .col(HubMember::HubId)
                    .col(HubMember::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HubMember::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum HubMember {
    Table,
    Id,
    HubId,
    UserId,
    Role,
    JoinedAt,
}
