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
                    .table(Programme::Table)
                    .if_not_exists()
                    .col(pk_auto(Programme::Id))
                    .col(integer(Programme::HubId))
                    .col(integer(Programme::CreatedBy))
                    .col(string(Programme::Name))
                    .col(text(Programme::Description))
                    .col(integer_null(Programme::Capacity))
                    .col(boolean(Programme::RequiresApproval).default(false))
                    .col(timestamp_with_time_zone_null(Programme::StartsAt))
                    .col(timestamp_with_time_zone_null(Programme::EndsAt))
                    .col(
                        timestamp_with_time_zone(Programme::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Programme::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(Programme::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_programme_hub_id")
                            .from(Programme::Table, Programme::HubId)
                            .to(Hub::Table, Hub::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_programme_created_by")
                            .from(Programme::Table, Programme::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Programme::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Programme {
    Table,
    Id,
    HubId,
    CreatedBy,
    Name,
    Description,
    Capacity,
    RequiresApproval,
    StartsAt,
    EndsAt,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
