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
                    .table(Hub::Table)
                    .if_not_exists()
                    .col(pk_auto(Hub::Id))
                    .col(string(Hub::Name))
                    .col(text(Hub::Description))
                    .col(string(Hub::Category))
                    .col(integer(Hub::OwnerId))
                    .col(boolean(Hub::IsPrivate).default(false))
                    .col(integer_null(Hub::MaxMembers))
                    .col(
                        timestamp_with_time_zone(Hub::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Hub::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(Hub::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hub_owner_id")
                            .from(Hub::Table, Hub::OwnerId)
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
                    .name("idx_hub_category")
                    .table(Hub::Table)
                    .col(Hub::Category)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Hub::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Hub {
    Table,
    Id,
    Name,
    Description,
    Category,
    OwnerId,
    IsPrivate,
    MaxMembers,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
