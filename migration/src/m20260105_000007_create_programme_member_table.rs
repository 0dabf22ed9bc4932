use sea_orm_migration::{prelude::*, schema::*};

use super::{m20260105_000001_create_user_table::User, m20260105_000006_create_programme_table::Programme};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProgrammeMember::Table)
                    .if_not_exists()
                    .col(pk_auto(ProgrammeMember::Id))
                    .col(integer(ProgrammeMember::ProgrammeId))
                    .col(integer(ProgrammeMember::UserId))
                    .col(
                        timestamp_with_time_zone(ProgrammeMember::JoinedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_programme_member_programme_id")
                            .from(ProgrammeMember::Table, ProgrammeMember::ProgrammeId)
                            .to(Programme::Table, Programme::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_programme_member_user_id")
                            .from(ProgrammeMember::Table, ProgrammeMember::UserId)
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
                    .name("idx_programme_member_programme_user")
                    .table(ProgrammeMember::Table)
                    .col(ProgrammeMember::ProgrammeId)
                    .col(ProgrammeMember::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProgrammeMember::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ProgrammeMember {
    Table,
    Id,
    ProgrammeId,
    UserId,
    JoinedAt,
}
