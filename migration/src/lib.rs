pub use sea_orm_migration::prelude::*;

mod m20260105_000001_create_user_table;
mod m20260105_000002_create_hub_table;
mod m20260105_000003_create_hub_member_table;
mod m20260105_000004_create_project_table;
mod m20260105_000005_create_project_member_table;
mod m20260105_000006_create_programme_table;
mod m20260105_000007_create_programme_member_table;
mod m20260105_000008_create_event_table;
mod m20260105_000009_create_event_registration_table;
mod m20260105_000010_create_join_request_table;
mod m20260105_000011_create_notification_table;
mod m20260105_000012_create_audit_log_table;
mod m20260105_000013_create_setting_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260105_000001_create_user_table::Migration),
            Box::new(m20260105_000002_create_hub_table::Migration),
            Box::new(m20260105_000003_create_hub_member_table::Migration),
            Box::new(m20260105_000004_create_project_table::Migration),
            Box::new(m20260105_000005_create_project_member_table::Migration),
            Box::new(m20260105_000006_create_programme_table::Migration),
            Box::new(m20260105_000007_create_programme_member_table::Migration),
            Box::new(m20260105_000008_create_event_table::Migration),
            Box::new(m20260105_000009_create_event_registration_table::Migration),
            Box::new(m20260105_000010_create_join_request_table::Migration),
            Box::new(m20260105_000011_create_notification_table::Migration),
            Box::new(m20260105_000012_create_audit_log_table::Migration),
            Box::new(m20260105_000013_create_setting_table::Migration),
        ]
    }
}
