use entity::prelude::*;
use sea_orm::{sea_query::TableCreateStatement, DbBackend, EntityTrait, Schema};

use crate::{context::TestContext, error::TestError};

/// Collects the tables a test needs and creates them in an in-memory database.
///
/// Tables are created in the order they are added, so referenced tables go first.
///
/// ```rust,ignore
/// let test = TestBuilder::new().with_hub_tables().build().await?;
/// let (owner, hub) = factory::helpers::create_hub_with_owner(test.db()).await?;
/// ```
#[derive(Default)]
pub struct TestBuilder {
    tables: Vec<TableCreateStatement>,
    migrate: bool,
}

impl TestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        self.tables
            .push(Schema::new(DbBackend::Sqlite).create_table_from_entity(entity));
        self
    }

    /// Users, hubs, hub memberships and the notifications hub changes produce.
    pub fn with_hub_tables(self) -> Self {
        self.with_table(User)
            .with_table(Hub)
            .with_table(HubMember)
            .with_table(Notification)
    }

    /// The whole schema as the migrations create it, including the unique
    /// `(group, user)` indexes on membership and registration tables.
    ///
    /// Use for workflows that touch projects, programmes, events, join requests,
    /// the audit log or settings. Tables added with `with_table` are not combined
    /// with this.
    pub fn with_all_tables(mut self) -> Self {
        self.migrate = true;
        self.tables.clear();
        self
    }

    pub async fn build(self) -> Result<TestContext, TestError> {
        if self.migrate {
            TestContext::migrated().await
        } else {
            TestContext::with_schema(self.tables).await
        }
    }
}
