use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{sea_query::TableCreateStatement, ConnectionTrait, Database, DatabaseConnection};
use time::Duration;
use tower_sessions::{Expiry, Session};
use tower_sessions_sqlx_store::SqliteStore;

use crate::error::TestError;

/// In-memory hub database plus an optional session, scoped to a single test.
///
/// SQLite's `:memory:` database lives only as long as its connection, so every
/// table, the session store and the rows a test inserts share the one connection
/// held here.
#[derive(Default)]
pub struct TestContext {
    pub db: Option<DatabaseConnection>,
    pub session: Option<Session>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connects to a fresh in-memory database and creates the given tables in order.
    pub async fn with_schema(stmts: Vec<TableCreateStatement>) -> Result<Self, TestError> {
        let mut context = Self::new();
        context.with_tables(stmts).await?;
        Ok(context)
    }

    /// Connects to a fresh in-memory database and runs every migration, indexes included.
    pub async fn migrated() -> Result<Self, TestError> {
        let mut context = Self::new();
        Migrator::up(context.database().await?, None).await?;
        Ok(context)
    }

    /// Connection for tests that built the context through `TestBuilder`.
    ///
    /// # Panics
    /// When no table was ever created, which means no connection was opened.
    pub fn db(&self) -> &DatabaseConnection {
        self.db
            .as_ref()
            .expect("test context has no database; build it with TestBuilder")
    }

    /// Opens the in-memory connection on first use and hands back the same one afterwards.
    pub async fn database(&mut self) -> Result<&DatabaseConnection, TestError> {
        if self.db.is_none() {
            self.db = Some(Database::connect("sqlite::memory:").await?);
        }

        Ok(self.db())
    }

    pub async fn with_tables(&mut self, stmts: Vec<TableCreateStatement>) -> Result<(), TestError> {
        let db = self.database().await?;
        for stmt in &stmts {
            db.execute(stmt).await?;
        }

        Ok(())
    }

    /// Session stored in the test database, mirroring the server's seven day inactivity expiry.
    ///
    /// The session table is migrated the first time this is called.
    ///
    /// ```rust,ignore
    /// let session = test.session().await?;
    /// session.insert("auth:user", user.id).await?;
    /// ```
    pub async fn session(&mut self) -> Result<&Session, TestError> {
        if self.session.is_none() {
            let store = session_store(self.database().await?).await?;
            self.session = Some(Session::new(
                None,
                Arc::new(store),
                Some(Expiry::OnInactivity(Duration::days(7))),
            ));
        }

        Ok(self
            .session
            .as_ref()
            .expect("session was initialized above"))
    }

    /// Database and session together, for auth guard tests that need both borrows at once.
    pub async fn db_and_session(&mut self) -> Result<(&DatabaseConnection, &Session), TestError> {
        self.session().await?;

        match (&self.db, &self.session) {
            (Some(db), Some(session)) => Ok((db, session)),
            _ => unreachable!("session() opens the database before creating the session"),
        }
    }
}

async fn session_store(db: &DatabaseConnection) -> Result<SqliteStore, TestError> {
    let store = SqliteStore::new(db.get_sqlite_connection_pool().clone());
    store
        .migrate()
        .await
        .map_err(|e| sea_orm::DbErr::Custom(format!("session table migration failed: {e}")))?;

    Ok(store)
}
