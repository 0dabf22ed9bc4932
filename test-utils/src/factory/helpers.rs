//! Values and composite fixtures shared by the factories.

use std::sync::atomic::{AtomicU64, Ordering};

use sea_orm::{DatabaseConnection, DbErr};

use crate::factory::{hub::create_hub, user::create_user};

static SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Monotonic suffix keeping emails, hub names and titles unique within a test run.
pub fn next_id() -> u64 {
    SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

/// A fresh user owning a public hub, owner membership included.
pub async fn create_hub_with_owner(
    db: &DatabaseConnection,
) -> Result<(entity::user::Model, entity::hub::Model), DbErr> {
    let owner = create_user(db).await?;
    let hub = create_hub(db, owner.id).await?;
    Ok((owner, hub))
}
