//! User data repository for database operations.
//!
//! This module provides the `UserRepository` for managing user records in the database.
//! It handles account creation, profile updates, admin status and soft deletion, with
//! conversion between entity models and domain models at the infrastructure boundary.

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait,
    DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::{
    model::{
        pagination::{PageParam, Paginated},
        user::{CreateUserParam, UpdateProfileParam, User, UserFilter},
    },
    util::parse::join_interests,
};

/// Repository providing database operations for user management.
///
/// Generic over the connection so it can run inside a transaction.
pub struct UserRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection or transaction
    ///
    /// # Returns
    /// - `UserRepository` - New repository instance
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts a new non-admin user with no profile data.
    ///
    /// # Returns
    /// - `Ok(User)` - The created user
    /// - `Err(DbErr)` - Database error, including a unique violation on email
    pub async fn create(&self, param: CreateUserParam) -> Result<User, DbErr> {
        let entity = entity::user::ActiveModel {
            email: ActiveValue::Set(param.email),
            name: ActiveValue::Set(param.name),
            password_hash: ActiveValue::Set(param.password_hash),
            admin: ActiveValue::Set(false),
            department: ActiveValue::Set(None),
            interests: ActiveValue::Set(String::new()),
            created_at: ActiveValue::Set(Utc::now()),
            deleted_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(User::from_entity(entity))
    }

    /// Finds a user by ID, including deactivated accounts.
    ///
    /// Callers that must reject deactivated users check `User::is_active`.
    ///
    /// # Returns
    /// - `Ok(Some(User))` - User found
    /// - `Ok(None)` - No user with that ID
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_by_id(&self, user_id: i32) -> Result<Option<User>, DbErr> {
        let entity = entity::prelude::User::find_by_id(user_id)
            .one(self.db)
            .await?;

        Ok(entity.map(User::from_entity))
    }

    /// Finds a user by email, including deactivated accounts.
    ///
    /// # Arguments
    /// - `email` - Lowercased email address
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbErr> {
        let entity = entity::prelude::User::find()
            .filter(entity::user::Column::Email.eq(email))
            .one(self.db)
            .await?;

        Ok(entity.map(User::from_entity))
    }

    /// Finds a user and their password hash by email for login.
    ///
    /// # Returns
    /// - `Ok(Some((User, hash)))` - Account found
    /// - `Ok(None)` - No account with that email
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, DbErr> {
        let entity = entity::prelude::User::find()
            .filter(entity::user::Column::Email.eq(email))
            .one(self.db)
            .await?;

        Ok(entity.map(|e| {
            let hash = e.password_hash.clone();
            (User::from_entity(e), hash)
        }))
    }

    /// Finds several active users by ID.
    pub async fn find_active_by_ids(&self, user_ids: &[i32]) -> Result<Vec<User>, DbErr> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let entities = entity::prelude::User::find()
            .filter(entity::user::Column::Id.is_in(user_ids.iter().copied()))
            .filter(entity::user::Column::DeletedAt.is_null())
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(User::from_entity).collect())
    }

    /// Applies profile changes and returns the updated user.
    ///
    /// # Returns
    /// - `Ok(Some(User))` - Updated user
    /// - `Ok(None)` - No user with that ID
    /// - `Err(DbErr)` - Database error during update
    pub async fn update_profile(
        &self,
        user_id: i32,
        param: UpdateProfileParam,
    ) -> Result<Option<User>, DbErr> {
        let Some(user) = entity::prelude::User::find_by_id(user_id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model: entity::user::ActiveModel = user.into();

        if let Some(name) = param.name {
            active_model.name = ActiveValue::Set(name);
        }
        if let Some(department) = param.department {
            active_model.department = ActiveValue::Set(department);
        }
        if let Some(interests) = param.interests {
            active_model.interests = ActiveValue::Set(join_interests(&interests));
        }

        let updated = active_model.update(self.db).await?;

        Ok(Some(User::from_entity(updated)))
    }

    /// Checks if any active admin users exist in the database.
    ///
    /// # Returns
    /// - `Ok(true)` - At least one admin user exists
    /// - `Ok(false)` - No admin users exist (first-time setup scenario)
    /// - `Err(DbErr)` - Database error during count query
    pub async fn admin_exists(&self) -> Result<bool, DbErr> {
        let admin_count = entity::prelude::User::find()
            .filter(entity::user::Column::Admin.eq(true))
            .filter(entity::user::Column::DeletedAt.is_null())
            .count(self.db)
            .await?;

        Ok(admin_count > 0)
    }

    /// Sets admin status for a user.
    ///
    /// # Returns
    /// - `Ok(true)` - A user row was updated
    /// - `Ok(false)` - No user with that ID
    /// - `Err(DbErr)` - Database error during update operation
    pub async fn set_admin(&self, user_id: i32, is_admin: bool) -> Result<bool, DbErr> {
        let result = entity::prelude::User::update_many()
            .filter(entity::user::Column::Id.eq(user_id))
            .col_expr(entity::user::Column::Admin, Expr::value(is_admin))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Sets or clears the deactivation timestamp.
    ///
    /// # Arguments
    /// - `user_id` - User to update
    /// - `deleted_at` - `Some(now)` to deactivate, `None` to restore
    ///
    /// # Returns
    /// - `Ok(true)` - A user row was updated
    /// - `Ok(false)` - No user with that ID
    pub async fn set_deleted_at(
        &self,
        user_id: i32,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::User::update_many()
            .filter(entity::user::Column::Id.eq(user_id))
            .col_expr(entity::user::Column::DeletedAt, Expr::value(deleted_at))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Gets users with pagination, ordered by name.
    ///
    /// # Arguments
    /// - `filter` - Optional name/email search and whether to include deactivated accounts
    /// - `page` - Page parameters
    ///
    /// # Returns
    /// - `Ok(Paginated<User>)` - Users for the requested page
    /// - `Err(DbErr)` - Database error during pagination query
    pub async fn get_paginated(
        &self,
        filter: &UserFilter,
        page: PageParam,
    ) -> Result<Paginated<User>, DbErr> {
        let mut query = entity::prelude::User::find();

        if !filter.include_deleted {
            query = query.filter(entity::user::Column::DeletedAt.is_null());
        }
        if let Some(search) = &filter.search {
            query = query.filter(
                Condition::any()
                    .add(entity::user::Column::Name.contains(search))
                    .add(entity::user::Column::Email.contains(search)),
            );
        }

        let paginator = query
            .order_by_asc(entity::user::Column::Name)
            .order_by_asc(entity::user::Column::Id)
            .paginate(self.db, page.per_page);

        let total = paginator.num_items().await?;
        let entities = paginator.fetch_page(page.page).await?;
        let users = entities.into_iter().map(User::from_entity).collect();

        Ok(Paginated::new(users, total, page))
    }

    /// Counts active users, optionally only those created at or after `since`.
    pub async fn count_active(&self, since: Option<DateTime<Utc>>) -> Result<u64, DbErr> {
        let mut query =
            entity::prelude::User::find().filter(entity::user::Column::DeletedAt.is_null());

        if let Some(since) = since {
            query = query.filter(entity::user::Column::CreatedAt.gte(since));
        }

        query.count(self.db).await
    }
}
