//! Join request data repository.

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::{Expr, Query}, ActiveModelTrait, ActiveValue, ColumnTrait, Condition,
    ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::{
    error::AppError,
    model::join_request::{JoinRequest, JoinRequestStatus, JoinTarget},
};

pub struct JoinRequestRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> JoinRequestRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts a pending join request.
    pub async fn create(
        &self,
        target: JoinTarget,
        user_id: i32,
        message: Option<String>,
    ) -> Result<JoinRequest, AppError> {
        let entity = entity::join_request::ActiveModel {
            target_type: ActiveValue::Set(target.kind().to_string()),
            target_id: ActiveValue::Set(target.id()),
            user_id: ActiveValue::Set(user_id),
            message: ActiveValue::Set(message),
            status: ActiveValue::Set(JoinRequestStatus::Pending.to_string()),
            reviewed_by: ActiveValue::Set(None),
            review_note: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now()),
            reviewed_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        JoinRequest::from_entity(entity)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<JoinRequest>, AppError> {
        entity::prelude::JoinRequest::find_by_id(id)
            .one(self.db)
            .await?
            .map(JoinRequest::from_entity)
            .transpose()
    }

    /// Finds the user's pending request for a target, if any.
    pub async fn find_pending(
        &self,
        user_id: i32,
        target: JoinTarget,
    ) -> Result<Option<JoinRequest>, AppError> {
        entity::prelude::JoinRequest::find()
            .filter(entity::join_request::Column::UserId.eq(user_id))
            .filter(entity::join_request::Column::TargetType.eq(target.kind()))
            .filter(entity::join_request::Column::TargetId.eq(target.id()))
            .filter(entity::join_request::Column::Status.eq(JoinRequestStatus::Pending.as_str()))
            .one(self.db)
            .await?
            .map(JoinRequest::from_entity)
            .transpose()
    }

    pub async fn count_pending_for_user(&self, user_id: i32) -> Result<u64, DbErr> {
        entity::prelude::JoinRequest::find()
            .filter(entity::join_request::Column::UserId.eq(user_id))
            .filter(entity::join_request::Column::Status.eq(JoinRequestStatus::Pending.as_str()))
            .count(self.db)
            .await
    }

    /// Gets pending requests for a target, oldest first.
    pub async fn get_pending_for_target(
        &self,
        target: JoinTarget,
    ) -> Result<Vec<JoinRequest>, AppError> {
        entity::prelude::JoinRequest::find()
            .filter(entity::join_request::Column::TargetType.eq(target.kind()))
            .filter(entity::join_request::Column::TargetId.eq(target.id()))
            .filter(entity::join_request::Column::Status.eq(JoinRequestStatus::Pending.as_str()))
            .order_by_asc(entity::join_request::Column::CreatedAt)
            .order_by_asc(entity::join_request::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(JoinRequest::from_entity)
            .collect()
    }

    /// Gets every request a user has made, newest first.
    pub async fn get_for_user(&self, user_id: i32) -> Result<Vec<JoinRequest>, AppError> {
        entity::prelude::JoinRequest::find()
            .filter(entity::join_request::Column::UserId.eq(user_id))
            .order_by_desc(entity::join_request::Column::CreatedAt)
            .order_by_desc(entity::join_request::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(JoinRequest::from_entity)
            .collect()
    }

    /// Moves a pending request to a terminal status.
    ///
    /// The update only applies while the request is still pending, so two
    /// reviewers racing on the same request cannot both succeed.
    ///
    /// # Returns
    /// - `Ok(true)` - Request transitioned
    /// - `Ok(false)` - Request was no longer pending
    pub async fn resolve(
        &self,
        id: i32,
        status: JoinRequestStatus,
        reviewed_by: Option<i32>,
        review_note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::JoinRequest::update_many()
            .filter(entity::join_request::Column::Id.eq(id))
            .filter(entity::join_request::Column::Status.eq(JoinRequestStatus::Pending.as_str()))
            .col_expr(entity::join_request::Column::Status, Expr::value(status.as_str()))
            .col_expr(entity::join_request::Column::ReviewedBy, Expr::value(reviewed_by))
            .col_expr(entity::join_request::Column::ReviewNote, Expr::value(review_note))
            .col_expr(entity::join_request::Column::ReviewedAt, Expr::value(Some(now)))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Cancels pending requests for a hub and for the projects and programmes inside it.
    pub async fn cancel_pending_for_hub(
        &self,
        hub_id: i32,
        now: DateTime<Utc>,
    ) -> Result<u64, DbErr> {
        let projects = Query::select()
            .column(entity::project::Column::Id)
            .from(entity::project::Entity)
            .and_where(entity::project::Column::HubId.eq(hub_id))
            .to_owned();
        let programmes = Query::select()
            .column(entity::programme::Column::Id)
            .from(entity::programme::Entity)
            .and_where(entity::programme::Column::HubId.eq(hub_id))
            .to_owned();

        let target = Condition::any()
            .add(
                Condition::all()
                    .add(entity::join_request::Column::TargetType.eq(JoinTarget::HUB))
                    .add(entity::join_request::Column::TargetId.eq(hub_id)),
            )
            .add(
                Condition::all()
                    .add(entity::join_request::Column::TargetType.eq(JoinTarget::PROJECT))
                    .add(entity::join_request::Column::TargetId.in_subquery(projects)),
            )
            .add(
                Condition::all()
                    .add(entity::join_request::Column::TargetType.eq(JoinTarget::PROGRAMME))
                    .add(entity::join_request::Column::TargetId.in_subquery(programmes)),
            );

        let result = entity::prelude::JoinRequest::update_many()
            .filter(entity::join_request::Column::Status.eq(JoinRequestStatus::Pending.as_str()))
            .filter(target)
            .col_expr(
                entity::join_request::Column::Status,
                Expr::value(JoinRequestStatus::Cancelled.as_str()),
            )
            .col_expr(entity::join_request::Column::ReviewedAt, Expr::value(Some(now)))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn count_pending(&self) -> Result<u64, DbErr> {
        entity::prelude::JoinRequest::find()
            .filter(entity::join_request::Column::Status.eq(JoinRequestStatus::Pending.as_str()))
            .count(self.db)
            .await
    }

    /// Counts pending requests created before `cutoff`.
    pub async fn count_pending_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, DbErr> {
        entity::prelude::JoinRequest::find()
            .filter(entity::join_request::Column::Status.eq(JoinRequestStatus::Pending.as_str()))
            .filter(entity::join_request::Column::CreatedAt.lt(cutoff))
            .count(self.db)
            .await
    }
}
