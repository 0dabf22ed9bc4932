use crate::server::{
    data::user::UserRepository,
    model::{
        pagination::{PageParam, MAX_PAGE},
        user::{CreateUserParam, UpdateProfileParam, UserFilter},
    },
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod admin_exists;
mod create;
mod get_paginated;
mod set_deleted_at;
mod update_profile;
