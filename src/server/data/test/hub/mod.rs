use crate::server::{
    data::{
        event::EventRepository, hub::HubRepository, hub_member::HubMemberRepository,
        programme::ProgrammeRepository, project::ProjectRepository,
    },
    error::AppError,
    model::{
        hub::{CreateHubParam, HubFilter, HubRole, UpdateHubParam},
        pagination::PageParam,
    },
};
use chrono::{Duration, Utc};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod create;
mod get_paginated;
mod name_taken;
mod soft_delete;
