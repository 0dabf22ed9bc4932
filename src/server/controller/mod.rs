//! HTTP handlers.
//!
//! Controllers authenticate the caller, check permissions through [`AuthGuard`], call a
//! service and convert the returned domain model into a DTO. Every handler carries a
//! `utoipa::path` annotation so it appears in the OpenAPI document.
//!
//! [`AuthGuard`]: crate::server::middleware::auth::AuthGuard

pub mod admin;
pub mod auth;
pub mod event;
pub mod hub;
pub mod join_request;
pub mod notification;
pub mod programme;
pub mod project;
pub mod user;

use serde::Deserialize;
use utoipa::IntoParams;

use crate::server::model::pagination::{PageParam, DEFAULT_PER_PAGE};

/// Page query shared by list endpoints.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Zero-based page number (default: 0)
    #[serde(default)]
    pub page: u64,
    /// Items per page (default: 20, max: 100)
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_per_page() -> u64 {
    DEFAULT_PER_PAGE
}

impl PageQuery {
    pub fn into_param(self) -> PageParam {
        PageParam::new(self.page, self.per_page)
    }
}
