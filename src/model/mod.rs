//! API data transfer objects.
//!
//! Request and response bodies exchanged over the JSON API. Every type derives
//! `ToSchema` so it appears in the generated OpenAPI document.

pub mod admin;
pub mod api;
pub mod auth;
pub mod event;
pub mod hub;
pub mod join_request;
pub mod notification;
pub mod programme;
pub mod project;
pub mod recommendation;
pub mod user;
