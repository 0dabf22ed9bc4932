//! Service layer for business logic and orchestration.
//!
//! Services sit between the controllers and the repositories. They validate request
//! DTOs into parameters, enforce business rules, open transactions around multi-step
//! writes and send notifications once those writes are committed. Authorization is
//! checked by the controllers before a service is called.

pub mod admin;
pub mod audit;
pub mod auth;
pub mod event;
pub mod hub;
pub mod insight;
pub mod join_request;
pub mod notification;
pub mod programme;
pub mod project;
pub mod recommendation;
pub mod setting;
pub mod user;

#[cfg(test)]
mod test;
