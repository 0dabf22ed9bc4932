//! Database repository layer for all domain entities.
//!
//! Each repository wraps a borrowed connection and handles the queries for one table.
//! Repositories are generic over `ConnectionTrait` so services can run several of them
//! inside a single transaction. Soft-deleted rows are filtered out unless a method says
//! otherwise, and SeaORM entity models are converted into domain models before they leave
//! this layer.

pub mod audit_log;
pub mod event;
pub mod event_registration;
pub mod hub;
pub mod hub_member;
pub mod join_request;
pub mod notification;
pub mod programme;
pub mod programme_member;
pub mod project;
pub mod project_member;
pub mod setting;
pub mod user;

#[cfg(test)]
mod test;
