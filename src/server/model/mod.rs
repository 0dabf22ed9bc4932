//! Domain models the services work with.
//!
//! Repositories build these from entity rows, so text columns such as roles, statuses
//! and interest lists arrive here already parsed into enums and vectors. Controllers
//! turn them into DTOs. The `*Param` structs carry the input of each write.

pub mod audit;
pub mod event;
pub mod hub;
pub mod insight;
pub mod join_request;
pub mod notification;
pub mod pagination;
pub mod programme;
pub mod project;
pub mod recommendation;
pub mod setting;
pub mod user;
