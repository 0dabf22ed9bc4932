//! HTTP backend for the hub management system.
//!
//! Requests enter through [`router`], where every route is registered on a utoipa
//! `OpenApiRouter` so the OpenAPI document stays in step with the handlers. Each
//! request then moves down through the layers:
//!
//! - `controller` checks the caller's session and hub role with `AuthGuard`, then maps
//!   DTOs to params
//! - `service` owns the rules (capacity limits, join approval, ownership) and runs
//!   multi-step writes inside a transaction, sending notifications once it commits
//! - `data` holds one repository per table and converts entity rows into domain models
//! - `model` holds those domain models and the per-operation params
//!
//! Outside the request path, `startup` wires the database, session store and outbound
//! HTTP client. `scheduler` runs the event reminder sweep, and `util` carries the field
//! validation shared by services.

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod middleware;
pub mod model;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod state;
pub mod util;
