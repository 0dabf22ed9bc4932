//! Row factories with defaults suitable for most tests.
//!
//! The `create_*` functions insert a row with defaults. The `*Factory` builders allow
//! overriding individual columns first:
//!
//! ```rust,ignore
//! let hub = factory::hub::HubFactory::new(&db, owner.id)
//!     .private(true)
//!     .max_members(Some(10))
//!     .build()
//!     .await?;
//! ```
//!
//! Hub and project factories also insert the owner's membership row, matching what the
//! services do on creation.

pub mod event;
pub mod helpers;
pub mod hub;
pub mod join_request;
pub mod programme;
pub mod project;
pub mod user;

pub use event::create_event;
pub use hub::{add_hub_member, create_hub};
pub use programme::create_programme;
pub use project::create_project;
pub use user::create_user;
