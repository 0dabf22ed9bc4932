//! Test support for the unihub server.
//!
//! [`builder::TestBuilder`] creates an in-memory SQLite database holding the hub schema,
//! [`context::TestContext`] owns that connection along with an optional session, and
//! [`factory`] inserts users, hubs, projects, programmes, events and join requests with
//! defaults a test can override.
//!
//! ```rust,ignore
//! #[tokio::test]
//! async fn member_sees_hub() -> Result<(), AppError> {
//!     let test = TestBuilder::new().with_all_tables().build().await.unwrap();
//!     let (owner, hub) = factory::helpers::create_hub_with_owner(test.db()).await?;
//!     // ...
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
