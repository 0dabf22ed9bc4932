//! Request-scoped session access and authorization guards.

pub mod auth;
pub mod session;

#[cfg(test)]
mod test;
