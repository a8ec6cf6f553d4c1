//! User accounts.

/// User model.
pub mod model;

/// User query manager.
pub mod query_manager;

pub const USERS: &str = "users";
