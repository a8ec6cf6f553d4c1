//! Hotels marked as favorite by users.

/// Favorite model.
pub mod model;

/// Favorite query manager.
pub mod query_manager;

pub const FAVORITES: &str = "favorites";
