//! Listing searches saved by users, optionally with notifications on new matches.

/// Saved filter model.
pub mod model;

/// Saved filter query manager.
pub mod query_manager;

pub const SAVED_FILTERS: &str = "savedfilters";
