//! Listing features such as amenities, with the quick filters shown on search pages.

/// Feature model.
pub mod model;

/// Feature query manager.
pub mod query_manager;

pub const FEATURES: &str = "features";
