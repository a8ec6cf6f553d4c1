//! Distance types, e.g. the distance of a listing to the nearest school.

/// Distance type model.
pub mod model;

/// Distance type query manager.
pub mod query_manager;

pub const DISTANCE_TYPES: &str = "distancetypes";
