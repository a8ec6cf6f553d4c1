//! Hotel listings.
//!
//! Provides listing reads for hotels:
//! - Hotel model as stored in the `hotels` collection
//! - Filter criteria accepted by the public listing search
//! - Filter pipeline turning criteria into a store filter
//! - Query manager for admin, manager and public listing reads

/// Listing filter criteria.
pub mod criteria;

/// Criteria to filter composition.
pub mod filter;

/// Hotel model.
pub mod model;

/// Hotel query manager for data retrieval.
pub mod query_manager;

pub const HOTELS: &str = "hotels";

/// Reference fields stored as object ids.
pub const OBJECT_ID_FIELDS: [&str; 3] = ["featureIds", "managerId", "distances.typeId"];
