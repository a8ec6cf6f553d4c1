//! Messages sent to listing managers about a hotel.

/// Hotel message model.
pub mod model;

/// Hotel message query manager.
pub mod query_manager;

pub const HOTEL_MESSAGES: &str = "hotelmessages";
