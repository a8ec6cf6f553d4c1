//! # Realty service
//!
//! Listing reads of a real-estate backend over a document store.
//!
//! - Configuration, tracing setup and error mapping
//! - Query managers per entity: hotels with the public hotel filter,
//!   features, distance types, users, saved filters, hotel messages and
//!   favorites

pub mod config;
pub mod context;
pub mod distance_type;
pub mod error;
pub mod favorite;
pub mod feature;
pub mod hotel;
pub mod hotel_message;
pub mod model;
pub mod saved_filter;
pub mod tracing;
pub mod user;
