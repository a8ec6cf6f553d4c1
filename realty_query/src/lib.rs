//! # Realty query
//!
//! Listing queries over a document store.
//!
//! Raw list parameters are normalized into a [`ListQuery`](query::list::ListQuery),
//! free-text search is turned into a [`Filter`](filter::Filter), and the
//! [`Paginator`](query::paginate::Paginator) runs the counted, sorted and windowed
//! read against a [`DocumentStore`](store::DocumentStore).

pub mod error;
pub mod filter;
pub mod ordering;
pub mod query;
pub mod store;
pub mod value;

#[cfg(feature = "testing")]
pub mod testing;
