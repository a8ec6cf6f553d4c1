use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;

use crate::{
    filter::Filter,
    ordering::{Collation, Ordering},
    query::projection::Projection,
};

pub use self::document::Document;
use self::error::StoreResult;

/// Dotted-path access into documents.
pub mod document;
/// Store error types.
pub mod error;
/// In-memory store implementation.
pub mod memory;
/// MongoDB store implementation.
#[cfg(feature = "mongodb")]
pub mod mongodb;

/// Read options for [`DocumentStore::find`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub ordering: Ordering,
    /// String comparison rules for sorting. Code point order if `None`.
    pub collation: Option<Collation>,
    pub skip: u64,
    pub limit: Option<u64>,
    pub projection: Option<Projection>,
}

/// Collection-oriented document storage.
///
/// Documents are JSON objects with an `_id` field. Filters, orderings and
/// projections are passed through as built; implementations either evaluate
/// them directly or render them into their native query language.
#[async_trait]
pub trait DocumentStore: Debug {
    /// Counts documents matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the filter cannot be evaluated or the backend fails.
    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    /// Finds documents matching `filter`, sorted, windowed and projected per `options`.
    ///
    /// Without an explicit ordering, proximity filters return the nearest
    /// documents first and other filters return documents in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the filter cannot be evaluated or the backend fails.
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>>;

    /// Inserts documents, assigning an `_id` to those without one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    ///
    /// # Returns
    ///
    /// Returns the ids of the inserted documents, in order.
    async fn insert_many(&self, collection: &str, documents: Vec<Document>)
    -> StoreResult<Vec<String>>;
}

/// Thread-safe shared reference to a document store.
pub type DocumentStoreArc = Arc<dyn DocumentStore + Send + Sync>;
