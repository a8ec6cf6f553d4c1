use std::error::Error;

use thiserror::Error;

use crate::filter::error::FilterError;

/// Document store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filter could not be evaluated.
    #[error("filter error: {0}")]
    Filter(#[from] FilterError),
    /// Stored or inserted document has an unexpected shape.
    #[error("invalid document in `{collection}`: {reason}")]
    InvalidDocument {
        /// Collection name.
        collection: String,
        /// What is wrong with the document.
        reason: String,
    },
    /// Failure reported by the storage backend.
    #[error("store backend error: {0}")]
    Backend(Box<dyn Error + Send + Sync>),
}

/// Result type for document store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(feature = "mongodb")]
impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Backend(Box::new(err))
    }
}
