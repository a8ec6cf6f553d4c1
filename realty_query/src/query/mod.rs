/// Query error types.
pub mod error;
/// List query normalization.
pub mod list;
/// Paginated reads with counts, search and population.
pub mod paginate;
/// Page windows and result metadata.
pub mod pagination;
/// Reference population across collections.
pub mod population;
/// Field projections.
pub mod projection;
/// Free-text search predicates.
pub mod search;
/// Query utility functions.
pub mod utility;
