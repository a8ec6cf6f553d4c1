use http::StatusCode;
use thiserror::Error;

use crate::ordering::error::OrderingError;

/// List query validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Requested page size is above the configured maximum.
    #[error("Limit can't be higher than {max}")]
    LimitTooHigh {
        /// Requested limit.
        limit: i64,
        /// Configured maximum.
        max: u32,
    },
    /// Page size is negative.
    #[error("Limit must not be negative, got {0}")]
    InvalidLimit(i64),
    /// Page number is negative.
    #[error("Page must not be negative, got {0}")]
    InvalidPage(i64),
    /// Sort direction is not one of `asc`, `desc`, `1`, `-1`.
    #[error("Sortings can only be asc or desc, got `{0}`")]
    InvalidSortDirection(String),
    /// Same sort field given more than once.
    #[error("Sort field `{0}` given more than once")]
    DuplicateSortField(String),
    /// Projection mixes included and excluded fields.
    #[error("Projection `{0}` mixes included and excluded fields")]
    InvalidProjection(String),
}

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

impl QueryError {
    /// Gets the name of the field that caused the error.
    pub const fn get_violating_field_name(&self) -> &'static str {
        match self {
            Self::LimitTooHigh { .. } | Self::InvalidLimit(_) => "limit",
            Self::InvalidPage(_) => "page",
            Self::InvalidSortDirection(_) | Self::DuplicateSortField(_) => "sort",
            Self::InvalidProjection(_) => "select",
        }
    }

    /// Stable machine-readable error code.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::LimitTooHigh { .. } => "LIMIT_TOO_HIGH",
            Self::InvalidLimit(_) => "LIMIT_NOT_VALID",
            Self::InvalidPage(_) => "PAGE_NOT_VALID",
            Self::InvalidSortDirection(_) => "SORTING_NOT_VALID",
            Self::DuplicateSortField(_) => "SORTING_DUPLICATE_FIELD",
            Self::InvalidProjection(_) => "SELECT_NOT_VALID",
        }
    }

    pub const fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

impl From<OrderingError> for QueryError {
    fn from(err: OrderingError) -> Self {
        match err {
            OrderingError::InvalidDirection(direction) => Self::InvalidSortDirection(direction),
            OrderingError::DuplicateField(name) => Self::DuplicateSortField(name),
        }
    }
}
