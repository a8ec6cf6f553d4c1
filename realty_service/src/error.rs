use http::StatusCode;
use realty_query::{
    error::{ErrorBody, RequestError},
    filter::error::FilterError,
    query::error::QueryError,
    store::error::StoreError,
};
use thiserror::Error;
use tracing::error;

/// Application error types.
///
/// Represents all possible errors that can occur in the realty service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Internal application error.
    ///
    /// Represents unexpected internal errors that occur during service operation.
    #[error("internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),

    /// Request processing error.
    ///
    /// Represents errors that occur during request validation and processing.
    #[error("request error: {0}")]
    Request(#[from] RequestError),

    /// Requested entity does not exist.
    #[error("{entity} `{key}` not found")]
    NotFound { entity: &'static str, key: String },

    /// Caller-supplied argument could not be decoded.
    #[error("invalid `{argument}`: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },
}

/// Application result type.
///
/// Type alias for Result with `AppError` as the error type.
/// Used throughout the application for consistent error handling.
pub type AppResult<T> = Result<T, AppError>;

macro_rules! impl_internal_errors {
    ( $( $type:ty ),* $(,)? ) => {
        $(
        impl From<$type> for AppError {
            fn from(err: $type) -> Self {
                AppError::Internal(Box::new(err))
            }
        }
        )*
    };
}
impl_internal_errors!(config::ConfigError, std::io::Error);

macro_rules! impl_request_errors {
    ( $( $type:ty ),* $(,)? ) => {
        $(
        impl From<$type> for AppError {
            fn from(err: $type) -> Self {
                RequestError::from(err).into()
            }
        }
        )*
    };
}
impl_request_errors!(QueryError, FilterError, StoreError, serde_json::Error);

impl AppError {
    pub fn not_found<K: ToString>(entity: &'static str, key: K) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn invalid_argument<E: ToString>(argument: &'static str, err: E) -> Self {
        Self::InvalidArgument {
            argument,
            reason: err.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Request(err) => err.status(),
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AppError> for ErrorBody {
    /// Converts application errors to client responses.
    ///
    /// Internal errors are logged and reported without details.
    fn from(err: AppError) -> Self {
        match &err {
            AppError::Request(request) => {
                if request.status().is_server_error() {
                    error!("internal service error: {}", err);
                }
                request.body()
            }
            AppError::NotFound { entity, .. } => ErrorBody {
                error_code: format!("{}_NOT_FOUND", entity.to_uppercase()),
                message: err.to_string(),
                status_code: StatusCode::NOT_FOUND.as_u16(),
                field: None,
            },
            AppError::InvalidArgument { argument, .. } => ErrorBody {
                error_code: "ARGUMENT_NOT_VALID".into(),
                message: err.to_string(),
                status_code: StatusCode::BAD_REQUEST.as_u16(),
                field: Some((*argument).into()),
            },
            AppError::Internal(_) => {
                error!("internal service error: {}", err);
                ErrorBody {
                    error_code: "INTERNAL_ERROR".into(),
                    message: StatusCode::INTERNAL_SERVER_ERROR
                        .canonical_reason()
                        .unwrap_or("Internal Server Error")
                        .into(),
                    status_code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                    field: None,
                }
            }
        }
    }
}
