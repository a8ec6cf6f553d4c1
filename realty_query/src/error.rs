use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{filter::error::FilterError, query::error::QueryError, store::error::StoreError};

#[derive(Error, Debug)]
pub enum RequestError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type RequestResult<T> = Result<T, RequestError>;

/// Error payload returned to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error_code: String,
    pub message: String,
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl RequestError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Query(err) => err.status(),
            // Invalid search patterns come from the request.
            Self::Filter(_) | Self::Store(StoreError::Filter(_)) => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Query(err) => err.error_code(),
            Self::Filter(_) | Self::Store(StoreError::Filter(_)) => "SEARCH_NOT_VALID",
            Self::Store(_) => "STORE_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
        }
    }

    pub fn get_violating_field_name(&self) -> Option<&'static str> {
        match self {
            Self::Query(err) => Some(err.get_violating_field_name()),
            Self::Filter(_) | Self::Store(StoreError::Filter(_)) => Some("search"),
            _ => None,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody::from(self)
    }
}

impl From<&RequestError> for ErrorBody {
    fn from(err: &RequestError) -> Self {
        let status = err.status();
        Self {
            error_code: err.error_code().into(),
            // Internal failures are not described to clients.
            message: if status.is_server_error() {
                status
                    .canonical_reason()
                    .unwrap_or("Internal Server Error")
                    .into()
            } else {
                err.to_string()
            },
            status_code: status.as_u16(),
            field: err.get_violating_field_name().map(Into::into),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn it_works() {
        let err = RequestError::from(QueryError::LimitTooHigh {
            limit: 500,
            max: 100,
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            serde_json::to_value(err.body()).unwrap(),
            json!({
                "errorCode": "LIMIT_TOO_HIGH",
                "message": "Limit can't be higher than 100",
                "statusCode": 400,
                "field": "limit",
            })
        );
    }

    #[test]
    fn internal_errors() {
        let err = RequestError::from(StoreError::InvalidDocument {
            collection: "hotels".into(),
            reason: "secret".into(),
        });
        let body = err.body();
        assert_eq!(body.status_code, 500);
        assert_eq!(body.message, "Internal Server Error");
        assert_eq!(body.field, None);

        let err = RequestError::from(StoreError::from(FilterError::InvalidRegex {
            pattern: "(".into(),
            reason: "unclosed group".into(),
        }));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "SEARCH_NOT_VALID");
    }
}
