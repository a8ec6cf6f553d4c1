use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderingError {
    #[error("duplicate ordering field `{0}`")]
    DuplicateField(String),
    #[error("invalid ordering direction `{0}`")]
    InvalidDirection(String),
}

pub type OrderingResult<T> = Result<T, OrderingError>;
