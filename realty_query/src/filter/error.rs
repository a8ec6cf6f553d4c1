use thiserror::Error;

/// Filter evaluation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Regex pattern failed to compile.
    #[error("invalid regex pattern `{pattern}`: {reason}")]
    InvalidRegex {
        /// Source pattern.
        pattern: String,
        /// Compiler message.
        reason: String,
    },
}

/// Filter result type.
pub type FilterResult<T> = Result<T, FilterError>;
