use thiserror::Error;

/// Failure returned by any wrapped service operation.
///
/// Logging middlewares never create or interpret these; they forward them
/// untouched and record their display text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("entity not found")]
    NotFound,

    #[error("entity already exists")]
    Conflict,

    #[error("failed to authenticate the request")]
    Authentication,

    #[error("not authorized to perform the operation")]
    Authorization,

    #[error("malformed entity: {0}")]
    Malformed(String),

    #[error("storage failure: {0}")]
    Storage(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
