use thiserror::Error;

use crate::validate::ValidationErrors;

/// Error types for the domain module
#[derive(Error, Debug)]
pub enum DomainError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// The entity was rejected; every violation is collected, not just
    /// the first.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// The targeted record does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Error from producing a credential digest
    #[error("Digest error: {0}")]
    Digest(#[from] bcrypt::BcryptError),
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        DomainError::Validation(errors)
    }
}

impl From<sea_orm::TransactionError<sea_orm::DbErr>> for DomainError {
    fn from(error: sea_orm::TransactionError<sea_orm::DbErr>) -> Self {
        match error {
            sea_orm::TransactionError::Connection(e) => DomainError::Database(e),
            sea_orm::TransactionError::Transaction(e) => DomainError::Database(e),
        }
    }
}

/// Type alias for Result with DomainError
pub type Result<T> = std::result::Result<T, DomainError>;
