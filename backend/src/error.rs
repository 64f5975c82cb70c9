use thiserror::Error;

/// Coarse classification of a [`SocialError`], stable across storage backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Validation,
    Storage,
}

#[derive(Error, Debug)]
pub enum SocialError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("storage failure: {0}")]
    Storage(#[source] sqlx::Error),
}

pub type SocialResult<T> = Result<T, SocialError>;

impl SocialError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SocialError::NotFound(_) => ErrorKind::NotFound,
            SocialError::Conflict(_) => ErrorKind::Conflict,
            SocialError::Validation(_) => ErrorKind::Validation,
            SocialError::Storage(_) => ErrorKind::Storage,
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        SocialError::NotFound(what.into())
    }

    pub fn conflict(what: impl Into<String>) -> Self {
        SocialError::Conflict(what.into())
    }
}

impl From<sqlx::Error> for SocialError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                return SocialError::Conflict(db_err.message().to_string());
            }
            if db_err.is_foreign_key_violation() {
                return SocialError::NotFound(db_err.message().to_string());
            }
        }
        SocialError::Storage(e)
    }
}
