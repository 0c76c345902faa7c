//! Repository Module
//!
//! CRUD and conditional-update operations over the SQLite tables.
//! Pure reads take `&SqlitePool`; writes that must compose into a larger
//! transaction take `&mut SqliteConnection` so callers control atomicity.

pub mod event;
pub mod member;
pub mod membership;
pub mod merchant;
pub mod redemption;
pub mod reward;
pub mod transaction;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// SQLITE_BUSY / SQLITE_LOCKED that survived `busy_timeout`;
    /// a transient write collision, retryable by the caller
    #[error("Busy: {0}")]
    Busy(String),
}

/// SQLITE_BUSY (5), SQLITE_LOCKED (6) and their extended codes
/// (e.g. 517 BUSY_SNAPSHOT, 262 LOCKED_SHAREDCACHE).
fn is_busy(db: &dyn sqlx::error::DatabaseError) -> bool {
    match db.code().as_deref() {
        Some(code) => matches!(code, "5" | "6" | "261" | "262" | "517"),
        None => db.message().contains("locked"),
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(err.to_string())
            }
            sqlx::Error::Database(db) if is_busy(db.as_ref()) => {
                RepoError::Busy(err.to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for crate::utils::AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => Self::NotFound(msg),
            RepoError::Duplicate(msg) => Self::InvalidState(msg),
            RepoError::Validation(msg) => Self::Validation(msg),
            RepoError::Busy(msg) => Self::Conflict(msg),
            RepoError::Database(msg) => Self::Database(msg),
        }
    }
}

impl From<sqlx::Error> for crate::utils::AppError {
    fn from(err: sqlx::Error) -> Self {
        crate::utils::AppError::from(RepoError::from(err))
    }
}

/// Repository-level Result type
pub type RepoResult<T> = Result<T, RepoError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::AppError;

    #[test]
    fn busy_maps_to_conflict() {
        let err = AppError::from(RepoError::Busy("database is locked".into()));
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
