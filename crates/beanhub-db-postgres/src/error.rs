//! Backend error type and Postgres error-code classification.

use beanhub_storage::StorageError;
use sqlx_core::error::Error as SqlxError;

/// `unique_violation`: an insert lost the race on a unique key.
const PG_UNIQUE_VIOLATION: &str = "23505";

/// True when the error is a unique-constraint violation.
///
/// The daily-selection insert uses this to recognize a lost first-insert
/// race on the date column and converge instead of failing.
pub fn is_unique_violation(err: &SqlxError) -> bool {
    match err {
        SqlxError::Database(db) => db.code().as_deref() == Some(PG_UNIQUE_VIOLATION),
        _ => false,
    }
}

/// Errors raised by the Postgres backend before they widen to
/// [`StorageError`].
#[derive(Debug, thiserror::Error)]
pub enum PostgresError {
    /// Anything the driver reports: connect, acquire, query, decode.
    #[error("database error: {0}")]
    Driver(#[from] SqlxError),

    /// Schema migration failure.
    #[error("migration failed: {0}")]
    Migration(String),
}

impl From<PostgresError> for StorageError {
    fn from(err: PostgresError) -> Self {
        match err {
            PostgresError::Driver(e) => {
                let unreachable_server = matches!(
                    e,
                    SqlxError::PoolTimedOut
                        | SqlxError::PoolClosed
                        | SqlxError::Io(_)
                        | SqlxError::Tls(_)
                );
                if unreachable_server {
                    StorageError::connection_error(e.to_string())
                } else {
                    StorageError::internal(e.to_string())
                }
            }
            PostgresError::Migration(msg) => StorageError::internal(msg),
        }
    }
}

/// Result type alias for backend-internal operations.
pub type Result<T> = std::result::Result<T, PostgresError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_timeout_widens_to_connection_error() {
        let err = PostgresError::Driver(SqlxError::PoolTimedOut);
        let storage: StorageError = err.into();
        assert!(matches!(storage, StorageError::ConnectionError { .. }));
    }

    #[test]
    fn test_row_not_found_widens_to_internal() {
        let err = PostgresError::Driver(SqlxError::RowNotFound);
        let storage: StorageError = err.into();
        assert!(matches!(storage, StorageError::Internal { .. }));
    }

    #[test]
    fn test_migration_failure_widens_to_internal() {
        let storage: StorageError = PostgresError::Migration("checksum mismatch".into()).into();
        assert!(storage.to_string().contains("checksum mismatch"));
    }

    #[test]
    fn test_non_database_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&SqlxError::PoolTimedOut));
        assert!(!is_unique_violation(&SqlxError::RowNotFound));
    }
}
