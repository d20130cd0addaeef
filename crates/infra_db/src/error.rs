//! Database error types
//!
//! Errors raised by the document store, and their translation into the
//! three store error kinds the repository ports expose.

use thiserror::Error;

use core_kernel::StoreError;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// The server or an access rule rejected the caller
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The server went away or refused work mid-session
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    /// Serialization failure or deadlock; the statement may succeed if retried
    #[error("Transaction conflict: {0}")]
    Conflict(String),

    /// Entity not found in database
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// A stored document could not be decoded into its entity
    #[error("Failed to decode document: {0}")]
    Decode(String),

    /// An entity could not be encoded into a document
    #[error("Failed to encode document: {0}")]
    Encode(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration error
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Pool exhaustion - no available connections
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl DatabaseError {
    /// Creates a not found error for a specific entity type and identifier
    ///
    /// # Example
    ///
    /// ```rust
    /// use infra_db::DatabaseError;
    ///
    /// let error = DatabaseError::not_found("Property", "PRP-123");
    /// assert!(error.to_string().contains("Property"));
    /// ```
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound(format!("{} with id '{}' not found", entity, id))
    }

    /// Checks if this error indicates a record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }

    /// Checks if this error is a connection-related issue
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_)
                | DatabaseError::Unavailable(_)
                | DatabaseError::PoolExhausted
        )
    }

    /// Checks if the caller was rejected by an access rule
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, DatabaseError::PermissionDenied(_))
    }

    /// Checks if the same operation may succeed when retried
    ///
    /// Rejected statements, bad documents and failed migrations fail the
    /// same way every time.
    pub fn is_retryable(&self) -> bool {
        self.is_connection_error() || matches!(self, DatabaseError::Conflict(_))
    }
}

/// Maps a PostgreSQL SQLSTATE code to an error variant
///
/// https://www.postgresql.org/docs/current/errcodes-appendix.html
pub fn classify_sqlstate(code: &str, message: &str) -> DatabaseError {
    let message = message.to_string();
    match code {
        // insufficient_privilege, and class 28: invalid authorization
        "42501" => DatabaseError::PermissionDenied(message),
        c if c.starts_with("28") => DatabaseError::PermissionDenied(message),
        // class 08: connection exception
        c if c.starts_with("08") => DatabaseError::Unavailable(message),
        // admin_shutdown, crash_shutdown, cannot_connect_now, too_many_connections
        "57P01" | "57P02" | "57P03" | "53300" => DatabaseError::Unavailable(message),
        // serialization_failure, deadlock_detected
        "40001" | "40P01" => DatabaseError::Conflict(message),
        _ => DatabaseError::QueryFailed(message),
    }
}

/// Converts SQLx errors to more specific DatabaseError variants
impl From<&sqlx::Error> for DatabaseError {
    fn from(error: &sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::PoolClosed => DatabaseError::Unavailable("connection pool closed".to_string()),
            sqlx::Error::WorkerCrashed => DatabaseError::Unavailable("connection worker crashed".to_string()),
            sqlx::Error::Io(e) => DatabaseError::Unavailable(e.to_string()),
            sqlx::Error::Tls(e) => DatabaseError::Unavailable(e.to_string()),
            sqlx::Error::Protocol(msg) => DatabaseError::Unavailable(msg.clone()),
            sqlx::Error::Decode(e) => DatabaseError::Decode(e.to_string()),
            sqlx::Error::ColumnDecode { index, source } => {
                DatabaseError::Decode(format!("column {}: {}", index, source))
            }
            sqlx::Error::Migrate(e) => DatabaseError::MigrationFailed(e.to_string()),
            sqlx::Error::Database(db_err) => match db_err.code() {
                Some(code) => classify_sqlstate(code.as_ref(), db_err.message()),
                None => DatabaseError::QueryFailed(db_err.message().to_string()),
            },
            _ => DatabaseError::QueryFailed(error.to_string()),
        }
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        DatabaseError::from(&error)
    }
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        DatabaseError::MigrationFailed(error.to_string())
    }
}

/// Translates adapter failures into the store error kinds
///
/// Permission rejections stay `PermissionDenied` and a missing row is
/// `NotFound`. Everything else is `Transient`, since the ports have no
/// other kind, but only connectivity, pool and conflict failures are marked
/// retryable. The `DatabaseError` is kept as the source.
impl From<DatabaseError> for StoreError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::PermissionDenied(message) => StoreError::permission_denied(message),
            DatabaseError::NotFound(message) => StoreError::not_found("Record", message),
            other if other.is_retryable() => {
                let message = other.to_string();
                StoreError::transient_with_source(message, other)
            }
            other => {
                let message = other.to_string();
                StoreError::failed(message, other)
            }
        }
    }
}
