//! Repository error types
//!
//! Structured errors for catalog storage access, carrying the operation that failed
//! and a coarse error category used for HTTP status mapping.
//!
//! # Example
//!
//! ```rust
//! use catalog_service::repository::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
//!
//! let error = RepositoryError::timeout(RepositoryOperation::ProductsByCategory, "statement timeout");
//! assert!(matches!(error.kind, RepositoryErrorKind::Timeout));
//! assert!(error.is_retriable());
//! ```

use std::fmt;

/// Operation being performed when the repository error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOperation {
    /// Listing the products of one category
    ProductsByCategory,
    /// Loading a single product by id
    FindProduct,
    /// Listing products with optional category/status filters
    FindProducts,
    /// Listing categories
    Categories,
    /// Connectivity check
    Ping,
    /// Loading catalog fixtures from disk
    LoadFixtures,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProductsByCategory => write!(f, "products_by_category"),
            Self::FindProduct => write!(f, "find_product"),
            Self::FindProducts => write!(f, "find_products"),
            Self::Categories => write!(f, "categories"),
            Self::Ping => write!(f, "ping"),
            Self::LoadFixtures => write!(f, "load_fixtures"),
        }
    }
}

/// Category of repository error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    /// Entity was not found
    NotFound,
    /// Failed to connect to the backing store
    ConnectionFailed,
    /// Operation timed out
    Timeout,
    /// Underlying database error
    DatabaseError,
    /// Serialization or deserialization error
    SerializationError,
    /// Other unclassified error
    Other,
}

impl fmt::Display for RepositoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::DatabaseError => write!(f, "database_error"),
            Self::SerializationError => write!(f, "serialization_error"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured repository error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
    /// The operation being performed when the error occurred
    pub operation: RepositoryOperation,
    /// The category of error
    pub kind: RepositoryErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl RepositoryError {
    /// Create a new repository error
    pub fn new(
        operation: RepositoryOperation,
        kind: RepositoryErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
        }
    }

    /// Create a connection failed error
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::new(
            RepositoryOperation::Ping,
            RepositoryErrorKind::ConnectionFailed,
            message,
        )
    }

    /// Create a timeout error
    pub fn timeout(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::Timeout, message)
    }

    /// Create a database error
    pub fn database_error(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::DatabaseError, message)
    }

    /// Create a serialization error
    pub fn serialization_error(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::SerializationError, message)
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: RepositoryOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Check if this error is retriable (transient errors that may succeed on retry)
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            RepositoryErrorKind::ConnectionFailed | RepositoryErrorKind::Timeout
        )
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Repository {} error during {}: {}",
            self.kind, self.operation, self.message
        )
    }
}

impl std::error::Error for RepositoryError {}

// Conversion from sqlx::Error; callers fix up the operation with `with_operation`
#[cfg(feature = "database")]
impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::Error as E;
        let op = RepositoryOperation::FindProducts;
        match err {
            E::RowNotFound => Self::new(op, RepositoryErrorKind::NotFound, "Row not found"),
            E::PoolTimedOut => Self::timeout(op, "Connection pool timed out"),
            E::PoolClosed => Self::connection_failed("Connection pool is closed"),
            E::Io(e) => Self::new(op, RepositoryErrorKind::ConnectionFailed, e.to_string()),
            E::Tls(e) => Self::new(
                op,
                RepositoryErrorKind::ConnectionFailed,
                format!("TLS error: {}", e),
            ),
            E::ColumnDecode { index, source } => Self::serialization_error(
                op,
                format!("Failed to decode column {}: {}", index, source),
            ),
            E::Decode(e) => Self::serialization_error(op, e.to_string()),
            E::WorkerCrashed => Self::connection_failed("Database worker crashed"),
            other => Self::database_error(op, other.to_string()),
        }
    }
}
