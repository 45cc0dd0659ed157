use std::fmt;

use thiserror::Error;

/// Boxed low-level cause carried by [`AppError::DatabaseError`].
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync>;

/// Which class of storage failure a [`AppError::DatabaseError`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseErrorKind {
    /// Integrity violation: unique, foreign key, check, or not-null.
    Conflict,
    /// A dependent row blocks a delete.
    Dependency,
    /// The store failed to complete the statement (connection, I/O, pool).
    Unavailable,
    /// Anything the store layer did not anticipate (decode errors and the like).
    Unexpected,
}

impl DatabaseErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseErrorKind::Conflict => "conflict",
            DatabaseErrorKind::Dependency => "dependency",
            DatabaseErrorKind::Unavailable => "unavailable",
            DatabaseErrorKind::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for DatabaseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application-wide error types for Harvest.
///
/// Every fallible operation in the workspace returns one of these four kinds;
/// raw `sqlx` errors never cross the repository boundary.
#[derive(Error, Debug)]
pub enum AppError {
    /// No row exists for the requested identifier.
    #[error("{resource} not found for ID {id}.")]
    NotFound { resource: &'static str, id: String },

    /// Storage failure, already translated. The message is safe to show to callers;
    /// the cause is kept for logs only.
    #[error("{message}")]
    DatabaseError {
        kind: DatabaseErrorKind,
        message: String,
        #[source]
        source: Option<BoxedCause>,
    },

    /// Input failed a domain rule.
    #[error("{0}")]
    ValidationError(String),

    /// A named operation could not be carried out.
    #[error("{operation} {message}")]
    OperationError { operation: String, message: String },
}

impl AppError {
    pub fn not_found(resource: &'static str, id: impl fmt::Display) -> Self {
        AppError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn database(
        kind: DatabaseErrorKind,
        message: impl Into<String>,
        source: impl Into<BoxedCause>,
    ) -> Self {
        AppError::DatabaseError {
            kind,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::ValidationError(message.into())
    }

    pub fn operation(operation: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::OperationError {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Human-readable detail, as rendered to API callers.
    pub fn detail(&self) -> String {
        self.to_string()
    }

    /// Storage failure class, if this is a database error.
    pub fn database_kind(&self) -> Option<DatabaseErrorKind> {
        match self {
            AppError::DatabaseError { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound { .. })
    }
}
