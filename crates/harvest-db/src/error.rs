use std::fmt;

use harvest_core::error::{AppError, DatabaseErrorKind};
use sqlx::error::ErrorKind;

/// Repository operation, used to label translated errors and log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    List,
    Create,
    Update,
    Remove,
    PendingOrdered,
    Claim,
    MarkScraped,
    Release,
    HealthCheck,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Get => "get",
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Remove => "remove",
            Operation::PendingOrdered => "pending lookup",
            Operation::Claim => "claim",
            Operation::MarkScraped => "result update",
            Operation::Release => "release",
            Operation::HealthCheck => "health check",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a raw `sqlx` failure and wrap it as [`AppError::DatabaseError`].
///
/// - integrity violations become `Conflict` (or `Dependency` when a foreign key
///   blocks a delete)
/// - driver, connection, and pool failures become `Unavailable`
/// - everything else becomes `Unexpected`
pub fn translate(entity: &'static str, operation: Operation, err: sqlx::Error) -> AppError {
    let (kind, message) = classify(entity, operation, &err);

    tracing::error!(
        entity,
        operation = %operation,
        kind = %kind,
        error = %err,
        "{message}"
    );

    AppError::database(kind, message, err)
}

fn classify(entity: &str, operation: Operation, err: &sqlx::Error) -> (DatabaseErrorKind, String) {
    match err {
        sqlx::Error::Database(db_err) if is_integrity_violation(db_err.kind()) => {
            if operation == Operation::Remove && db_err.is_foreign_key_violation() {
                (
                    DatabaseErrorKind::Dependency,
                    format!("Cannot remove {entity} due to dependencies."),
                )
            } else {
                (
                    DatabaseErrorKind::Conflict,
                    format!("Data conflict during {operation}."),
                )
            }
        }
        sqlx::Error::Database(_)
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => {
            let message = if operation == Operation::Remove {
                format!("Could not remove {entity} due to a database issue.")
            } else {
                format!("Could not complete {operation} due to a database issue.")
            };
            (DatabaseErrorKind::Unavailable, message)
        }
        _ => (
            DatabaseErrorKind::Unexpected,
            format!("An unexpected error occurred during {operation}."),
        ),
    }
}

fn is_integrity_violation(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation
    )
}
