//! Repository error type and the client-facing error taxonomy.
//!
//! # Invariants
//! - Every `RepoError` maps to exactly one `ErrorKind`.
//! - Server faults never expose storage detail through `user_message()`.

use crate::db::DbError;
use crate::model::EntityKind;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const USER_ALREADY_HAS_COMPANY: &str = "This user already has a company.";
pub const COMPANY_NAME_TAKEN: &str = "This company name is already used.";
pub const CATEGORY_NAME_TAKEN: &str = "This category name is already used.";
pub const USER_HAS_DEPENDENTS: &str = "This user still owns a company or products.";
pub const USER_NOT_FOUND: &str = "User not found";
pub const REFERENCED_ROW_MISSING: &str = "Referenced record does not exist";
pub const INTEGRITY_FAILED: &str = "Data integrity check failed";
pub const STORAGE_FAULT: &str = "Internal storage error";

pub type RepoResult<T> = Result<T, RepoError>;

/// Stable error categories exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    DuplicateEntry,
    ForeignKeyViolation,
    MissingField,
    IntegrityError,
    UnexpectedStorageError,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::DuplicateEntry => "duplicate_entry",
            Self::ForeignKeyViolation => "foreign_key_violation",
            Self::MissingField => "missing_field",
            Self::IntegrityError => "integrity_error",
            Self::UnexpectedStorageError => "unexpected_storage_error",
        }
    }

    /// Only storage faults are server-side; everything else is a client error.
    pub fn is_server_fault(self) -> bool {
        matches!(self, Self::UnexpectedStorageError)
    }

    /// Suggested transport status code.
    pub fn http_status(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::UnexpectedStorageError => 500,
            _ => 400,
        }
    }
}

/// Repository-level failure.
#[derive(Debug)]
pub enum RepoError {
    NotFound { entity: EntityKind, id: i64 },
    /// Uniqueness violation; carries the client message.
    DuplicateEntry(String),
    /// Missing referenced row; carries the client message.
    ForeignKeyViolation(String),
    /// Required column left empty; carries the column name when known.
    MissingField(Option<String>),
    /// Any other constraint failure; carries the raw constraint text.
    Integrity(String),
    Storage(DbError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    /// Write/read-back mismatch inside one transaction.
    InconsistentState(&'static str),
}

impl RepoError {
    pub fn not_found(entity: EntityKind, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::DuplicateEntry(message.into())
    }

    pub fn foreign_key(message: impl Into<String>) -> Self {
        Self::ForeignKeyViolation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::DuplicateEntry(_) => ErrorKind::DuplicateEntry,
            Self::ForeignKeyViolation(_) => ErrorKind::ForeignKeyViolation,
            Self::MissingField(_) => ErrorKind::MissingField,
            Self::Integrity(_) => ErrorKind::IntegrityError,
            Self::Storage(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::InconsistentState(_) => ErrorKind::UnexpectedStorageError,
        }
    }

    /// Message safe to hand to clients.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { entity, .. } => format!("{} not found", entity.label()),
            Self::DuplicateEntry(message) | Self::ForeignKeyViolation(message) => message.clone(),
            Self::MissingField(Some(column)) => format!("Missing required field: {column}"),
            Self::MissingField(None) => "A required field is missing".to_string(),
            Self::Integrity(_) => INTEGRITY_FAILED.to_string(),
            Self::Storage(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::InconsistentState(_) => STORAGE_FAULT.to_string(),
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{} not found: {id}", entity.label()),
            Self::DuplicateEntry(message) => write!(f, "duplicate entry: {message}"),
            Self::ForeignKeyViolation(message) => write!(f, "foreign key violation: {message}"),
            Self::MissingField(Some(column)) => write!(f, "missing required field `{column}`"),
            Self::MissingField(None) => write!(f, "missing required field"),
            Self::Integrity(detail) => write!(f, "integrity error: {detail}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::InconsistentState(details) => write!(f, "inconsistent storage state: {details}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        super::constraint::classify_storage_error(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, RepoError, STORAGE_FAULT};
    use crate::db::DbError;
    use crate::model::EntityKind;

    #[test]
    fn not_found_message_names_the_entity() {
        let err = RepoError::not_found(EntityKind::Category, 7);
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.user_message(), "Category not found");
        assert_eq!(err.kind().http_status(), 404);
    }

    #[test]
    fn storage_faults_hide_detail_from_clients() {
        let err = RepoError::Storage(DbError::UnsupportedSchemaVersion {
            db_version: 9,
            latest_supported: 3,
        });
        assert!(err.kind().is_server_fault());
        assert_eq!(err.user_message(), STORAGE_FAULT);
        assert!(err.to_string().contains("schema version 9"));
    }

    #[test]
    fn constraint_kinds_are_client_errors() {
        for err in [
            RepoError::duplicate("taken"),
            RepoError::foreign_key("missing"),
            RepoError::MissingField(None),
            RepoError::Integrity("CHECK constraint failed".to_string()),
        ] {
            assert!(!err.kind().is_server_fault());
            assert_eq!(err.kind().http_status(), 400);
        }
    }
}
