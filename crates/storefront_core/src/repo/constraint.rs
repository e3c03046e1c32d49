//! Storage failure classification.
//!
//! # Responsibility
//! - Turn raw SQLite write failures into the repository error taxonomy.
//!
//! # Invariants
//! - Classification is pure: it never touches the connection.
//! - Priority: foreign key, then uniqueness, then not-null, then any other
//!   constraint. Non-constraint failures are storage faults.

use crate::db::DbError;
use crate::repo::error::{RepoError, REFERENCED_ROW_MISSING};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::ErrorCode;

static CONSTRAINT_TARGET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)constraint failed:\s*(.+)$").expect("valid constraint target regex")
});

/// Classifies any rusqlite failure using the default taxonomy.
pub fn classify_storage_error(err: rusqlite::Error) -> RepoError {
    match constraint_message(&err) {
        Some(message) => classify_constraint_message(message),
        None => RepoError::Storage(DbError::Sqlite(err)),
    }
}

/// Classifies a constraint failure message.
pub fn classify_constraint_message(message: &str) -> RepoError {
    let lower = message.to_lowercase();
    let targets = parse_targets(message);

    if lower.contains("foreign key") {
        return RepoError::foreign_key(REFERENCED_ROW_MISSING);
    }
    if lower.contains("unique") || lower.contains("duplicate") || lower.contains("primary key") {
        return RepoError::duplicate(if targets.is_empty() {
            "Duplicate entry".to_string()
        } else {
            format!("Duplicate entry for {}", targets.join(", "))
        });
    }
    if lower.contains("not null") {
        let column = targets
            .first()
            .map(|target| target.rsplit('.').next().unwrap_or(target).to_string());
        return RepoError::MissingField(column);
    }
    RepoError::Integrity(message.to_string())
}

/// Returns the `table.column` targets named by a constraint failure.
///
/// Empty for non-constraint failures and for constraints SQLite reports
/// without a column list (foreign keys).
pub fn constraint_targets(err: &rusqlite::Error) -> Vec<String> {
    constraint_message(err).map(parse_targets).unwrap_or_default()
}

fn constraint_message(err: &rusqlite::Error) -> Option<&str> {
    match err {
        rusqlite::Error::SqliteFailure(failure, message)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            Some(message.as_deref().unwrap_or(""))
        }
        _ => None,
    }
}

fn parse_targets(message: &str) -> Vec<String> {
    CONSTRAINT_TARGET_RE
        .captures(message.trim())
        .and_then(|caps| caps.get(1))
        .map(|list| {
            list.as_str()
                .split(',')
                .map(str::trim)
                .filter(|target| !target.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
