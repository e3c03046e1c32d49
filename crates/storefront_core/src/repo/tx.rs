//! Scoped read and write transactions.
//!
//! # Invariants
//! - One deferred transaction per repository read, so a projection and its
//!   eager relations come from one snapshot.
//! - One immediate transaction per repository write.
//! - Success commits; any failure rolls back before the failure is classified.
//! - Pre-check rejections pass through unclassified.

use crate::model::EntityKind;
use crate::repo::error::{RepoError, RepoResult};
use log::{debug, error, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::time::Instant;

/// Failure raised inside a write body.
pub(crate) enum WriteError {
    /// Already-classified rejection (pre-check, not found, read-back).
    Rejected(RepoError),
    /// Raw storage failure, classified after rollback.
    Storage(rusqlite::Error),
}

impl From<RepoError> for WriteError {
    fn from(value: RepoError) -> Self {
        Self::Rejected(value)
    }
}

impl From<rusqlite::Error> for WriteError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(value)
    }
}

pub(crate) type WriteResult<T> = Result<T, WriteError>;

/// Runs `body` in a deferred read transaction on a shared connection.
pub(crate) fn run_read<T>(
    conn: &Connection,
    body: impl FnOnce(&Connection) -> RepoResult<T>,
) -> RepoResult<T> {
    let tx = conn.unchecked_transaction()?;
    let value = body(&tx)?;
    tx.commit()?;
    Ok(value)
}

/// Runs `body` in an immediate transaction on `conn`.
///
/// `classify` turns raw storage failures into repository errors; callers
/// pass a path-specific classifier when a message override applies.
pub(crate) fn run_write<T>(
    conn: &mut Connection,
    entity: EntityKind,
    op: &'static str,
    classify: fn(rusqlite::Error) -> RepoError,
    body: impl FnOnce(&Transaction<'_>) -> WriteResult<T>,
) -> RepoResult<T> {
    let started_at = Instant::now();
    let result = match conn.transaction_with_behavior(TransactionBehavior::Immediate) {
        Ok(tx) => match body(&tx) {
            Ok(value) => tx.commit().map(|()| value).map_err(classify),
            Err(failure) => {
                if let Err(rollback_err) = tx.rollback() {
                    error!(
                        "event=repo_write module=repo entity={} op={op} status=rollback_failed error={rollback_err}",
                        entity.table()
                    );
                }
                Err(match failure {
                    WriteError::Rejected(err) => err,
                    WriteError::Storage(err) => classify(err),
                })
            }
        },
        Err(err) => Err(classify(err)),
    };

    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => debug!(
            "event=repo_write module=repo entity={} op={op} status=ok duration_ms={duration_ms}",
            entity.table()
        ),
        Err(err) if err.kind().is_server_fault() => error!(
            "event=repo_write module=repo entity={} op={op} status=error error_kind={} duration_ms={duration_ms} error={err}",
            entity.table(),
            err.kind().as_str()
        ),
        Err(err) => warn!(
            "event=repo_write module=repo entity={} op={op} status=rejected error_kind={} duration_ms={duration_ms}",
            entity.table(),
            err.kind().as_str()
        ),
    }
    result
}
