//! Uniform success/failure response envelope.
//!
//! Serializes as `{"status": true, "data": ...}` or
//! `{"status": false, "message": "..."}`; never both `data` and `message`.

use crate::repo::error::{ErrorKind, RepoError, RepoResult};
use log::{debug, error};
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Transport-facing result of one repository call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope<T> {
    Success(T),
    Failure { kind: ErrorKind, message: String },
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self::Success(data)
    }

    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
        }
    }

    /// Wraps a repository error, logging server faults with full detail.
    pub fn from_error(err: &RepoError) -> Self {
        let kind = err.kind();
        if kind.is_server_fault() {
            error!(
                "event=response_error module=envelope status=error error_kind={} error={err}",
                kind.as_str()
            );
        } else {
            debug!(
                "event=response_error module=envelope status=rejected error_kind={}",
                kind.as_str()
            );
        }
        Self::failure(kind, err.user_message())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { message, .. } => Some(message.as_str()),
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success(_) => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }

    /// Suggested transport status code.
    pub fn http_status(&self) -> u16 {
        self.error_kind().map_or(200, ErrorKind::http_status)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        match self {
            Self::Success(data) => Envelope::Success(f(data)),
            Self::Failure { kind, message } => Envelope::Failure { kind, message },
        }
    }
}

impl<T> From<RepoResult<T>> for Envelope<T> {
    fn from(value: RepoResult<T>) -> Self {
        match value {
            Ok(data) => Self::success(data),
            Err(err) => Self::from_error(&err),
        }
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Envelope", 2)?;
        match self {
            Self::Success(data) => {
                state.serialize_field("status", &true)?;
                state.serialize_field("data", data)?;
            }
            Self::Failure { message, .. } => {
                state.serialize_field("status", &false)?;
                state.serialize_field("message", message)?;
            }
        }
        state.end()
    }
}
