//! # Failure Taxonomy
//!
//! Every way a backend call can go wrong collapses into one of four kinds.
//! Adapters return a [`BackendFailure`] as a value; the fan-out and the write
//! path wrap the first one they observe into a [`CompositeError`] that names
//! the backend it came from.
//!
//! | kind               | produced when                                         |
//! |--------------------|-------------------------------------------------------|
//! | `unreachable`      | connection failure, or the time budget elapsed        |
//! | `client_error`     | backend answered 4xx                                  |
//! | `server_error`     | backend answered 5xx                                  |
//! | `invalid_response` | 2xx body is malformed, fails schema or coercion       |

use crate::call::BackendId;
use std::fmt;
use std::time::Duration;

/// Classification of a failed backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Unreachable,
    ClientError,
    ServerError,
    InvalidResponse,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Unreachable => "unreachable",
            FailureKind::ClientError => "client_error",
            FailureKind::ServerError => "server_error",
            FailureKind::InvalidResponse => "invalid_response",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `Failure` half of a backend result.
///
/// `status` carries the backend's HTTP status when there was one. `timed_out`
/// distinguishes an elapsed budget from a refused or reset connection; both
/// are [`FailureKind::Unreachable`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct BackendFailure {
    pub kind: FailureKind,
    pub status: Option<u16>,
    pub message: String,
    pub timed_out: bool,
}

impl BackendFailure {
    fn new(kind: FailureKind, status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            kind,
            status,
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Unreachable, None, message)
    }

    pub fn timed_out(budget: Duration) -> Self {
        Self {
            timed_out: true,
            ..Self::new(
                FailureKind::Unreachable,
                None,
                format!("no response within {}ms", budget.as_millis()),
            )
        }
    }

    pub fn client_error(status: u16, message: impl Into<String>) -> Self {
        Self::new(FailureKind::ClientError, Some(status), message)
    }

    pub fn server_error(status: u16, message: impl Into<String>) -> Self {
        Self::new(FailureKind::ServerError, Some(status), message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(FailureKind::InvalidResponse, None, message)
    }

    /// Classifies a non-2xx answer.
    ///
    /// 4xx and 5xx map to their own kinds. Anything else that is not a success
    /// (1xx, or a 3xx that was not followed) is not a usable answer either and
    /// is reported as `invalid_response`.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = format!("backend answered {status}: {}", excerpt(body));
        match status {
            400..=499 => Self::client_error(status, message),
            500..=599 => Self::server_error(status, message),
            _ => Self {
                status: Some(status),
                ..Self::invalid_response(message)
            },
        }
    }

    /// Only connection-level failures are worth another attempt. A timeout
    /// has already consumed the budget, and every other kind is an answer.
    pub fn is_retryable(&self) -> bool {
        self.kind == FailureKind::Unreachable && !self.timed_out
    }
}

const EXCERPT_CHARS: usize = 200;

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    let mut out: String = trimmed.chars().take(EXCERPT_CHARS).collect();
    if trimmed.chars().count() > EXCERPT_CHARS {
        out.push_str("...");
    }
    out
}

/// The single error a composite request can end in.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompositeError {
    /// A required backend call failed; carries the failure unchanged.
    #[error("{backend} backend failed: {failure}")]
    Backend {
        backend: BackendId,
        failure: BackendFailure,
    },

    /// A fragment arrived but a mapped field could not be taken from it.
    #[error("field `{target}` could not be taken from the {backend} response: {reason}")]
    Projection {
        backend: BackendId,
        target: String,
        reason: String,
    },
}

impl CompositeError {
    pub fn backend(&self) -> BackendId {
        match self {
            CompositeError::Backend { backend, .. } | CompositeError::Projection { backend, .. } => {
                *backend
            }
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            CompositeError::Backend { failure, .. } => failure.kind,
            CompositeError::Projection { .. } => FailureKind::InvalidResponse,
        }
    }

    pub fn timed_out(&self) -> bool {
        matches!(self, CompositeError::Backend { failure, .. } if failure.timed_out)
    }

    /// HTTP status for the client-facing error body.
    ///
    /// Timeouts are 504; every other `unreachable`, `server_error` and
    /// `invalid_response` is 502. A backend 4xx is passed through as-is.
    pub fn http_status(&self) -> u16 {
        match self {
            CompositeError::Backend { failure, .. } => match failure.kind {
                FailureKind::Unreachable if failure.timed_out => 504,
                FailureKind::ClientError => match failure.status {
                    Some(status @ 400..=499) => status,
                    _ => 400,
                },
                FailureKind::Unreachable
                | FailureKind::ServerError
                | FailureKind::InvalidResponse => 502,
            },
            CompositeError::Projection { .. } => 502,
        }
    }
}
