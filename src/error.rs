//! Normalized error surface for the orchestration layer.
//!
//! Every fallible operation in this crate resolves to a [`ShellError`].
//! The four kinds map directly onto how the UI reacts: validation and
//! reference errors are synchronous rejections that leave session state
//! alone, backend errors move the owning session to Failed, and busy
//! errors are pure backpressure.

use serde::Serialize;

/// Coarse classification of a [`ShellError`], used by projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Backend,
    InvalidReference,
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShellError {
    /// Malformed local input. Never reaches the backend.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The backend call failed or was rejected.
    #[error("backend call failed: {0}")]
    Backend(String),

    /// The operation targets a history id this client does not know.
    #[error("unknown history item: {0}")]
    InvalidReference(String),

    /// The owning session is already running an operation.
    #[error("{0} already in progress")]
    Busy(&'static str),
}

impl ShellError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShellError::Validation(_) => ErrorKind::Validation,
            ShellError::Backend(_) => ErrorKind::Backend,
            ShellError::InvalidReference(_) => ErrorKind::InvalidReference,
            ShellError::Busy(_) => ErrorKind::Busy,
        }
    }
}

pub type ShellResult<T> = std::result::Result<T, ShellError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_variants() {
        assert_eq!(ShellError::Validation("w=0".into()).kind(), ErrorKind::Validation);
        assert_eq!(ShellError::Backend("timeout".into()).kind(), ErrorKind::Backend);
        assert_eq!(ShellError::InvalidReference("x.png".into()).kind(), ErrorKind::InvalidReference);
        assert_eq!(ShellError::Busy("capture").kind(), ErrorKind::Busy);
    }

    #[test]
    fn messages_carry_context() {
        let err = ShellError::InvalidReference("shot-9.png".to_string());
        assert_eq!(err.to_string(), "unknown history item: shot-9.png");

        let err = ShellError::Busy("capture");
        assert_eq!(err.to_string(), "capture already in progress");
    }
}
