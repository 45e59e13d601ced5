//! Shared error type across seqwire crates.

use thiserror::Error;

/// Stable error kind strings used in logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Datagram or bundle ended before a required element.
    Truncated,
    /// Wrong info address or unexpected kind discriminant.
    BadTag,
    /// An argument or packet had the wrong type.
    TypeMismatch,
    /// Transport-level send failure.
    Send,
    /// Invalid configuration.
    Config,
    /// Internal error.
    Internal,
}

impl ErrorKind {
    /// String representation used in log fields and test assertions.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Truncated => "TRUNCATED",
            ErrorKind::BadTag => "BAD_TAG",
            ErrorKind::TypeMismatch => "TYPE_MISMATCH",
            ErrorKind::Send => "SEND",
            ErrorKind::Config => "CONFIG",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, SeqwireError>;

/// Unified error type used by core and daemon.
///
/// Decode failures (`Truncated`/`BadTag`/`TypeMismatch`) are never fatal: the
/// receive loop logs them and keeps listening.
#[derive(Debug, Error)]
pub enum SeqwireError {
    #[error("truncated: {0}")]
    Truncated(String),
    #[error("bad tag: {0}")]
    BadTag(String),
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    #[error("send failed: {0}")]
    Send(String),
    #[error("config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl SeqwireError {
    /// Map the error to its stable kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SeqwireError::Truncated(_) => ErrorKind::Truncated,
            SeqwireError::BadTag(_) => ErrorKind::BadTag,
            SeqwireError::TypeMismatch(_) => ErrorKind::TypeMismatch,
            SeqwireError::Send(_) => ErrorKind::Send,
            SeqwireError::Config(_) => ErrorKind::Config,
            SeqwireError::Internal(_) => ErrorKind::Internal,
        }
    }
}
