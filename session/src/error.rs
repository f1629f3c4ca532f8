//! Error types for the `session` layer.
//!
//! Session errors form the same root-struct-plus-kind tree as the identity
//! layer; identity errors are carried as the source while the kind records
//! which session transition they broke.

use identity::Error as IdentityError;
use std::error::Error as StdError;
use std::fmt;

/// Top-level session error type.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: SessionErrorKind,
}

/// The session transitions that can fail.
#[derive(Debug, PartialEq)]
pub enum SessionErrorKind {
    /// The login redirect could not be initiated. Surfaced to the visitor,
    /// not retried.
    LoginInitiation,
    /// The authorization callback was invalid or rejected. Terminal for that
    /// navigation.
    CallbackFailed,
    /// The auth-state query or claims fetch failed. Fail-closed.
    CheckFailed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            SessionErrorKind::LoginInitiation => write!(f, "Login initiation failed"),
            SessionErrorKind::CallbackFailed => write!(f, "Authorization callback failed"),
            SessionErrorKind::CheckFailed => write!(f, "Authentication check failed"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

/// Helper to wrap an identity error under a session error kind.
pub fn session_error(kind: SessionErrorKind, source: IdentityError) -> Error {
    Error {
        source: Some(Box::new(source)),
        error_kind: kind,
    }
}
