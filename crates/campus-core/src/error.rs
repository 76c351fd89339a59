//! Error model shared by every layer of Campus.
//!
//! Every failure is classified by an [`ErrorKind`]:
//!
//! - **Bad input**: client-correctable problems (blank field, invalid email,
//!   unknown enum value, unresolvable course reference) - HTTP 400
//! - **Not found**: the referenced entity does not exist - HTTP 404
//! - **Internal**: storage or unexpected failure - HTTP 500
//!
//! Independent failures are collected rather than short-circuited and then
//! folded into one reported outcome with [`aggregate`]. The aggregate carries
//! the most severe kind among its members.

use std::fmt;

use serde::Serialize;

/// Classification of a failure, ordered by severity.
///
/// The derived ordering is the severity ordering: `BadInput < NotFound < Internal`,
/// which matches the numeric ordering of the corresponding HTTP status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    BadInput,
    NotFound,
    Internal,
}

impl ErrorKind {
    /// Standard HTTP status code for this kind.
    pub const fn status_code(self) -> u16 {
        match self {
            Self::BadInput => 400,
            Self::NotFound => 404,
            Self::Internal => 500,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadInput => write!(f, "bad input"),
            Self::NotFound => write!(f, "not found"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// Top-level error type for Campus operations.
///
/// A single failure is one of the three classified variants. `Multiple` is
/// the composite produced by [`aggregate`] when more than one failure was
/// collected; it never nests another `Multiple`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Client-correctable input problem
    #[error("{0}")]
    BadInput(String),

    /// Referenced entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Storage or unexpected failure
    #[error("{0}")]
    Internal(String),

    /// Two or more failures reported together
    #[error("Multiple Errors: {}", join_messages(.0))]
    Multiple(Vec<Error>),
}

fn join_messages(errors: &[Error]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// Convenience constructors
impl Error {
    /// Create a bad-input failure.
    pub fn bad_input(msg: impl Into<String>) -> Self {
        Self::BadInput(msg.into())
    }

    /// Create a not-found failure.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an internal failure.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl Error {
    /// Classification of this error.
    ///
    /// For a composite this is the most severe member kind. An empty
    /// composite (only constructible by hand) reports `BadInput`.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadInput(_) => ErrorKind::BadInput,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Internal(_) => ErrorKind::Internal,
            Self::Multiple(errors) => errors
                .iter()
                .map(Self::kind)
                .max()
                .unwrap_or(ErrorKind::BadInput),
        }
    }

    /// HTTP status code for this error (worst member for a composite).
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Messages of the individual failures this error represents.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Multiple(errors) => errors.iter().flat_map(Self::messages).collect(),
            single => vec![single.to_string()],
        }
    }

    fn into_members(self) -> Vec<Self> {
        match self {
            Self::Multiple(errors) => errors.into_iter().flat_map(Self::into_members).collect(),
            single => vec![single],
        }
    }
}

/// Fold collected failures into one reported outcome.
///
/// - no failures: `None`
/// - exactly one failure: that failure, unchanged and unwrapped
/// - more than one: a flattened [`Error::Multiple`] in collection order
pub fn aggregate(errors: Vec<Error>) -> Option<Error> {
    if errors.len() <= 1 {
        return errors.into_iter().next();
    }

    Some(Error::Multiple(
        errors.into_iter().flat_map(Error::into_members).collect(),
    ))
}

/// Result type alias for Campus operations
pub type Result<T> = std::result::Result<T, Error>;
