//! Protocol error taxonomy and the wire `errorKind` vocabulary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The three capability kinds a registry can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityKind {
    /// An invocable action.
    Action,
    /// A read-only addressable resource.
    Resource,
    /// A reusable prompt template.
    Prompt,
}

impl std::fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CapabilityKind::Action => write!(f, "action"),
            CapabilityKind::Resource => write!(f, "resource"),
            CapabilityKind::Prompt => write!(f, "prompt"),
        }
    }
}

/// Stable error category carried as `errorKind` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Registration-time duplicate; fatal to startup.
    DuplicateIdentifier,
    /// Lookup miss for a registered prompt or action.
    NotFound,
    /// A call-action request named an unregistered action.
    UnknownAction,
    /// No resource template matched the requested URI.
    ResourceNotFound,
    /// Argument mapping failed schema validation.
    InvalidArguments,
    /// A handler failed while executing.
    HandlerError,
    /// Connection-level failure.
    TransportError,
    /// The per-call deadline elapsed.
    Timeout,
}

impl ErrorKind {
    /// The wire string for this kind, identical to its serde form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::DuplicateIdentifier => "duplicate_identifier",
            ErrorKind::NotFound => "not_found",
            ErrorKind::UnknownAction => "unknown_action",
            ErrorKind::ResourceNotFound => "resource_not_found",
            ErrorKind::InvalidArguments => "invalid_arguments",
            ErrorKind::HandlerError => "handler_error",
            ErrorKind::TransportError => "transport_error",
            ErrorKind::Timeout => "timeout",
        }
    }
}

/// Any failure produced by registration, dispatch, or transport.
///
/// Every variant carries its complete message so a failure envelope
/// round-trips verbatim: the client rebuilds the same variant from the wire
/// `errorKind` without re-deriving text.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    DuplicateIdentifier(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    UnknownAction(String),
    #[error("{0}")]
    ResourceNotFound(String),
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Handler(String),
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Timeout(String),
}

/// Result alias used throughout the protocol layer.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn duplicate_identifier(kind: CapabilityKind, id: &str) -> Self {
        Error::DuplicateIdentifier(format!("duplicate {kind} identifier '{id}'"))
    }

    pub fn not_found(kind: CapabilityKind, id: &str) -> Self {
        Error::NotFound(format!("no {kind} registered as '{id}'"))
    }

    pub fn unknown_action(id: &str) -> Self {
        Error::UnknownAction(format!("unknown action '{id}'"))
    }

    pub fn resource_not_found(uri: &str) -> Self {
        Error::ResourceNotFound(format!("no resource matches '{uri}'"))
    }

    pub fn invalid_arguments(detail: impl Into<String>) -> Self {
        Error::InvalidArguments(detail.into())
    }

    pub fn handler(detail: impl Into<String>) -> Self {
        Error::Handler(detail.into())
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        Error::Transport(detail.into())
    }

    pub fn timeout(detail: impl Into<String>) -> Self {
        Error::Timeout(detail.into())
    }

    /// The wire category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DuplicateIdentifier(_) => ErrorKind::DuplicateIdentifier,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::UnknownAction(_) => ErrorKind::UnknownAction,
            Error::ResourceNotFound(_) => ErrorKind::ResourceNotFound,
            Error::InvalidArguments(_) => ErrorKind::InvalidArguments,
            Error::Handler(_) => ErrorKind::HandlerError,
            Error::Transport(_) => ErrorKind::TransportError,
            Error::Timeout(_) => ErrorKind::Timeout,
        }
    }

    /// Rebuild an error from a received failure envelope (client side).
    pub fn from_wire(kind: ErrorKind, message: String) -> Self {
        match kind {
            ErrorKind::DuplicateIdentifier => Error::DuplicateIdentifier(message),
            ErrorKind::NotFound => Error::NotFound(message),
            ErrorKind::UnknownAction => Error::UnknownAction(message),
            ErrorKind::ResourceNotFound => Error::ResourceNotFound(message),
            ErrorKind::InvalidArguments => Error::InvalidArguments(message),
            ErrorKind::HandlerError => Error::Handler(message),
            ErrorKind::TransportError => Error::Transport(message),
            ErrorKind::Timeout => Error::Timeout(message),
        }
    }
}
