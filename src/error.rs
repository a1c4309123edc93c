use std::fmt;

use thiserror::Error;

/// Every way an evaluation can end in a deny.
///
/// The `Display` output is the internal diagnostic written to logs. The
/// public, caller-visible diagnostic is [`GateError::reason`], which is fixed
/// per kind and never carries request data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// The request description, or its header collection, is missing.
    #[error("malformed request: {0}")]
    MalformedInput(String),
    /// The expected secret is unset or empty.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The secret header is absent or has an empty value.
    #[error("missing edge secret header")]
    MissingCredential,
    /// The secret header is present but does not match.
    #[error("edge secret header does not match")]
    InvalidCredential,
    /// Anything unexpected while evaluating, including contained panics.
    #[error("unexpected authorizer fault: {0}")]
    InternalFault(String),
}

impl GateError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GateError::MalformedInput(_) => ErrorKind::MalformedInput,
            GateError::Configuration(_) => ErrorKind::ConfigurationError,
            GateError::MissingCredential => ErrorKind::MissingCredential,
            GateError::InvalidCredential => ErrorKind::InvalidCredential,
            GateError::InternalFault(_) => ErrorKind::InternalFault,
        }
    }

    /// Returns the diagnostic reported back to the enforcing platform.
    pub fn reason(&self) -> &'static str {
        self.kind().reason()
    }
}

/// Category of a deny, independent of any detail message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Request description missing or unreadable
    MalformedInput,
    /// Expected secret unset or empty
    ConfigurationError,
    /// Secret header absent or empty
    MissingCredential,
    /// Secret header mismatched
    InvalidCredential,
    /// Unexpected fault during evaluation
    InternalFault,
}

impl ErrorKind {
    /// Fixed diagnostic string for this kind.
    pub fn reason(self) -> &'static str {
        match self {
            ErrorKind::MalformedInput => "Malformed request",
            ErrorKind::ConfigurationError => "Configuration error",
            ErrorKind::MissingCredential => "Missing authorization header",
            ErrorKind::InvalidCredential => "Invalid authorization",
            ErrorKind::InternalFault => "Authorization error",
        }
    }

    /// Log severity used when a deny of this kind is recorded.
    pub fn severity(self) -> tracing::Level {
        match self {
            ErrorKind::MalformedInput
            | ErrorKind::ConfigurationError
            | ErrorKind::InternalFault => tracing::Level::ERROR,
            ErrorKind::MissingCredential => tracing::Level::INFO,
            ErrorKind::InvalidCredential => tracing::Level::WARN,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MalformedInput => write!(f, "malformed_input"),
            ErrorKind::ConfigurationError => write!(f, "configuration_error"),
            ErrorKind::MissingCredential => write!(f, "missing_credential"),
            ErrorKind::InvalidCredential => write!(f, "invalid_credential"),
            ErrorKind::InternalFault => write!(f, "internal_fault"),
        }
    }
}
