//! Error handling for domain checking operations.
//!
//! WHOIS transport failures are deliberately *not* represented here as hard
//! errors on the checking path: they are folded into a
//! [`WhoisOutcome::QueryFailure`](crate::WhoisOutcome) and classified. This
//! type covers everything else: bad input, bad configuration, and faults
//! reported back through the tool surface.

use std::fmt;
use std::time::Duration;

/// Main error type for domain checking operations.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainCheckError {
    /// Domain string is not of the form `name.suffix`
    InvalidDomain { domain: String, reason: String },

    /// A tool operation was invoked with missing or ill-typed arguments
    InvalidArguments { operation: String, message: String },

    /// A tool operation name that the surface does not know
    UnknownOperation { name: String },

    /// WHOIS protocol specific errors (connection refused, empty response, ...)
    WhoisError { domain: String, message: String },

    /// Timeout errors when a lookup takes too long
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// JSON/TOML parsing errors
    ParseError { message: String },

    /// Configuration errors (invalid settings, etc.)
    ConfigError { message: String },

    /// File I/O errors when reading config or domain lists
    FileError { path: String, message: String },

    /// Generic internal errors that don't fit other categories
    Internal { message: String },
}

impl DomainCheckError {
    /// Create a new invalid domain error.
    pub fn invalid_domain<D: Into<String>, R: Into<String>>(domain: D, reason: R) -> Self {
        Self::InvalidDomain {
            domain: domain.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid arguments error for a tool operation.
    pub fn invalid_arguments<O: Into<String>, M: Into<String>>(operation: O, message: M) -> Self {
        Self::InvalidArguments {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a new unknown operation error.
    pub fn unknown_operation<N: Into<String>>(name: N) -> Self {
        Self::UnknownOperation { name: name.into() }
    }

    /// Create a new WHOIS error.
    pub fn whois<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self::WhoisError {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the caller supplied bad input (as opposed to a server-side fault).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDomain { .. } | Self::InvalidArguments { .. } | Self::UnknownOperation { .. }
        )
    }

    /// The tool operation this error belongs to, when known.
    pub fn operation(&self) -> Option<&str> {
        match self {
            Self::InvalidArguments { operation, .. } => Some(operation),
            Self::UnknownOperation { name } => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for DomainCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDomain { domain, reason } => {
                write!(f, "Invalid domain '{}': {}", domain, reason)
            }
            Self::InvalidArguments { operation, message } => {
                write!(f, "Invalid arguments for '{}': {}", operation, message)
            }
            Self::UnknownOperation { name } => write!(f, "Unknown tool: {}", name),
            Self::WhoisError { domain, message } => {
                write!(f, "WHOIS error for '{}': {}", domain, message)
            }
            Self::Timeout {
                operation,
                duration,
            } => {
                write!(f, "{} timeout after {:?}", operation, duration)
            }
            Self::ParseError { message } => write!(f, "Parse error: {}", message),
            Self::ConfigError { message } => write!(f, "Configuration error: {}", message),
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::Internal { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for DomainCheckError {}

impl From<serde_json::Error> for DomainCheckError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError {
            message: format!("JSON parsing failed: {}", err),
        }
    }
}

impl From<toml::de::Error> for DomainCheckError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError {
            message: format!("Failed to parse TOML configuration: {}", err),
        }
    }
}
