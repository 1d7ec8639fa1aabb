//! Error types for the seport library.
//!
//! This module provides the error hierarchy for reconciliation
//! operations, using `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::port::PortSpecError;
use crate::store::StoreError;

/// Result type alias for operations that may fail with a seport error.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the seport library.
///
/// Validation failures are raised before the policy store is touched;
/// `StoreUnavailable` means the read-only listing failed, and
/// `StoreFailure` means the single mutating call failed for a reason
/// other than "already in the desired state" (which is folded into an
/// unchanged outcome, not an error).
#[derive(Debug, Error)]
pub enum Error {
    /// The port specification did not parse.
    #[error("invalid port specification: {0}")]
    InvalidPortSpec(#[from] PortSpecError),

    /// A field failed validation.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// The store's current bindings could not be read.
    #[error("failed to read current port bindings: {0}")]
    StoreUnavailable(#[source] StoreError),

    /// The store rejected the mutating call.
    #[error("{action} failed: {source}")]
    StoreFailure {
        /// A description of the rejected action.
        action: String,
        /// The underlying store error.
        #[source]
        source: StoreError,
    },

    /// A configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<crate::binding::ValidationError> for Error {
    fn from(err: crate::binding::ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl From<crate::binding::ProtocolParseError> for Error {
    fn from(err: crate::binding::ProtocolParseError) -> Self {
        Self::Validation {
            field: "proto".into(),
            message: err.to_string(),
        }
    }
}

impl Error {
    /// Check if this error is a validation failure (bad user input,
    /// caught before the store was touched).
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidPortSpec(_) | Self::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortRange;

    #[test]
    fn test_invalid_port_spec_display() {
        let err: Error = PortRange::parse("70000").unwrap_err().into();
        let display = format!("{err}");
        assert!(display.contains("invalid port specification"));
        assert!(display.contains("70000"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_validation_display() {
        let err = Error::Validation {
            field: "setype".to_string(),
            message: "must be non-empty".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("setype"));
        assert!(display.contains("must be non-empty"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_store_unavailable_display() {
        let err = Error::StoreUnavailable(StoreError::Backend {
            message: "could not establish semanage connection".into(),
        });
        let display = format!("{err}");
        assert!(display.contains("failed to read current port bindings"));
        assert!(display.contains("semanage connection"));
        assert!(!err.is_validation());
    }

    #[test]
    fn test_store_failure_display() {
        let err = Error::StoreFailure {
            action: "Add binding tcp/8888 -> http_port_t (mls range s0)".into(),
            source: StoreError::Backend {
                message: "OSError: read-only file system".into(),
            },
        };
        let display = format!("{err}");
        assert!(display.contains("tcp/8888"));
        assert!(display.contains("read-only file system"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(format!("{err}").contains("I/O error"));
    }

    #[test]
    fn test_protocol_error_conversion() {
        let err: Error = "icmp".parse::<crate::Protocol>().unwrap_err().into();
        assert!(matches!(err, Error::Validation { .. }));
        assert!(format!("{err}").contains("icmp"));
    }
}
