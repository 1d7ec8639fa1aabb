//! CLI-specific error types with exit codes.
//!
//! This module defines error types specific to the CLI layer,
//! wrapping library errors and providing appropriate exit codes.

use seport::Error as LibError;
use std::fmt;

/// CLI-specific error type with exit code mapping.
///
/// Invalid argument values are mostly rejected by clap before a command
/// runs; port specs and type labels are validated by the library, and
/// those failures map to the invalid-arguments exit code here.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// I/O error.
    Io(std::io::Error),

    /// SELinux is disabled on this host.
    SelinuxDisabled,

    /// Configuration error.
    Config(String),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 3: SELinux disabled on this host
    /// - 4: Invalid arguments (library validation failures)
    /// - 5: I/O error
    /// - 6: Other library error
    /// - 7: Configuration error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Library(lib_err) => {
                if lib_err.is_validation() {
                    4
                } else {
                    6
                }
            }
            CliError::SelinuxDisabled => 3,
            CliError::Io(_) => 5,
            CliError::Config(_) => 7,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::SelinuxDisabled => {
                write!(f, "SELinux is disabled; port bindings cannot be managed")
            }
            CliError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        CliError::Library(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::SelinuxDisabled.exit_code(), 3);
        assert_eq!(
            CliError::Io(std::io::Error::new(std::io::ErrorKind::Other, "io")).exit_code(),
            5
        );
        assert_eq!(CliError::Config("bad".into()).exit_code(), 7);
    }

    #[test]
    fn test_validation_errors_map_to_invalid_arguments_code() {
        let lib_err = seport::Error::Validation {
            field: "setype".into(),
            message: "must be non-empty".into(),
        };
        assert_eq!(CliError::Library(lib_err).exit_code(), 4);
    }

    #[test]
    fn test_store_errors_map_to_library_code() {
        let lib_err = seport::Error::StoreUnavailable(seport::StoreError::Backend {
            message: "could not establish semanage connection".into(),
        });
        assert_eq!(CliError::Library(lib_err).exit_code(), 6);
    }
}
