//! Error types shared by every pathfs backend.
//!
//! A path that does not resolve is never an error for read operations; those
//! return `Ok(None)` or an empty listing. The variants here are hard failures
//! that the direct caller has to deal with.

use std::path::PathBuf;

use crate::path::PathError;

/// Errors raised by filesystem contracts, URL loading and encoding streams.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A directory/file kind expectation was violated.
    ///
    /// Raised when a walk has to descend through a file, or when a resource
    /// would be written over an existing directory.
    #[error("conflict at '{path}': {message}")]
    Conflict { path: String, message: String },

    /// A required argument was malformed. Checked before any traversal.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The requested operation or coder state is not supported.
    #[error("unsupported: {message}")]
    Unsupported { message: String },

    /// A URL could not be resolved to readable content.
    #[error("cannot resolve {url}: {message}")]
    Unresolved { url: String, message: String },

    /// The root directory of a native backend is unusable.
    #[error("invalid root path {}: {source}", path.display())]
    RootInvalid {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("path error: {0}")]
    Path(#[from] PathError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    pub fn conflict(path: impl ToString, message: impl Into<String>) -> Self {
        Error::Conflict {
            path: path.to_string(),
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Error::Unsupported {
            message: message.into(),
        }
    }

    pub fn unresolved(url: impl ToString, message: impl Into<String>) -> Self {
        Error::Unresolved {
            url: url.to_string(),
            message: message.into(),
        }
    }

    /// Check if this error is a kind conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict { .. })
    }

    /// Check if this error is a rejected argument.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument { .. } | Error::Path(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn conflict_display() {
        let e = Error::conflict("docs/a", "a file already exists");
        let display = format!("{}", e);
        assert!(display.contains("conflict"));
        assert!(display.contains("docs/a"));
        assert!(display.contains("a file already exists"));
        assert!(e.is_conflict());
    }

    #[test]
    fn invalid_argument_display() {
        let e = Error::invalid_argument("empty segment");
        assert_eq!(format!("{}", e), "invalid argument: empty segment");
        assert!(e.is_invalid_argument());
        assert!(!e.is_conflict());
    }

    #[test]
    fn unresolved_display() {
        let e = Error::unresolved("ram://x/missing", "no such file");
        let display = format!("{}", e);
        assert!(display.contains("ram://x/missing"));
        assert!(display.contains("no such file"));
    }

    #[test]
    fn path_error_converts_and_is_invalid_argument() {
        let e: Error = PathError::EmptyComponent { position: 1 }.into();
        assert!(matches!(e, Error::Path(_)));
        assert!(e.is_invalid_argument());
        assert!(StdError::source(&e).is_some());
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let e: Error = io_err.into();
        assert!(matches!(e, Error::Io(_)));
        assert!(format!("{}", e).contains("file not found"));
    }

    #[test]
    fn root_invalid_has_source() {
        let e = Error::RootInvalid {
            path: PathBuf::from("/nowhere"),
            source: std::io::Error::other("missing"),
        };
        assert!(format!("{}", e).contains("/nowhere"));
        assert!(StdError::source(&e).is_some());
    }
}
