//! Application error types with rich context

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Terminal/TUI Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Terminal error: {message}")]
    Terminal { message: String },

    // ─────────────────────────────────────────────────────────────
    // Component Assembly Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Missing dependency '{key}' (required by '{required_by}')")]
    MissingDependency { key: String, required_by: String },

    #[error("Dependency cycle detected while resolving '{key}': {chain}")]
    DependencyCycle { key: String, chain: String },

    #[error("'{key}' is not a {expected}")]
    WrongKind { key: String, expected: &'static str },

    // ─────────────────────────────────────────────────────────────
    // Remote API Errors
    // ─────────────────────────────────────────────────────────────
    #[error("HTTP request failed: {message}")]
    Http { message: String },

    #[error("Shlink API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Identity endpoint error: {message}")]
    Identity { message: String },

    // ─────────────────────────────────────────────────────────────
    // Server Management Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid server: {message}")]
    InvalidServer { message: String },

    #[error("Invalid short URL: {message}")]
    InvalidShortUrl { message: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn terminal(message: impl Into<String>) -> Self {
        Self::Terminal {
            message: message.into(),
        }
    }

    pub fn missing_dependency(key: impl Into<String>, required_by: impl Into<String>) -> Self {
        Self::MissingDependency {
            key: key.into(),
            required_by: required_by.into(),
        }
    }

    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
        }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn identity(message: impl Into<String>) -> Self {
        Self::Identity {
            message: message.into(),
        }
    }

    pub fn invalid_server(message: impl Into<String>) -> Self {
        Self::InvalidServer {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn invalid_short_url(message: impl Into<String>) -> Self {
        Self::InvalidShortUrl {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Http { .. }
                | Error::Api { .. }
                | Error::Identity { .. }
                | Error::Json(_)
                | Error::InvalidServer { .. }
                | Error::InvalidShortUrl { .. }
        )
    }

    /// Check if this error should trigger application exit
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::MissingDependency { .. }
                | Error::DependencyCycle { .. }
                | Error::WrongKind { .. }
        )
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::invalid_server(format!("invalid URL: {err}"))
    }
}

/// Log a failed result with what was being attempted, keeping the error
pub trait ResultExt<T> {
    fn context(self, doing: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, doing: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {}", doing, err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::missing_dependency("ServersDropdown", "MainHeader");
        assert_eq!(
            err.to_string(),
            "Missing dependency 'ServersDropdown' (required by 'MainHeader')"
        );

        let err = Error::api(404, "Not found");
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_url_parse() {
        let err: Error = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, Error::InvalidServer { .. }));
    }

    #[test]
    fn test_assembly_errors_are_fatal() {
        assert!(Error::missing_dependency("a", "b").is_fatal());
        assert!(Error::DependencyCycle {
            key: "a".to_string(),
            chain: "a -> b -> a".to_string()
        }
        .is_fatal());
        assert!(!Error::http("timeout").is_fatal());
    }

    #[test]
    fn test_network_errors_are_recoverable() {
        assert!(Error::http("connection refused").is_recoverable());
        assert!(Error::api(500, "boom").is_recoverable());
        assert!(Error::identity("no email").is_recoverable());
        assert!(!Error::missing_dependency("a", "b").is_recoverable());
    }

    #[test]
    fn test_context_preserves_error() {
        let res: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = res.context("writing servers").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
