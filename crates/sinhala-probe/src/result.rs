//! Result and error types for sinhala-probe.

use thiserror::Error;

/// Result type for probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that can occur while driving the translator page
///
/// A missing label or marker is not an error: extraction reports it as an
/// empty string. Read faults surface here as [`ProbeError::Read`] and are
/// absorbed by the poller.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Browser executable not found
    #[error("Browser not found. Install Chromium or set CHROMIUM_PATH")]
    BrowserNotFound,

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// No element matched a selector
    #[error("No element matches {selector}")]
    ElementNotFound {
        /// Rendered selector
        selector: String,
    },

    /// Input simulation error (fill, clear, key press)
    #[error("Input simulation failed: {message}")]
    Input {
        /// Error message
        message: String,
    },

    /// Reading page text failed
    #[error("Failed to read page text: {message}")]
    Read {
        /// Error message
        message: String,
    },

    /// Wait interrupted or failed
    #[error("Wait failed: {message}")]
    Wait {
        /// Error message
        message: String,
    },

    /// Case catalog is malformed
    #[error("Catalog error: {message}")]
    Catalog {
        /// Error message
        message: String,
    },

    /// Configuration is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Operation requires the `browser` feature
    #[error("Browser feature not enabled. Rebuild with --features browser")]
    BrowserFeatureDisabled,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProbeError {
    /// Create a read error
    #[must_use]
    pub fn read(message: impl Into<String>) -> Self {
        Self::Read {
            message: message.into(),
        }
    }

    /// Create an input error
    #[must_use]
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a catalog error
    #[must_use]
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Whether the poller may treat this error as an empty attempt
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::ElementNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_display() {
        let err = ProbeError::read("node detached");
        assert_eq!(err.to_string(), "Failed to read page text: node detached");
    }

    #[test]
    fn test_navigation_error_display() {
        let err = ProbeError::Navigation {
            url: "https://example.com".to_string(),
            message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://example.com"));
        assert!(msg.contains("ERR_NAME_NOT_RESOLVED"));
    }

    #[test]
    fn test_transient_classification() {
        assert!(ProbeError::read("gone").is_transient());
        assert!(ProbeError::ElementNotFound {
            selector: "body".to_string()
        }
        .is_transient());
        assert!(!ProbeError::input("no focus").is_transient());
        assert!(!ProbeError::BrowserNotFound.is_transient());
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ProbeError = io_err.into();
        assert!(err.to_string().starts_with("I/O error"));
    }
}
