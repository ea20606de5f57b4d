//! Result and error types for Palpar.

use thiserror::Error;

/// Result type for Palpar operations
pub type PalparResult<T> = Result<T, PalparError>;

/// Errors that can occur in Palpar.
///
/// These cover caller contract violations and infrastructure failures only.
/// A locator that matches nothing, or a driver that refuses an interaction,
/// is an expected outcome in UI testing and is reported through
/// [`crate::action::Outcome`] instead of this type.
#[derive(Debug, Error)]
pub enum PalparError {
    /// Locator strategy name outside the supported set
    #[error("Unsupported locator strategy '{name}'. Valid strategies: id, name, xpath, css, class, link, partlink, tag")]
    UnsupportedStrategy {
        /// The rejected strategy name
        name: String,
    },

    /// Operation name outside the closed verb vocabulary
    #[error("Unsupported operation '{operation}'. Valid operations: none, text, click, input, clear, clear_continue_input")]
    UnsupportedOperation {
        /// The rejected operation name
        operation: String,
    },

    /// Multi-match request without the required index
    #[error("Multi-match resolution for '{expression}' requires an index")]
    MissingIndex {
        /// Locator expression of the offending request
        expression: String,
    },

    /// Text-taking operation invoked without text
    #[error("Operation '{operation}' requires text")]
    MissingText {
        /// Operation name that needed text
        operation: String,
    },

    /// Requested match index beyond the match set length
    #[error("Index {index} out of range for '{expression}' ({len} matches)")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Size of the match set
        len: usize,
        /// Locator expression of the offending request
        expression: String,
    },

    /// Window index beyond the open window handles
    #[error("Window index {index} out of range ({count} windows)")]
    WindowOutOfRange {
        /// Requested window index
        index: usize,
        /// Number of open windows
        count: usize,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Error message
        message: String,
    },

    /// Screenshot could not be captured or stored
    #[error("Capture failed: {message}")]
    CaptureError {
        /// Error message
        message: String,
    },

    /// Native dialog automation failed
    #[error("Dialog automation failed: {message}")]
    DialogError {
        /// Error message
        message: String,
    },

    /// Driver session failure escaping a non-dispatch path (introspection,
    /// navigation). Action dispatch never surfaces this variant.
    #[error("driver error: {0}")]
    Driver(#[from] crate::driver::DriverError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
