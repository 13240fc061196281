//! Error types for the shopping-list client.
//!
//! This module defines the centralized error type [`ShoplistError`] and a type alias
//! [`Result`] used throughout the crate. Every variant renders a message that can be
//! shown to the user as-is, so calling flows only need `to_string()` to surface it.

use thiserror::Error;

/// Fallback message when a failed response carries no usable error text.
pub const GENERIC_MESSAGE: &str = "An error occurred.";

/// Fallback message for a 404 whose body could not be parsed.
pub const NOT_FOUND_MESSAGE: &str = "Resource not found.";

/// Fallback message for a 400 whose body could not be parsed.
pub const INVALID_REQUEST_MESSAGE: &str = "Invalid request.";

/// Fallback message for a 5xx whose body could not be parsed.
pub const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again later.";

/// The main error type for client operations.
///
/// The first five variants form the user-facing taxonomy: transport outcomes
/// (`Timeout`, `Network`), the terminal session outcome (`Unauthenticated`),
/// server-reported failures (`Http`) and client-side form checks (`Validation`).
/// The remaining variants cover the ambient concerns (decoding, configuration,
/// credential storage, I/O).
///
/// # Examples
///
/// ```
/// use shoplist::ShoplistError;
///
/// let err = ShoplistError::validation("quantity", "Quantity must be a positive number");
/// assert_eq!(err.to_string(), "Quantity must be a positive number");
/// ```
#[derive(Debug, Error)]
pub enum ShoplistError {
    /// The request did not complete within the configured timeout.
    #[error("The request timed out. Please try again.")]
    Timeout,

    /// The request failed below HTTP (DNS, connection reset, TLS, ...).
    ///
    /// The string keeps the transport's own description for logs; the
    /// displayed message stays generic.
    #[error("Network error. Please check your connection.")]
    Network(String),

    /// The session is gone and could not be refreshed.
    ///
    /// Always raised together with a login redirect. Callers must not try to
    /// redirect again.
    #[error("Not authenticated")]
    Unauthenticated,

    /// The server answered with a failure status.
    ///
    /// `message` is the server's `{error}` text, or a status-based fallback.
    #[error("{message}")]
    Http {
        /// HTTP status code of the failed response.
        status: u16,
        /// User-displayable message.
        message: String,
    },

    /// A form value failed client-side validation.
    #[error("{message}")]
    Validation {
        /// Name of the offending field.
        field: String,
        /// User-displayable message.
        message: String,
    },

    /// A success response carried a body that does not match the expected shape.
    #[error("Unexpected response from server: {0}")]
    Decode(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential storage failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShoplistError {
    /// Builds a [`ShoplistError::Validation`] for the given field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Message used when a failed response body could not be parsed.
///
/// # Examples
///
/// ```
/// use shoplist::domain::error::status_fallback_message;
///
/// assert_eq!(status_fallback_message(404), "Resource not found.");
/// assert_eq!(status_fallback_message(503), "Server error. Please try again later.");
/// assert_eq!(status_fallback_message(418), "An error occurred.");
/// ```
#[must_use]
pub const fn status_fallback_message(status: u16) -> &'static str {
    match status {
        404 => NOT_FOUND_MESSAGE,
        400 => INVALID_REQUEST_MESSAGE,
        s if s >= 500 => SERVER_ERROR_MESSAGE,
        _ => GENERIC_MESSAGE,
    }
}

/// A specialized `Result` type for client operations.
pub type Result<T> = std::result::Result<T, ShoplistError>;
