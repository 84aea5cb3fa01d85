//! Error types for gateway operations.
//!
//! All errors implement the standard [`std::error::Error`] trait via
//! [`thiserror::Error`]. Transport and authenticity failures are reported to
//! the notification sink before they are surfaced; none of them is retried
//! automatically — a payment attempt is either fully authenticated end to end
//! or failed.

use thiserror::Error;

/// Result type alias for gateway operations.
///
/// All fallible functions in this crate return this type.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur while opening a payment or validating a callback.
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP-level failure while processing an obtained response.
    ///
    /// The request reached the gateway and a response arrived, but reading it
    /// failed (connection reset mid-body, decoding error, etc.).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request failed before any response was obtained.
    ///
    /// Connection refused, DNS failure, TLS handshake failure, or a timeout
    /// while waiting for the first byte. Fatal for the attempt: there is no
    /// status, no headers, and no body to inspect.
    #[error("no response obtained from gateway")]
    MissingResponse(#[source] reqwest::Error),

    /// The gateway answered with a non-2xx status.
    ///
    /// The response body is carried verbatim for diagnostics; it has NOT been
    /// signature-verified and must not be trusted beyond logging.
    #[error("gateway returned status {status}")]
    UnexpectedStatus {
        /// HTTP status code of the error response.
        status: u16,
        /// Raw response body, for diagnostics only.
        body: String,
    },

    /// The response or callback HMAC does not verify.
    ///
    /// Covers a wrong digest and a missing `signature` header alike: a
    /// message that cannot be verified is never trusted. The body of such a
    /// response is never parsed or returned.
    #[error("response signature mismatch")]
    SignatureMismatch,

    /// The gateway returned a verified 2xx response whose body is not valid
    /// JSON.
    #[error("invalid gateway response: {0}")]
    InvalidResponse(String),

    /// Rejected client configuration.
    ///
    /// Raised at construction time, before any network activity: malformed or
    /// non-HTTPS server URL, out-of-bounds timeouts.
    #[error("invalid gateway configuration: {0}")]
    Config(String),
}
