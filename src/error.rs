//! Unified error types for chatdump.
//!
//! Every failure in an export run is reported through a single
//! [`ExportError`] enum. The pipeline is fail-fast: the first error aborts the
//! run and is propagated to the caller unchanged, and nothing is retried.
//!
//! # Error Kinds
//!
//! - **Authentication**: the login call returned a non-200 status
//! - **API**: any other API call returned a non-200 status
//! - **Download**: a CDN or attachment transfer returned a non-200 status
//! - **Transport**: the request never produced a status (DNS, TLS, timeout)
//! - **Io / Json**: local filesystem or serialization failures

use std::io;

use thiserror::Error;

/// A specialized [`Result`] type for chatdump operations.
///
/// # Example
///
/// ```rust
/// use chatdump::error::Result;
/// use chatdump::Message;
///
/// fn my_function() -> Result<Vec<Message>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ExportError>;

/// The error type for all chatdump operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    /// An I/O error occurred while writing the export tree.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing/serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Login was rejected by the service.
    ///
    /// Carries the status code and the raw response body.
    #[error("Login failed (status {status}): {body}")]
    Auth {
        /// HTTP status code returned by the login endpoint
        status: u16,
        /// Raw response body
        body: String,
    },

    /// An API call returned a non-200 status.
    ///
    /// All endpoints share this variant; callers do not distinguish further.
    #[error("Error while request\nstatus_code: {status}\n\n{body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// A media or attachment download returned a non-200 status.
    #[error("Downloading '{url}' failed (status {status})")]
    Download {
        /// The URL that was requested
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The request failed before a response was received.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A value that should be a snowflake id could not be parsed.
    #[error("Invalid snowflake '{input}'")]
    InvalidSnowflake {
        /// The rejected input
        input: String,
    },

    /// The channel link or id supplied by the user is unusable.
    #[error("Invalid channel '{input}': {message}")]
    InvalidChannel {
        /// The rejected input
        input: String,
        /// Description of what's wrong
        message: &'static str,
    },

    /// The chosen output directory already exists.
    #[error("Output directory '{0}' already exists")]
    OutputExists(std::path::PathBuf),
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for ExportError {
    fn from(err: reqwest::Error) -> Self {
        ExportError::Transport(err.to_string())
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ExportError {
    /// Creates an API error from a status code and raw body.
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        ExportError::Api {
            status,
            body: body.into(),
        }
    }

    /// Creates an authentication error.
    pub fn auth(status: u16, body: impl Into<String>) -> Self {
        ExportError::Auth {
            status,
            body: body.into(),
        }
    }

    /// Creates a download error.
    pub fn download(url: impl Into<String>, status: u16) -> Self {
        ExportError::Download {
            url: url.into(),
            status,
        }
    }

    /// Creates an invalid snowflake error.
    pub fn invalid_snowflake(input: impl Into<String>) -> Self {
        ExportError::InvalidSnowflake {
            input: input.into(),
        }
    }

    /// Creates an invalid channel error.
    pub fn invalid_channel(input: impl Into<String>, message: &'static str) -> Self {
        ExportError::InvalidChannel {
            input: input.into(),
            message,
        }
    }

    /// Returns the HTTP status code, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ExportError::Auth { status, .. }
            | ExportError::Api { status, .. }
            | ExportError::Download { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ExportError::Io(_))
    }

    /// Returns `true` if this is an authentication error.
    pub fn is_auth(&self) -> bool {
        matches!(self, ExportError::Auth { .. })
    }

    /// Returns `true` if this is an API error.
    pub fn is_api(&self) -> bool {
        matches!(self, ExportError::Api { .. })
    }

    /// Returns `true` if this is a download error.
    pub fn is_download(&self) -> bool {
        matches!(self, ExportError::Download { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
