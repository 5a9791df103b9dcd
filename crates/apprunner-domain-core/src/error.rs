//! Error types for custom domain association management
//!
//! This module defines all error types used throughout the crate.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for custom domain association operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error code the App Runner API returns when a service or association is missing
pub const RESOURCE_NOT_FOUND_EXCEPTION: &str = "ResourceNotFoundException";

/// Core error type for custom domain association management
#[derive(Error, Debug)]
pub enum Error {
    /// The association (or its parent service) does not exist
    #[error("couldn't find resource: {0}")]
    NotFound(String),

    /// A resource identifier that can't be split into its two parts
    #[error("unexpected format of ID ({id}), expected domain_name{separator}service_arn")]
    MalformedIdentifier {
        /// The offending identifier
        id: String,
        /// The expected separator
        separator: char,
    },

    /// More than one remote record matched a key that must be unique
    #[error("too many results: wanted 1, got {count}")]
    MultipleResults {
        /// Number of matching records
        count: usize,
    },

    /// A wait did not reach its target state in time
    #[error(
        "timeout while waiting for state to become '{}' (last state: '{last_state}', timeout: {timeout:?})",
        .expected.join(", ")
    )]
    Timeout {
        /// States that would have finished the wait
        expected: Vec<String>,
        /// Last state observed before the deadline
        last_state: String,
        /// The configured timeout
        timeout: Duration,
    },

    /// A wait observed a state that is neither pending nor a target
    #[error("unexpected state '{state}', wanted target '{}'", .expected.join(", "))]
    UnexpectedState {
        /// The observed state
        state: String,
        /// States that would have finished the wait
        expected: Vec<String>,
    },

    /// An error reported by the remote API, kept verbatim
    #[error("{code}: {message}")]
    Api {
        /// Remote error code (e.g. "ResourceNotFoundException")
        code: String,
        /// Remote error message
        message: String,
    },

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// Schema validation errors on user-supplied attributes
    #[error("Invalid attribute {attribute}: {message}")]
    Validation {
        /// Attribute name
        attribute: String,
        /// What is wrong with it
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API client errors that are not remote error responses
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Client name
        provider: String,
        /// Error message
        message: String,
    },

    /// An error annotated with the lifecycle action and resource it happened in
    #[error("{action}: {source}")]
    Resource {
        /// Action description, including the resource identifier
        action: String,
        /// Underlying cause
        #[source]
        source: Box<Error>,
    },

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a malformed identifier error
    pub fn malformed_identifier(id: impl Into<String>, separator: char) -> Self {
        Self::MalformedIdentifier {
            id: id.into(),
            separator,
        }
    }

    /// Create a remote API error
    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a validation error
    pub fn validation(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Wrap an error with the lifecycle action that produced it
    ///
    /// `action` should already name the resource, e.g.
    /// `"creating App Runner Custom Domain Association (example.com,arn:...)"`.
    pub fn context(action: impl Into<String>, source: Error) -> Self {
        Self::Resource {
            action: action.into(),
            source: Box::new(source),
        }
    }

    /// The underlying error below any [`Error::Resource`] wrappers
    pub fn root(&self) -> &Error {
        match self {
            Self::Resource { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether this is a local "not found" condition
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Self::NotFound(_))
    }

    /// Whether the remote API reported `ResourceNotFoundException`
    pub fn is_resource_not_found(&self) -> bool {
        matches!(self.root(), Self::Api { code, .. } if code == RESOURCE_NOT_FOUND_EXCEPTION)
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
