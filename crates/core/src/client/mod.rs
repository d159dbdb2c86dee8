//! Client wrapper for the hosted image conversion endpoint.
//!
//! One [`ImageConverterClient::execute`] call sends exactly one request and
//! settles with either an [`ImageConverterResponse`] or an
//! [`ImageConverterError`]. A callback flavour and a spawned-task flavour are
//! layered on the same dispatch.

mod types;
mod wrapper;

pub use types::{ConversionOptions, ConversionResult, ImageConverterResponse, Query};
pub use wrapper::ImageConverterClient;

use thiserror::Error;

use crate::config::ConfigError;
use crate::transport::TransportError;

/// Errors that can occur when constructing the client or executing a call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ImageConverterError {
    /// Missing or invalid configuration (e.g. empty API key).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network or connection failure.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The service answered but reported a failure.
    #[error("Service error: {message}")]
    Service { message: String, code: Option<i64> },

    /// The response body did not have the expected shape.
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl ImageConverterError {
    /// Service or HTTP status code, when one is known.
    pub fn code(&self) -> Option<i64> {
        match self {
            ImageConverterError::Service { code, .. } => *code,
            _ => None,
        }
    }

    /// Whether a later identical call might succeed.
    ///
    /// The client itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            ImageConverterError::Transport(_) => true,
            ImageConverterError::Service { code: Some(code), .. } => *code >= 500 || *code == 429,
            _ => false,
        }
    }
}

impl From<ConfigError> for ImageConverterError {
    fn from(e: ConfigError) -> Self {
        ImageConverterError::Configuration(e.to_string())
    }
}
