//! HTTP transport seam for the client wrapper.
//!
//! The client builds one [`ApiRequest`] per call and hands it to a
//! [`Transport`]. The default implementation is [`ReqwestTransport`]; tests
//! inject [`crate::testing::MockTransport`].

mod http;

pub use http::ReqwestTransport;

use async_trait::async_trait;
use thiserror::Error;

use crate::client::Query;
use crate::config::RequestMethod;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Errors raised before a response body is available.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request timed out.
    #[error("Request timed out")]
    Timeout,

    /// Could not connect to the service.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Any other failure while building, sending or reading the request.
    #[error("Request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connection(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

/// A single outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: RequestMethod,
    pub url: String,
    pub api_key: String,
    pub query: Query,
}

/// Raw HTTP outcome: status code and unparsed body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns the raw response.
///
/// Implementations must perform exactly one HTTP exchange per call and must
/// not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<TransportResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_response_success_range() {
        assert!(TransportResponse::new(200, "").is_success());
        assert!(TransportResponse::new(204, "").is_success());
        assert!(!TransportResponse::new(302, "").is_success());
        assert!(!TransportResponse::new(400, "").is_success());
        assert!(!TransportResponse::new(503, "").is_success());
    }
}
