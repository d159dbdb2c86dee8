//! Testing utilities and mock implementations.
//!
//! This module provides a mock [`Transport`](crate::transport::Transport),
//! allowing the client to be exercised without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use imageconverter_core::testing::{fixtures, MockTransport};
//! use imageconverter_core::{ClientConfig, ImageConverterClient};
//!
//! let transport = MockTransport::new();
//! transport.push_body(200, fixtures::error_body("invalid url", 400));
//!
//! let client = ImageConverterClient::with_transport(
//!     ClientConfig::new("abc123"),
//!     Arc::new(transport.clone()),
//! )?;
//! ```

mod mock_transport;

pub use mock_transport::MockTransport;

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::json;

    use crate::client::ConversionResult;

    /// The conversion result returned by the default mock response.
    pub fn conversion_result() -> ConversionResult {
        ConversionResult {
            id: "1".to_string(),
            input_format: "png".to_string(),
            output_format: "webp".to_string(),
            input_size: 1000,
            output_size: 400,
            mime_type: "image/webp".to_string(),
            expires: 1_700_000_000,
            download_url: "http://cdn/1.webp".to_string(),
        }
    }

    /// A success body wrapping [`conversion_result`].
    pub fn success_body() -> String {
        success_body_for(&conversion_result())
    }

    /// A success body wrapping the given result.
    pub fn success_body_for(result: &ConversionResult) -> String {
        json!({
            "status": "ok",
            "error": null,
            "data": result,
        })
        .to_string()
    }

    /// A failure body as the service reports it.
    pub fn error_body(message: &str, code: i64) -> String {
        json!({
            "status": "error",
            "error": message,
            "code": code,
            "data": null,
        })
        .to_string()
    }
}
