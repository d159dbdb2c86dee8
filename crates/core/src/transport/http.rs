//! reqwest-backed transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::{ApiRequest, Transport, TransportError, TransportResponse, API_KEY_HEADER};
use crate::client::Query;
use crate::config::{ClientConfig, RequestMethod};

const DEFAULT_USER_AGENT: &str = concat!("imageconverter-rs/", env!("CARGO_PKG_VERSION"));

/// Transport that talks to the service over reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport using the timeout and user agent from `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }

    /// Wrap an existing reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<TransportResponse, TransportError> {
        let builder = match request.method {
            RequestMethod::Get => self
                .client
                .get(&request.url)
                .query(&query_pairs(&request.query)),
            RequestMethod::Post => self.client.post(&request.url).json(&request.query),
        };

        let response = builder
            .header(API_KEY_HEADER, &request.api_key)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(status = status, bytes = body.len(), "Received response");

        Ok(TransportResponse { status, body })
    }
}

/// Flatten a query into URL parameters.
///
/// Strings are sent verbatim, null as an empty value, everything else as its
/// JSON text.
fn query_pairs(query: &Query) -> Vec<(String, String)> {
    query
        .iter()
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (key.clone(), rendered)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_pairs_rendering() {
        let query = Query::new()
            .with("url", "http://x/image.png")
            .with("width", 640)
            .with("lossless", true)
            .with("crop", json!([0, 0, 10, 10]))
            .with("note", Value::Null);

        let pairs = query_pairs(&query);
        let lookup = |k: &str| {
            pairs
                .iter()
                .find(|(key, _)| key == k)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(pairs.len(), 5);
        assert_eq!(lookup("url"), Some("http://x/image.png"));
        assert_eq!(lookup("width"), Some("640"));
        assert_eq!(lookup("lossless"), Some("true"));
        assert_eq!(lookup("crop"), Some("[0,0,10,10]"));
        assert_eq!(lookup("note"), Some(""));
    }

    #[test]
    fn test_empty_query_has_no_pairs() {
        assert!(query_pairs(&Query::new()).is_empty());
    }

    #[test]
    fn test_new_transport_from_config() {
        let config = ClientConfig::new("abc123").with_user_agent("custom-agent/1.0");
        assert!(ReqwestTransport::new(&config).is_ok());
    }
}
