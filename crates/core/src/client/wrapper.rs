use std::fmt;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::types::{ConversionResult, ImageConverterResponse, Query, RawResponse};
use super::ImageConverterError;
use crate::config::{validate_client_config, ClientConfig};
use crate::transport::{ApiRequest, ReqwestTransport, Transport, TransportResponse};

/// Longest slice of a non-JSON error body carried into an error message.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Client for the image conversion endpoint.
///
/// Holds only immutable configuration and a shared transport, so clones are
/// cheap and concurrent calls are independent.
#[derive(Clone)]
pub struct ImageConverterClient {
    config: Arc<ClientConfig>,
    endpoint: String,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for ImageConverterClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageConverterClient")
            .field("endpoint", &self.endpoint)
            .field("method", &self.config.method)
            .field("api_key", &"***")
            .finish()
    }
}

impl ImageConverterClient {
    /// Create a client backed by reqwest.
    ///
    /// Fails with [`ImageConverterError::Configuration`] when the API key is
    /// empty or the rest of the config is invalid. No request is made.
    pub fn new(config: ClientConfig) -> Result<Self, ImageConverterError> {
        check_config(&config)?;

        let transport = ReqwestTransport::new(&config).map_err(|e| {
            ImageConverterError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self::build(config, Arc::new(transport)))
    }

    /// Create a client with a caller-provided transport.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ImageConverterError> {
        check_config(&config)?;
        Ok(Self::build(config, transport))
    }

    fn build(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let endpoint = config.endpoint();
        Self {
            config: Arc::new(config),
            endpoint,
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolved endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run one conversion request.
    ///
    /// `None` sends an empty query.
    pub async fn execute(
        &self,
        query: Option<Query>,
    ) -> Result<ImageConverterResponse, ImageConverterError> {
        self.dispatch(query.unwrap_or_default()).await
    }

    /// Run one conversion request and report the outcome to `callback`.
    ///
    /// The callback is invoked exactly once, with either the response or the
    /// error, before the same outcome is returned.
    pub async fn execute_with_callback<F>(
        &self,
        query: Option<Query>,
        callback: F,
    ) -> Result<ImageConverterResponse, ImageConverterError>
    where
        F: FnOnce(Result<&ImageConverterResponse, &ImageConverterError>) + Send,
    {
        let result = self.dispatch(query.unwrap_or_default()).await;
        callback(result.as_ref());
        result
    }

    /// Run one conversion request on a spawned task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_execute(
        &self,
        query: Option<Query>,
    ) -> JoinHandle<Result<ImageConverterResponse, ImageConverterError>> {
        let client = self.clone();
        tokio::spawn(async move { client.execute(query).await })
    }

    async fn dispatch(&self, query: Query) -> Result<ImageConverterResponse, ImageConverterError> {
        debug!(
            endpoint = %self.endpoint,
            method = self.config.method.as_str(),
            params = query.len(),
            "Sending image conversion request"
        );

        let request = ApiRequest {
            method: self.config.method,
            url: self.endpoint.clone(),
            api_key: self.config.api_key.clone(),
            query,
        };

        let response = self.transport.send(request).await.map_err(|e| {
            warn!(error = %e, "Image conversion request failed");
            ImageConverterError::from(e)
        })?;

        let result = classify_response(response);
        match &result {
            Ok(response) => debug!(
                id = %response.data.id,
                output_format = %response.data.output_format,
                "Image conversion succeeded"
            ),
            Err(e) => warn!(error = %e, code = ?e.code(), "Image conversion rejected"),
        }
        result
    }
}

fn check_config(config: &ClientConfig) -> Result<(), ImageConverterError> {
    if config.api_key.trim().is_empty() {
        return Err(ImageConverterError::Configuration(
            "API key is required".to_string(),
        ));
    }
    validate_client_config(config)?;
    Ok(())
}

/// Turn a raw HTTP outcome into a response or a single identifiable error.
fn classify_response(
    response: TransportResponse,
) -> Result<ImageConverterResponse, ImageConverterError> {
    let http_ok = response.is_success();

    let raw: RawResponse = match serde_json::from_str(&response.body) {
        Ok(raw) => raw,
        Err(_) if !http_ok => {
            let snippet: String = response.body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            let message = if snippet.trim().is_empty() {
                format!("HTTP {}", response.status)
            } else {
                format!("HTTP {}: {}", response.status, snippet.trim())
            };
            return Err(ImageConverterError::Service {
                message,
                code: Some(i64::from(response.status)),
            });
        }
        Err(e) => {
            return Err(ImageConverterError::Parse(format!(
                "Invalid response body: {}",
                e
            )))
        }
    };

    let Some(status) = raw.status.clone() else {
        if !http_ok {
            return Err(service_error(raw, response.status));
        }
        return Err(ImageConverterError::Parse(
            "Response is missing 'status'".to_string(),
        ));
    };

    if !http_ok || !raw.is_success_status() {
        return Err(service_error(raw, response.status));
    }

    let error = raw.error_message();
    let code = raw.code();

    let data = raw
        .data
        .ok_or_else(|| ImageConverterError::Parse("Response is missing 'data'".to_string()))?;
    let data: ConversionResult = serde_json::from_value(data)
        .map_err(|e| ImageConverterError::Parse(format!("Invalid 'data' payload: {}", e)))?;

    Ok(ImageConverterResponse {
        status,
        error,
        code,
        data,
    })
}

fn service_error(raw: RawResponse, http_status: u16) -> ImageConverterError {
    let http_ok = (200..300).contains(&http_status);

    let message = raw.error_message().unwrap_or_else(|| match raw.status.as_deref() {
        Some(status) if !http_ok => format!("HTTP {} (status '{}')", http_status, status),
        Some(status) => format!("Service reported status '{}'", status),
        None => format!("HTTP {}", http_status),
    });

    let code = raw.code().or(if http_ok {
        None
    } else {
        Some(i64::from(http_status))
    });

    ImageConverterError::Service { message, code }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RequestMethod;
    use crate::testing::{fixtures, MockTransport};
    use crate::transport::TransportError;
    use serde_json::json;
    use std::sync::Mutex;

    fn client_with(transport: &MockTransport) -> ImageConverterClient {
        ImageConverterClient::with_transport(
            ClientConfig::new("abc123"),
            Arc::new(transport.clone()),
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_empty_key() {
        let result = ImageConverterClient::new(ClientConfig::new(""));
        assert!(matches!(result, Err(ImageConverterError::Configuration(_))));

        let result = ImageConverterClient::new(ClientConfig::new("   "));
        assert!(matches!(result, Err(ImageConverterError::Configuration(_))));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = ImageConverterClient::new(ClientConfig::new("abc123").with_timeout(0));
        assert!(matches!(result, Err(ImageConverterError::Configuration(_))));
    }

    #[test]
    fn test_new_accepts_valid_key() {
        let client = ImageConverterClient::new(ClientConfig::new("abc123")).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://api.apiverve.com/v1/imageconverter"
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let transport = MockTransport::new();
        let client = client_with(&transport);
        let debug = format!("{:?}", client);
        assert!(!debug.contains("abc123"));
    }

    #[tokio::test]
    async fn test_execute_sends_one_request_with_credentials() {
        let transport = MockTransport::new();
        let client = ImageConverterClient::with_transport(
            ClientConfig::new("abc123")
                .with_secure(false)
                .with_method(RequestMethod::Get),
            Arc::new(transport.clone()),
        )
        .unwrap();

        let query = Query::new().with("url", "http://x/image.png");
        client.execute(Some(query.clone())).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].api_key, "abc123");
        assert_eq!(requests[0].method, RequestMethod::Get);
        assert_eq!(requests[0].url, "http://api.apiverve.com/v1/imageconverter");
        assert_eq!(requests[0].query, query);
    }

    #[tokio::test]
    async fn test_execute_without_query_sends_empty_query() {
        let transport = MockTransport::new();
        let client = client_with(&transport);

        client.execute(None).await.unwrap();
        client.execute(Some(Query::new())).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].query.is_empty());
        assert_eq!(requests[0], requests[1]);
    }

    #[tokio::test]
    async fn test_callback_invoked_once_on_success() {
        let transport = MockTransport::new();
        let client = client_with(&transport);

        let calls = Mutex::new(Vec::new());
        let result = client
            .execute_with_callback(None, |outcome| {
                calls.lock().unwrap().push(outcome.is_ok());
            })
            .await;

        assert!(result.is_ok());
        assert_eq!(*calls.lock().unwrap(), vec![true]);
    }

    #[tokio::test]
    async fn test_callback_invoked_once_on_failure() {
        let transport = MockTransport::new();
        transport.push_error(TransportError::Connection("refused".to_string()));
        let client = client_with(&transport);

        let mut seen = None;
        let result = client
            .execute_with_callback(None, |outcome| {
                seen = Some(outcome.map(|r| r.clone()).map_err(|e| e.clone()));
            })
            .await;

        let seen = seen.expect("callback not invoked");
        assert_eq!(seen, result);
        assert!(matches!(result, Err(ImageConverterError::Transport(_))));
    }

    #[tokio::test]
    async fn test_spawn_execute() {
        let transport = MockTransport::new();
        let client = client_with(&transport);

        let handle = client.spawn_execute(Some(Query::new().with("to", "png")));
        let response = handle.await.unwrap().unwrap();

        assert_eq!(response.data, fixtures::conversion_result());
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn test_classify_success() {
        let response = classify_response(TransportResponse::new(200, fixtures::success_body()))
            .unwrap();
        assert_eq!(response.status, "ok");
        assert!(response.error.is_none());
        assert!(response.code.is_none());
        assert_eq!(response.data, fixtures::conversion_result());
    }

    #[test]
    fn test_classify_service_error_in_body() {
        let err = classify_response(TransportResponse::new(
            200,
            fixtures::error_body("invalid url", 400),
        ))
        .unwrap_err();

        assert_eq!(
            err,
            ImageConverterError::Service {
                message: "invalid url".to_string(),
                code: Some(400),
            }
        );
    }

    #[test]
    fn test_classify_http_error_uses_http_status_as_code() {
        let body = json!({"status": "error", "error": "unauthorized"}).to_string();
        let err = classify_response(TransportResponse::new(401, body)).unwrap_err();
        assert_eq!(err.code(), Some(401));
        assert!(err.to_string().contains("unauthorized"));
    }

    #[test]
    fn test_classify_http_error_with_html_body() {
        let err = classify_response(TransportResponse::new(502, "<html>Bad Gateway</html>"))
            .unwrap_err();
        assert!(matches!(
            err,
            ImageConverterError::Service {
                code: Some(502),
                ..
            }
        ));
        assert!(err.to_string().contains("Bad Gateway"));
    }

    #[test]
    fn test_classify_http_error_with_ok_status_is_failure() {
        let err = classify_response(TransportResponse::new(500, fixtures::success_body()))
            .unwrap_err();
        assert_eq!(err.code(), Some(500));
    }

    #[test]
    fn test_classify_non_json_success_is_parse_error() {
        let err = classify_response(TransportResponse::new(200, "not json")).unwrap_err();
        assert!(matches!(err, ImageConverterError::Parse(_)));
    }

    #[test]
    fn test_classify_missing_status_is_parse_error() {
        let body = json!({"data": serde_json::to_value(fixtures::conversion_result()).unwrap()});
        let err = classify_response(TransportResponse::new(200, body.to_string())).unwrap_err();
        assert!(matches!(err, ImageConverterError::Parse(_)));
    }

    #[test]
    fn test_classify_success_without_data_is_parse_error() {
        let body = json!({"status": "ok", "error": null}).to_string();
        let err = classify_response(TransportResponse::new(200, body)).unwrap_err();
        assert!(matches!(err, ImageConverterError::Parse(_)));
    }

    #[test]
    fn test_classify_malformed_data_is_parse_error() {
        let body = json!({"status": "ok", "data": {"id": 5}}).to_string();
        let err = classify_response(TransportResponse::new(200, body)).unwrap_err();
        assert!(matches!(err, ImageConverterError::Parse(_)));
    }

    #[test]
    fn test_classify_service_code_outside_http_range() {
        let body = r#"{"status":"error","error":"quota exceeded","code":100001}"#;
        let err = classify_response(TransportResponse::new(200, body)).unwrap_err();
        assert_eq!(
            err,
            ImageConverterError::Service {
                message: "quota exceeded".to_string(),
                code: Some(100_001),
            }
        );

        let body = r#"{"status":"error","error":"invalid url","code":-1}"#;
        let err = classify_response(TransportResponse::new(200, body)).unwrap_err();
        assert_eq!(
            err,
            ImageConverterError::Service {
                message: "invalid url".to_string(),
                code: Some(-1),
            }
        );
    }

    #[test]
    fn test_classify_non_string_error_keeps_service_failure() {
        let body = json!({"status": "error", "error": {"field": "url"}, "code": 422});
        let err = classify_response(TransportResponse::new(200, body.to_string())).unwrap_err();
        assert_eq!(
            err,
            ImageConverterError::Service {
                message: r#"{"field":"url"}"#.to_string(),
                code: Some(422),
            }
        );
    }

    #[test]
    fn test_classify_success_with_large_code() {
        let mut body: serde_json::Value = serde_json::from_str(&fixtures::success_body()).unwrap();
        body["code"] = json!(200_000);
        let response = classify_response(TransportResponse::new(200, body.to_string())).unwrap();
        assert_eq!(response.code, Some(200_000));
    }

    #[test]
    fn test_classify_error_status_without_message() {
        let body = json!({"status": "error"}).to_string();
        let err = classify_response(TransportResponse::new(200, body)).unwrap_err();
        assert_eq!(
            err,
            ImageConverterError::Service {
                message: "Service reported status 'error'".to_string(),
                code: None,
            }
        );
    }
}
