use serde::{Deserialize, Serialize};

/// Host and version prefix of the hosted service, without scheme.
pub const DEFAULT_BASE_URL: &str = "api.apiverve.com/v1";

/// Operation path appended to the base URL.
pub const ENDPOINT_PATH: &str = "imageconverter";

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,
}

/// Client wrapper configuration.
///
/// Fixed for the lifetime of a client. `api_key` defaults to empty so that a
/// missing credential is reported by the client constructor rather than by
/// the config parser.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ClientConfig {
    /// API key sent with every request.
    #[serde(default)]
    pub api_key: String,
    /// Use HTTPS (default) or plain HTTP.
    #[serde(default = "default_secure")]
    pub secure: bool,
    /// Override for the service base URL (e.g. "https://staging.example.com/v1").
    /// Its scheme is replaced according to `secure`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// HTTP method used to carry the query.
    #[serde(default)]
    pub method: RequestMethod,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Custom User-Agent header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            secure: default_secure(),
            base_url: None,
            method: RequestMethod::default(),
            timeout_secs: default_timeout(),
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Create a config with the given API key and default settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_method(mut self, method: RequestMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// URL scheme selected by `secure`.
    pub fn scheme(&self) -> &'static str {
        if self.secure {
            "https"
        } else {
            "http"
        }
    }

    /// Full URL of the conversion endpoint.
    pub fn endpoint(&self) -> String {
        let base = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let host = base
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');

        format!("{}://{}/{}", self.scheme(), host, ENDPOINT_PATH)
    }
}

fn default_secure() -> bool {
    true
}

fn default_timeout() -> u64 {
    30
}

/// How the query is carried to the service.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RequestMethod {
    /// Query forwarded as URL parameters.
    Get,
    /// Query forwarded as a JSON body.
    #[default]
    Post,
}

impl RequestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
        }
    }
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub client: SanitizedClientConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedClientConfig {
    pub api_key: String,
    pub secure: bool,
    pub endpoint: String,
    pub method: RequestMethod,
    pub timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl From<&ClientConfig> for SanitizedClientConfig {
    fn from(config: &ClientConfig) -> Self {
        let api_key = if config.api_key.trim().is_empty() {
            "<unset>".to_string()
        } else {
            "***".to_string()
        };

        Self {
            api_key,
            secure: config.secure,
            endpoint: config.endpoint(),
            method: config.method,
            timeout_secs: config.timeout_secs,
            user_agent: config.user_agent.clone(),
        }
    }
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            client: SanitizedClientConfig::from(&config.client),
        }
    }
}
