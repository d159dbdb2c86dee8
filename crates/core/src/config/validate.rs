use super::{types::ClientConfig, types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Timeout is not 0
/// - base_url, when set, is an http(s) URL
///
/// The API key is checked by the client constructor.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    validate_client_config(&config.client)
}

pub fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    if config.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "client.timeout_secs cannot be 0".to_string(),
        ));
    }

    if let Some(base_url) = &config.base_url {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::ValidationError(format!(
                "client.base_url must start with http:// or https://, got '{}'",
                base_url
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_config() {
        let config = Config {
            client: ClientConfig::new("abc123"),
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_timeout_zero_fails() {
        let config = Config {
            client: ClientConfig::new("abc123").with_timeout(0),
        };
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_base_url_without_scheme_fails() {
        let config = ClientConfig::new("abc123").with_base_url("api.example.com/v1");
        let result = validate_client_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
