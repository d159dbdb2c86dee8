mod loader;
mod types;
mod validate;

pub use loader::*;
pub use types::*;
pub use validate::*;

use thiserror::Error;

/// Errors raised while loading or checking client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The requested config file does not exist.
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    /// TOML or environment values could not be extracted into `Config`.
    #[error("Invalid configuration: {0}")]
    ParseError(String),

    /// Values parsed but are not usable (zero timeout, bad base URL).
    #[error("Configuration rejected: {0}")]
    ValidationError(String),
}
