//! Client wrapper for the APIVerve image conversion API.
//!
//! The hosted service converts images between formats (HEIC, WebP, AVIF,
//! PNG, JPG, GIF, TIFF) with optional resizing and quality control. This
//! crate only carries the call: configuration, one HTTP request per
//! [`ImageConverterClient::execute`], and classification of the reply.

pub mod client;
pub mod config;
pub mod testing;
pub mod transport;

pub use client::{
    ConversionOptions, ConversionResult, ImageConverterClient, ImageConverterError,
    ImageConverterResponse, Query,
};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_client_config,
    validate_config, ClientConfig, Config, ConfigError, RequestMethod, SanitizedConfig,
};
pub use transport::{ApiRequest, ReqwestTransport, Transport, TransportError, TransportResponse};
