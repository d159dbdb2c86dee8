mod args;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imageconverter_core::{
    load_config, load_config_from_env, validate_config, Config, ImageConverterClient,
    SanitizedConfig,
};

use args::{parse_args, Command, USAGE};

/// Default configuration file, relative to the working directory
const DEFAULT_CONFIG_PATH: &str = "imageconverter.toml";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Logs go to stderr; stdout carries the response
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let query = match parse_args(std::env::args().skip(1))? {
        Command::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        Command::Execute(query) => query,
    };

    let config = load()?;
    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = SanitizedConfig::from(&config);
    debug!(
        "Configuration: {}",
        serde_json::to_string(&sanitized).unwrap_or_default()
    );

    let client = ImageConverterClient::new(config.client).context("Failed to create client")?;

    info!(endpoint = client.endpoint(), params = query.len(), "Converting image");
    let response = client
        .execute(Some(query))
        .await
        .context("Image conversion failed")?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// Load configuration from the config file if present, else from the environment.
fn load() -> Result<Config> {
    let config_path = std::env::var("IMAGECONVERTER_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    if config_path.exists() {
        info!("Loading configuration from {:?}", config_path);
        load_config(&config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))
    } else {
        debug!("No config file at {:?}, using environment", config_path);
        load_config_from_env().context("Failed to load config from environment")
    }
}
