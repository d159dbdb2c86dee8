//! Command-line argument handling.

use anyhow::{bail, Result};
use imageconverter_core::Query;
use serde_json::Value;

pub const USAGE: &str = "\
Usage: imageconverter [key=value ...]

Each argument becomes one query parameter. Values are parsed as JSON when
possible (numbers, booleans, arrays), otherwise sent as strings.

Example:
  imageconverter url=https://example.com/photo.heic to=webp quality=80

Configuration is read from $IMAGECONVERTER_CONFIG (default: imageconverter.toml)
and IMAGECONVERTER_CLIENT__* environment variables.";

/// Parsed invocation.
#[derive(Debug, PartialEq)]
pub enum Command {
    Help,
    Execute(Query),
}

pub fn parse_args<I, S>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut query = Query::new();

    for arg in args {
        let arg = arg.as_ref();
        if arg == "-h" || arg == "--help" {
            return Ok(Command::Help);
        }

        let Some((key, value)) = arg.split_once('=') else {
            bail!("Expected key=value, got '{}'", arg);
        };
        if key.is_empty() {
            bail!("Empty parameter name in '{}'", arg);
        }

        query.insert(key, parse_value(value));
    }

    Ok(Command::Execute(query))
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
