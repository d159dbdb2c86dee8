//! Request and response types for the image conversion endpoint.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Query
// ============================================================================

/// Per-call parameters, forwarded verbatim to the service.
///
/// The shape is open on purpose: any string key with any JSON value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(Map<String, Value>);

impl Query {
    /// Create an empty query.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Insert a parameter, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Query {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<HashMap<String, Value>> for Query {
    fn from(map: HashMap<String, Value>) -> Self {
        Self(map.into_iter().collect())
    }
}

impl TryFrom<Value> for Query {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(format!("query must be a JSON object, got {}", other)),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Typed helper for the parameters the service documents.
///
/// Produces a plain [`Query`]; anything not covered here can still be added
/// to the resulting query by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOptions {
    /// Location of the source image.
    pub url: String,
    /// Target format (e.g. "webp", "png", "avif").
    pub to: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Output quality, 1-100.
    pub quality: Option<u8>,
}

impl ConversionOptions {
    pub fn new(url: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            to: to.into(),
            width: None,
            height: None,
            quality: None,
        }
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Resize to the given bounds.
    pub fn with_size(self, width: u32, height: u32) -> Self {
        self.with_width(width).with_height(height)
    }

    /// Set output quality, clamped to 1-100.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality.clamp(1, 100));
        self
    }

    pub fn into_query(self) -> Query {
        let mut query = Query::new().with("url", self.url).with("to", self.to);
        if let Some(width) = self.width {
            query.insert("width", width);
        }
        if let Some(height) = self.height {
            query.insert("height", height);
        }
        if let Some(quality) = self.quality {
            query.insert("quality", quality);
        }
        query
    }
}

impl From<ConversionOptions> for Query {
    fn from(options: ConversionOptions) -> Self {
        options.into_query()
    }
}

// ============================================================================
// Response
// ============================================================================

/// Metadata of a finished conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    /// Identifier of the conversion job.
    pub id: String,
    pub input_format: String,
    pub output_format: String,
    /// Source size in bytes.
    pub input_size: u64,
    /// Output size in bytes.
    pub output_size: u64,
    pub mime_type: String,
    /// Unix timestamp (seconds) after which `download_url` stops working.
    pub expires: i64,
    #[serde(rename = "downloadURL")]
    pub download_url: String,
}

impl ConversionResult {
    /// Expiry as a UTC timestamp, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expires, 0)
    }

    /// Whether the download URL has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.expires
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Output size relative to input size. None when the input size is 0.
    pub fn size_ratio(&self) -> Option<f64> {
        if self.input_size == 0 {
            None
        } else {
            Some(self.output_size as f64 / self.input_size as f64)
        }
    }
}

/// A successful response from the service.
///
/// Failures never take this shape; they are reported as
/// [`super::ImageConverterError`], so `data` is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageConverterResponse {
    /// Outcome marker reported by the service (e.g. "ok").
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    pub data: ConversionResult,
}

/// Response body as it appears on the wire, before classification.
///
/// `error` and `code` stay loosely typed so an odd value in either cannot
/// hide a failure reported by the service.
#[derive(Debug, Deserialize)]
pub(crate) struct RawResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl RawResponse {
    pub fn is_success_status(&self) -> bool {
        self.status
            .as_deref()
            .map(is_success_status)
            .unwrap_or(false)
    }

    /// `error` as text. Strings verbatim, other non-null values as JSON.
    pub fn error_message(&self) -> Option<String> {
        match self.error.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// `code` as an integer, accepting numeric strings.
    pub fn code(&self) -> Option<i64> {
        match self.code.as_ref()? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Status markers the service uses for success.
pub(crate) fn is_success_status(status: &str) -> bool {
    status.eq_ignore_ascii_case("ok") || status.eq_ignore_ascii_case("success")
}
