use super::schema::FileRecord;
use anyhow::{bail, Context, Result};
use base64::Engine;
use serde_json::Value;

/// Prefix applied to bare base64 thumbnail payloads.
pub const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// Keys probed, in order, on a thumbnail object.
pub const THUMBNAIL_NESTED_KEYS: &[&str] = &["data", "file_id", "fileId"];

/// Inline thumbnail data, classified by how it becomes displayable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Thumbnail {
    /// Already a `data:` URI.
    DataUri(String),
    /// Already an absolute `http(s)` URL.
    Url(String),
    /// Raw base64 that needs the JPEG data URI prefix.
    Base64(String),
}

impl Thumbnail {
    pub fn classify(data: &str) -> Self {
        if data.starts_with("data:") {
            Self::DataUri(data.to_string())
        } else if data.starts_with("http://") || data.starts_with("https://") {
            Self::Url(data.to_string())
        } else {
            Self::Base64(data.to_string())
        }
    }

    /// URL an image element can display directly.
    pub fn display_url(&self) -> String {
        match self {
            Self::DataUri(uri) | Self::Url(uri) => uri.clone(),
            Self::Base64(b64) => format!("{JPEG_DATA_URI_PREFIX}{b64}"),
        }
    }

    /// Decode inline image bytes. Remote URLs carry no inline bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        let payload = match self {
            Self::Base64(b64) => b64.as_str(),
            Self::DataUri(uri) => match uri.split_once(";base64,") {
                Some((_, payload)) => payload,
                None => bail!("Thumbnail data URI is not base64 encoded"),
            },
            Self::Url(url) => bail!("Thumbnail is a remote URL: {}", url),
        };
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .context("Failed to decode thumbnail base64")
    }
}

/// Raw thumbnail data: the `thumbnail` string itself, or a nested string on a
/// thumbnail object. Empty strings count as absent.
pub fn thumbnail_data(record: &FileRecord) -> Option<&str> {
    let thumbnail = record.raw().get("thumbnail")?;
    let data = match thumbnail {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => THUMBNAIL_NESTED_KEYS
            .iter()
            .filter_map(|key| map.get(*key).and_then(Value::as_str))
            .find(|s| !s.is_empty()),
        _ => None,
    };
    data.filter(|s| !s.is_empty())
}

impl FileRecord {
    pub fn thumbnail(&self) -> Option<Thumbnail> {
        thumbnail_data(self).map(Thumbnail::classify)
    }

    pub fn thumbnail_url(&self) -> Option<String> {
        self.thumbnail().map(|t| t.display_url())
    }
}
