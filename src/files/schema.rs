use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Default display name for records whose name cannot be resolved.
pub const UNTITLED_FILE: &str = "Untitled file";

/// Default category for records whose category cannot be resolved.
pub const DEFAULT_CATEGORY: &str = "other";

/// A file as described by the server.
///
/// The server does not commit to a schema, so the record keeps the raw JSON
/// value and canonical attributes are derived on demand through the alias
/// tables in [`super::resolve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileRecord {
    raw: Value,
}

impl FileRecord {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }
}

impl From<Value> for FileRecord {
    fn from(raw: Value) -> Self {
        Self::new(raw)
    }
}

/// Opaque file identifier.
///
/// Keeps the JSON type the server used so the id round-trips unchanged in
/// request bodies. `Int(5)` and `Text("5")` are distinct ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileId {
    Int(i64),
    Text(String),
}

impl FileId {
    /// Interpret a resolved JSON value as an id.
    ///
    /// Empty strings, booleans, arrays and objects are not identities.
    /// Numbers that do not fit an `i64` keep their textual form.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self::Text(s.clone())),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Self::Int(i)),
                None => Some(Self::Text(n.to_string())),
            },
            _ => None,
        }
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FileId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for FileId {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

/// Pagination metadata resolved from one list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: u64,
    pub page_size: u64,
    pub total: Option<u64>,
    pub has_more: bool,
}

/// Server-side category filter offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Audio,
    Media,
    Files,
}

impl CategoryFilter {
    pub const ALL: [CategoryFilter; 4] = [Self::All, Self::Audio, Self::Media, Self::Files];

    /// Value sent as the `category` query parameter. `All` sends nothing.
    pub fn as_query(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Audio => Some("audio"),
            Self::Media => Some("ImageVideo"),
            Self::Files => Some("file"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Audio => "Audio",
            Self::Media => "Media",
            Self::Files => "Files",
        }
    }

    /// Parse a filter chip name, accepting both labels and query values.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "audio" => Some(Self::Audio),
            "media" | "imagevideo" => Some(Self::Media),
            "files" | "file" => Some(Self::Files),
            _ => None,
        }
    }
}
