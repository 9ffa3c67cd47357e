//! Canonical field resolution over loosely shaped file records.
//!
//! Each canonical attribute has an ordered alias table. The first alias whose
//! value is present and not `null` wins; empty strings and zero are valid.

use super::schema::{FileId, FileRecord, DEFAULT_CATEGORY, UNTITLED_FILE};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

pub const ID_KEYS: &[&str] = &["id", "fileId", "file_id", "fileID"];
pub const NAME_KEYS: &[&str] = &["name", "fileName", "filename", "file_name", "title"];
pub const CATEGORY_KEYS: &[&str] = &[
    "category",
    "fileCategory",
    "file_category",
    "file_type",
    "type",
];
pub const SIZE_KEYS: &[&str] = &["size", "fileSize", "file_size", "bytes", "length"];
pub const TIMESTAMP_KEYS: &[&str] = &["updatedAt", "updated_at", "created_at", "createdAt", "date"];
pub const MIME_TYPE_KEYS: &[&str] = &["mime_type", "mimeType", "file_type", "fileType"];

/// Epoch values below this are seconds, at or above it milliseconds.
const EPOCH_MILLIS_CUTOFF: f64 = 1e11;

/// Return the first present, non-null value among `keys`.
///
/// Non-object records resolve nothing.
pub fn resolve_field<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let map = record.as_object()?;
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| !value.is_null())
}

impl FileRecord {
    fn field(&self, keys: &[&str]) -> Option<&Value> {
        resolve_field(self.raw(), keys)
    }

    fn text_field(&self, keys: &[&str]) -> Option<String> {
        match self.field(keys)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn id(&self) -> Option<FileId> {
        FileId::from_value(self.field(ID_KEYS)?)
    }

    pub fn name(&self) -> Option<String> {
        self.text_field(NAME_KEYS)
    }

    /// Name for display, `"Untitled file"` when unresolved.
    pub fn display_name(&self) -> String {
        self.name().unwrap_or_else(|| UNTITLED_FILE.to_string())
    }

    /// Key for rendering lists: the id, else the name.
    pub fn render_key(&self) -> String {
        match self.id() {
            Some(id) => id.to_string(),
            None => self.display_name(),
        }
    }

    pub fn category(&self) -> Option<String> {
        self.text_field(CATEGORY_KEYS)
    }

    pub fn category_or_default(&self) -> String {
        self.category().unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
    }

    pub fn size(&self) -> Option<u64> {
        match self.field(SIZE_KEYS)? {
            Value::Number(n) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f as u64)
            }),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self.field(TIMESTAMP_KEYS)? {
            Value::Number(n) => n.as_f64().and_then(epoch_to_datetime),
            Value::String(s) => parse_timestamp(s),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.field(MIME_TYPE_KEYS)?.as_str()
    }
}

/// Parse the timestamp encodings servers are known to send.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    input.parse::<f64>().ok().and_then(epoch_to_datetime)
}

fn epoch_to_datetime(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() {
        return None;
    }
    let millis = if value.abs() < EPOCH_MILLIS_CUTOFF {
        value * 1000.0
    } else {
        value
    };
    Utc.timestamp_millis_opt(millis as i64).single()
}
