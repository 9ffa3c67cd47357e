//! Response envelope normalization.
//!
//! A list response is either a bare array of records or an object that
//! carries the array under one of several container keys, optionally next to
//! pagination fields under their own aliases.

use super::resolve::resolve_field;
use super::schema::{FileRecord, PageInfo};
use serde_json::Value;

pub const ITEM_CONTAINER_KEYS: &[&str] = &["items", "data", "result", "files"];
pub const PAGE_KEYS: &[&str] = &["page", "pageNumber", "currentPage", "page_number"];
pub const PAGE_SIZE_KEYS: &[&str] = &["pageSize", "page_size", "perPage", "limit"];
pub const TOTAL_KEYS: &[&str] = &["total", "totalCount", "total_count", "count", "totalItems"];
pub const HAS_MORE_KEYS: &[&str] = &["hasNext", "has_next_page", "hasMore", "has_more"];

/// Extract the record sequence. Never fails; unknown shapes yield nothing.
pub fn normalize_items(payload: &Value) -> Vec<FileRecord> {
    let items = match payload {
        Value::Array(items) => Some(items),
        Value::Object(map) => ITEM_CONTAINER_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array)),
        _ => None,
    };
    items
        .map(|items| items.iter().cloned().map(FileRecord::new).collect())
        .unwrap_or_default()
}

/// Resolve pagination metadata, falling back to what was requested.
pub fn normalize_pagination(
    payload: &Value,
    items: &[FileRecord],
    requested_page: u64,
    requested_page_size: u64,
) -> PageInfo {
    let full_page = items.len() as u64 == requested_page_size;
    if !payload.is_object() {
        return PageInfo {
            page: requested_page,
            page_size: requested_page_size,
            total: None,
            has_more: full_page,
        };
    }

    let page = count_field(payload, PAGE_KEYS).unwrap_or(requested_page);
    let page_size = count_field(payload, PAGE_SIZE_KEYS).unwrap_or(requested_page_size);
    let total = count_field(payload, TOTAL_KEYS);
    let explicit = HAS_MORE_KEYS
        .iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_bool));

    let has_more = match (explicit, total) {
        (Some(flag), _) => flag,
        (None, Some(total)) => page.saturating_mul(page_size) < total,
        (None, None) => full_page,
    };

    PageInfo {
        page,
        page_size,
        total,
        has_more,
    }
}

/// Items and pagination of one response in a single pass.
pub fn normalize_page(
    payload: &Value,
    requested_page: u64,
    requested_page_size: u64,
) -> (Vec<FileRecord>, PageInfo) {
    let items = normalize_items(payload);
    let info = normalize_pagination(payload, &items, requested_page, requested_page_size);
    (items, info)
}

fn count_field(payload: &Value, keys: &[&str]) -> Option<u64> {
    match resolve_field(payload, keys)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items(n: usize) -> Vec<Value> {
        (0..n).map(|i| json!({"id": i})).collect()
    }

    #[test]
    fn items_from_every_container_shape() {
        let list = json!([{"id": 1}, {"id": 2}]);
        assert_eq!(normalize_items(&list).len(), 2);

        for key in ITEM_CONTAINER_KEYS {
            let mut envelope = serde_json::Map::new();
            envelope.insert(key.to_string(), json!([{"id": 1}]));
            let payload = Value::Object(envelope);
            let records = normalize_items(&payload);
            assert_eq!(records.len(), 1, "container key {key}");
            assert_eq!(records[0].raw(), &json!({"id": 1}));
        }

        assert!(normalize_items(&json!({"rows": [{"id": 1}]})).is_empty());
        assert!(normalize_items(&Value::Null).is_empty());
        assert!(normalize_items(&json!("oops")).is_empty());
    }

    #[test]
    fn container_priority_skips_non_arrays() {
        let payload = json!({"items": null, "data": {"nested": true}, "result": [{"id": "r"}], "files": [{"id": "f"}]});
        let records = normalize_items(&payload);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].raw(), &json!({"id": "r"}));
    }

    #[test]
    fn has_more_from_total() {
        let items = normalize_items(&json!({"items": items(20)}));
        let page2 = normalize_pagination(&json!({"total": 45, "pageSize": 20, "page": 2}), &items, 2, 20);
        assert!(page2.has_more);
        assert_eq!(page2.total, Some(45));

        let page3 = normalize_pagination(&json!({"total": 45, "pageSize": 20, "page": 3}), &items[..5], 3, 20);
        assert!(!page3.has_more);
    }

    #[test]
    fn has_more_from_full_page_without_total() {
        let full = normalize_items(&json!(items(20)));
        let info = normalize_pagination(&json!({"items": []}), &full, 1, 20);
        assert!(info.has_more);
        assert_eq!(info.total, None);

        let short = normalize_pagination(&json!({}), &full[..7], 1, 20);
        assert!(!short.has_more);
    }

    #[test]
    fn explicit_flag_beats_inference() {
        let full = normalize_items(&json!(items(20)));
        let info = normalize_pagination(&json!({"has_next_page": false, "total": 1000}), &full, 1, 20);
        assert!(!info.has_more);

        let info = normalize_pagination(&json!({"hasNext": true, "total": 3}), &[], 1, 20);
        assert!(info.has_more);

        // Non-boolean flags are not explicit signals.
        let info = normalize_pagination(&json!({"hasNext": "yes", "total": 3}), &[], 1, 20);
        assert!(!info.has_more);
    }

    #[test]
    fn aliases_and_fallbacks() {
        let info = normalize_pagination(&json!({"currentPage": 4, "perPage": "10", "totalItems": 100}), &[], 1, 20);
        assert_eq!(info, PageInfo { page: 4, page_size: 10, total: Some(100), has_more: true });

        let info = normalize_pagination(&json!({"page": null}), &[], 2, 20);
        assert_eq!(info.page, 2);
        assert_eq!(info.page_size, 20);
    }

    #[test]
    fn bare_sequences_fall_back_entirely() {
        let payload = json!(items(20));
        let (records, info) = normalize_page(&payload, 3, 20);
        assert_eq!(records.len(), 20);
        assert_eq!(info, PageInfo { page: 3, page_size: 20, total: None, has_more: true });

        let (records, info) = normalize_page(&Value::Null, 1, 20);
        assert!(records.is_empty());
        assert!(!info.has_more);
    }
}
