//! Remote file API boundary.
//!
//! [`FileApi`] is the seam between the browser state machine and the
//! network. [`HttpFileApi`] talks to the real service; tests substitute an
//! in-memory implementation.

pub mod http;

use crate::error::ApiError;
use crate::files::FileId;
use crate::identity::UserId;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

pub use http::HttpFileApi;

pub const USER_FILES_PATH: &str = "/api/UserFiles";

/// One list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub user_id: UserId,
    pub page: u64,
    pub page_size: u64,
    pub search: Option<String>,
    pub category: Option<String>,
}

impl ListQuery {
    /// Query pairs in wire order. Empty values are omitted entirely.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let candidates = [
            ("userId", Some(self.user_id.to_string())),
            ("page", Some(self.page.to_string())),
            ("pageSize", Some(self.page_size.to_string())),
            ("search", self.search.clone()),
            ("category", self.category.clone()),
        ];
        candidates
            .into_iter()
            .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
            .collect()
    }
}

/// Body of a bulk delete request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkDeleteRequest<'a> {
    pub user_id: &'a UserId,
    pub file_ids: &'a [FileId],
}

/// Encode query pairs, skipping empty values.
pub fn build_query<K: AsRef<str>>(pairs: &[(K, String)]) -> String {
    pairs
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key.as_ref()),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// URL layout of the file service under one base origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn user_query(user_id: &UserId) -> String {
        build_query(&[("userId", user_id.to_string())])
    }

    fn file_path(file_id: &FileId) -> String {
        format!(
            "{}/{}",
            USER_FILES_PATH,
            urlencoding::encode(&file_id.to_string())
        )
    }

    pub fn list_url(&self, query: &ListQuery) -> String {
        format!(
            "{}{}?{}",
            self.base_url,
            USER_FILES_PATH,
            build_query(&query.to_pairs())
        )
    }

    pub fn bulk_delete_url(&self) -> String {
        format!("{}{}", self.base_url, USER_FILES_PATH)
    }

    pub fn file_url(&self, user_id: &UserId, file_id: &FileId) -> String {
        format!(
            "{}{}?{}",
            self.base_url,
            Self::file_path(file_id),
            Self::user_query(user_id)
        )
    }

    pub fn stream_url(&self, user_id: &UserId, file_id: &FileId) -> String {
        format!(
            "{}{}/stream?{}",
            self.base_url,
            Self::file_path(file_id),
            Self::user_query(user_id)
        )
    }

    pub fn download_url(&self, user_id: &UserId, file_id: &FileId) -> String {
        format!(
            "{}{}/download?{}",
            self.base_url,
            Self::file_path(file_id),
            Self::user_query(user_id)
        )
    }
}

#[async_trait]
pub trait FileApi: Send + Sync {
    fn endpoints(&self) -> &Endpoints;

    /// Fetch one page envelope as raw JSON.
    async fn list(&self, query: &ListQuery) -> Result<Value, ApiError>;

    async fn delete(&self, user_id: &UserId, file_id: &FileId) -> Result<(), ApiError>;

    async fn bulk_delete(&self, user_id: &UserId, file_ids: &[FileId]) -> Result<(), ApiError>;

    /// Stream a file body decoded as UTF-8 text.
    async fn stream_text(&self, user_id: &UserId, file_id: &FileId) -> Result<String, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query() -> ListQuery {
        ListQuery {
            user_id: UserId::Int(7),
            page: 2,
            page_size: 20,
            search: None,
            category: None,
        }
    }

    #[test]
    fn list_url_omits_empty_parameters() {
        let endpoints = Endpoints::new("https://files.example.com/");
        assert_eq!(
            endpoints.list_url(&query()),
            "https://files.example.com/api/UserFiles?userId=7&page=2&pageSize=20"
        );

        let q = ListQuery {
            search: Some(String::new()),
            category: Some("ImageVideo".into()),
            ..query()
        };
        assert_eq!(
            endpoints.list_url(&q),
            "https://files.example.com/api/UserFiles?userId=7&page=2&pageSize=20&category=ImageVideo"
        );
    }

    #[test]
    fn search_terms_are_encoded() {
        let q = ListQuery {
            search: Some("tax 2024&more".into()),
            ..query()
        };
        assert!(Endpoints::new("http://h")
            .list_url(&q)
            .ends_with("&search=tax%202024%26more"));
    }

    #[test]
    fn file_urls() {
        let endpoints = Endpoints::new("http://h");
        let user = UserId::Text("u 1".into());
        let id = FileId::from("a/b");
        assert_eq!(endpoints.file_url(&user, &id), "http://h/api/UserFiles/a%2Fb?userId=u%201");
        assert_eq!(endpoints.stream_url(&user, &FileId::Int(3)), "http://h/api/UserFiles/3/stream?userId=u%201");
        assert_eq!(endpoints.download_url(&UserId::Int(1), &FileId::Int(3)), "http://h/api/UserFiles/3/download?userId=1");
        assert_eq!(endpoints.bulk_delete_url(), "http://h/api/UserFiles");
    }

    #[test]
    fn bulk_body_keeps_id_types() {
        let ids = [FileId::Int(1), FileId::from("x")];
        let body = BulkDeleteRequest { user_id: &UserId::Int(9), file_ids: &ids };
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({"user_id": 9, "file_ids": [1, "x"]}));
    }
}
