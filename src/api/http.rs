use super::{BulkDeleteRequest, Endpoints, FileApi, ListQuery, USER_FILES_PATH};
use crate::error::ApiError;
use crate::files::FileId;
use crate::identity::UserId;
use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// File API client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFileApi {
    endpoints: Endpoints,
    client: reqwest::Client,
}

impl HttpFileApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut default_headers = reqwest::header::HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(default_headers)
            .build()?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            endpoints: Endpoints::new(base_url),
            client,
        }
    }

    /// Any non-2xx status is a failure; the status detail is only logged.
    fn check(response: reqwest::Response, path: &str) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            warn!(status = status.as_u16(), path, "file API request rejected");
            Err(ApiError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            })
        }
    }
}

#[async_trait]
impl FileApi for HttpFileApi {
    fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn list(&self, query: &ListQuery) -> Result<Value, ApiError> {
        let url = self.endpoints.list_url(query);
        debug!(%url, "listing files");
        let response = self.client.get(&url).send().await?;
        let response = Self::check(response, USER_FILES_PATH)?;
        Ok(response.json::<Value>().await?)
    }

    async fn delete(&self, user_id: &UserId, file_id: &FileId) -> Result<(), ApiError> {
        let url = self.endpoints.file_url(user_id, file_id);
        debug!(%url, "deleting file");
        let response = self.client.delete(&url).send().await?;
        Self::check(response, USER_FILES_PATH)?;
        Ok(())
    }

    async fn bulk_delete(&self, user_id: &UserId, file_ids: &[FileId]) -> Result<(), ApiError> {
        let url = self.endpoints.bulk_delete_url();
        debug!(%url, count = file_ids.len(), "bulk deleting files");
        let body = BulkDeleteRequest { user_id, file_ids };
        let response = self.client.delete(&url).json(&body).send().await?;
        Self::check(response, USER_FILES_PATH)?;
        Ok(())
    }

    async fn stream_text(&self, user_id: &UserId, file_id: &FileId) -> Result<String, ApiError> {
        let url = self.endpoints.stream_url(user_id, file_id);
        debug!(%url, "streaming file as text");
        let response = self.client.get(&url).send().await?;
        let response = Self::check(response, USER_FILES_PATH)?;
        Ok(response.text().await?)
    }
}
