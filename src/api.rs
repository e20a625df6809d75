//! REST client for the task backend.

use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use crate::error::ApiError;
use crate::models::{Counters, Filter, Task, TaskDraft};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/tarefas";

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/{}", self.base_url, id)
    }

    /// `GET {base}?status=..&titulo=..`
    #[instrument(skip(self), level = "debug")]
    pub async fn list_tasks(&self, filter: &Filter) -> Result<Vec<Task>, ApiError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&filter.query_params())
            .send()
            .await
            .map_err(ApiError::Transport)?;
        Self::decode(response).await
    }

    /// `GET {base}/estatisticas`
    #[instrument(skip(self), level = "debug")]
    pub async fn stats(&self) -> Result<Counters, ApiError> {
        let url = format!("{}/estatisticas", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        Self::decode(response).await
    }

    /// `GET {base}/{id}`
    #[instrument(skip(self), level = "debug")]
    pub async fn get_task(&self, id: i64) -> Result<Task, ApiError> {
        let response = self
            .client
            .get(self.item_url(id))
            .send()
            .await
            .map_err(ApiError::Transport)?;
        Self::decode(response).await
    }

    /// `POST {base}`. Success is any 2xx; the response body is not read.
    #[instrument(skip(self, draft), fields(title = %draft.title), level = "debug")]
    pub async fn create(&self, draft: &TaskDraft) -> Result<(), ApiError> {
        let response = self.post(draft).await?;
        Self::check(&response)
    }

    /// Like [`ApiClient::create`], but also returns the stored record when the
    /// server echoes one back.
    #[instrument(skip(self, draft), fields(title = %draft.title), level = "debug")]
    pub async fn create_task(&self, draft: &TaskDraft) -> Result<Option<Task>, ApiError> {
        let response = self.post(draft).await?;
        Self::decode_optional(response).await
    }

    /// `PUT {base}/{id}` with the full record. Success is any 2xx; the
    /// response body is not read.
    #[instrument(skip(self, draft), level = "debug")]
    pub async fn update(&self, id: i64, draft: &TaskDraft) -> Result<(), ApiError> {
        let response = self.put(id, draft).await?;
        Self::check(&response)
    }

    /// Like [`ApiClient::update`], but also returns the stored record when the
    /// server echoes one back.
    #[instrument(skip(self, draft), level = "debug")]
    pub async fn update_task(&self, id: i64, draft: &TaskDraft) -> Result<Option<Task>, ApiError> {
        let response = self.put(id, draft).await?;
        Self::decode_optional(response).await
    }

    async fn post(&self, draft: &TaskDraft) -> Result<reqwest::Response, ApiError> {
        self.client
            .post(&self.base_url)
            .json(draft)
            .send()
            .await
            .map_err(ApiError::Transport)
    }

    async fn put(&self, id: i64, draft: &TaskDraft) -> Result<reqwest::Response, ApiError> {
        self.client
            .put(self.item_url(id))
            .json(draft)
            .send()
            .await
            .map_err(ApiError::Transport)
    }

    /// `DELETE {base}/{id}`. Any response body is ignored.
    #[instrument(skip(self), level = "debug")]
    pub async fn delete_task(&self, id: i64) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.item_url(id))
            .send()
            .await
            .map_err(ApiError::Transport)?;
        Self::check(&response)
    }

    fn check(response: &reqwest::Response) -> Result<(), ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Status(status))
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        Self::check(&response)?;
        response.json().await.map_err(ApiError::Decode)
    }

    /// Decodes a write response. An empty body (e.g. `204 No Content`) is
    /// `None`.
    async fn decode_optional<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Option<T>, ApiError> {
        Self::check(&response)?;
        let body = response.bytes().await.map_err(ApiError::Transport)?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(ApiError::InvalidBody)
    }
}
