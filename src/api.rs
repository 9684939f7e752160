//! Client for the remote task API.

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::error::{ApiError, ApiResult};
use crate::task::{StatusPayload, Task, TaskId, TaskPayload};

/// Operations the remote task service exposes.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// `GET /api/tasks`
    async fn list(&self) -> ApiResult<Vec<Task>>;

    /// `POST /api/tasks`
    async fn create(&self, payload: &TaskPayload) -> ApiResult<Task>;

    /// `PUT /api/tasks/{id}`
    async fn update(&self, id: &TaskId, payload: &TaskPayload) -> ApiResult<Task>;

    /// `PUT /api/tasks/{id}/status`
    async fn set_status(&self, id: &TaskId, status: StatusPayload) -> ApiResult<Task>;

    /// `DELETE /api/tasks/{id}`
    async fn delete(&self, id: &TaskId) -> ApiResult<()>;
}

/// `TaskApi` over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: reqwest::Client,
    base_url: Url,
    /// `{base_url}/api/tasks`
    tasks_url: Url,
}

impl HttpTaskApi {
    /// Create a client rooted at `base_url`; a path prefix and trailing slash are kept.
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let client = reqwest::Client::builder().build()?;
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> ApiResult<Self> {
        let invalid = || ApiError::InvalidBaseUrl(base_url.to_string());
        let parsed = Url::parse(base_url).map_err(|_| invalid())?;
        let mut tasks_url = parsed.clone();
        tasks_url
            .path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push("api")
            .push("tasks");
        Ok(Self {
            client,
            base_url: parsed,
            tasks_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.tasks_url.clone();
        if segments.is_empty() {
            return url;
        }
        let pushed = url
            .path_segments_mut()
            .map(|mut path| {
                path.extend(segments);
            })
            .is_ok();
        // tasks_url already accepted path segments in with_client
        debug_assert!(pushed, "tasks URL {} cannot take path segments", self.tasks_url);
        url
    }
}

/// Read the body as text and decode it, so schema mismatches surface as `Malformed`.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let body = read_body(response).await?;
    Ok(serde_json::from_str(&body)?)
}

async fn read_body(response: reqwest::Response) -> ApiResult<String> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        warn!(status = %status, body = %body, "Task API request failed");
        return Err(ApiError::Status { status, body });
    }
    Ok(body)
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    #[instrument(skip(self))]
    async fn list(&self) -> ApiResult<Vec<Task>> {
        let url = self.endpoint(&[]);
        debug!(%url, "Fetching tasks");
        let response = self.client.get(url).send().await?;
        read_json(response).await
    }

    #[instrument(skip(self, payload), fields(title = %payload.task))]
    async fn create(&self, payload: &TaskPayload) -> ApiResult<Task> {
        let url = self.endpoint(&[]);
        debug!(%url, "Creating task");
        let response = self.client.post(url).json(payload).send().await?;
        read_json(response).await
    }

    #[instrument(skip(self, payload), fields(task_id = %id))]
    async fn update(&self, id: &TaskId, payload: &TaskPayload) -> ApiResult<Task> {
        let url = self.endpoint(&[id.as_str()]);
        debug!(%url, "Updating task");
        let response = self.client.put(url).json(payload).send().await?;
        read_json(response).await
    }

    #[instrument(skip(self), fields(task_id = %id))]
    async fn set_status(&self, id: &TaskId, status: StatusPayload) -> ApiResult<Task> {
        let url = self.endpoint(&[id.as_str(), "status"]);
        debug!(%url, completed = status.completed, "Updating task status");
        let response = self.client.put(url).json(&status).send().await?;
        read_json(response).await
    }

    #[instrument(skip(self), fields(task_id = %id))]
    async fn delete(&self, id: &TaskId) -> ApiResult<()> {
        let url = self.endpoint(&[id.as_str()]);
        debug!(%url, "Deleting task");
        let response = self.client.delete(url).send().await?;
        read_body(response).await.map(|_| ())
    }
}
