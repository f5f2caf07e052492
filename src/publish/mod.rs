// src/publish/mod.rs

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use url::Url;

use crate::error::{status_detail, SyncError};
use crate::fetch::Record;

pub const INDEX_UID: &str = "manhwa";
pub const PRIMARY_KEY: &str = "id";

pub const SEARCHABLE_ATTRIBUTES: &[&str] = &["title", "status", "genre", "description", "tags"];

pub const DISPLAYED_ATTRIBUTES: &[&str] = &[
    "id",
    "title",
    "cover_image",
    "status",
    "chapters",
    "genre",
    "description",
    "official_site",
    "tags",
];

/// How `ensure_index` found the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    Created,
    AlreadyExists,
}

/// Accepted bulk write. `task_uid` is the service's async task, if it returned one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub documents: usize,
    pub task_uid: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateIndex<'a> {
    uid: &'a str,
    primary_key: &'a str,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IndexSettings<'a> {
    pub searchable_attributes: &'a [&'a str],
    pub displayed_attributes: &'a [&'a str],
}

impl Default for IndexSettings<'static> {
    fn default() -> Self {
        Self {
            searchable_attributes: SEARCHABLE_ATTRIBUTES,
            displayed_attributes: DISPLAYED_ATTRIBUTES,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskInfo {
    #[serde(default, alias = "updateId")]
    task_uid: Option<u64>,
}

/// Talks to the search service for one index, authenticated with a bearer token.
pub struct IndexPublisher {
    client: Client,
    token: String,
    indexes_url: Url,
    documents_url: Url,
    settings_url: Url,
}

impl IndexPublisher {
    /// Resolve the endpoint URLs under `host`. A path prefix on `host` is kept
    /// whether or not it ends in `/`.
    pub fn new(client: Client, host: &Url, token: impl Into<String>) -> Result<Self, SyncError> {
        let mut base = host.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let join = |path: &str| {
            base.join(path)
                .map_err(|e| SyncError::config(format!("building `{}` URL: {}", path, e)))
        };

        Ok(Self {
            client,
            token: token.into(),
            indexes_url: join("indexes")?,
            documents_url: join(&format!("indexes/{}/documents", INDEX_UID))?,
            settings_url: join(&format!("indexes/{}/settings", INDEX_UID))?,
        })
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.bearer_auth(&self.token)
    }

    /// Create the index, treating 409 Conflict as "already there".
    #[instrument(level = "info", skip(self), fields(index = INDEX_UID))]
    pub async fn ensure_index(&self) -> Result<IndexStatus, SyncError> {
        let body = CreateIndex {
            uid: INDEX_UID,
            primary_key: PRIMARY_KEY,
        };
        let resp = self
            .authorized(self.client.post(self.indexes_url.clone()))
            .json(&body)
            .send()
            .await
            .map_err(|e| SyncError::index_creation(INDEX_UID, e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::CONFLICT {
            info!("ℹ️ index already exists, continuing");
            return Ok(IndexStatus::AlreadyExists);
        }
        if !status.is_success() {
            let detail = rejected(resp).await;
            return Err(SyncError::index_creation(INDEX_UID, detail));
        }

        info!("✅ index created");
        Ok(IndexStatus::Created)
    }

    /// Send the whole dataset as one JSON array.
    #[instrument(level = "info", skip_all, fields(index = INDEX_UID, documents = documents.len()))]
    pub async fn upload_documents(&self, documents: &[Record]) -> Result<UploadReceipt, SyncError> {
        let resp = self
            .authorized(self.client.post(self.documents_url.clone()))
            .json(documents)
            .send()
            .await
            .map_err(|e| SyncError::upload(INDEX_UID, e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = rejected(resp).await;
            return Err(SyncError::upload(INDEX_UID, detail));
        }

        // The task id is informational only; an unreadable body is not a failure.
        let task_uid = match resp.text().await {
            Ok(body) => serde_json::from_str::<TaskInfo>(&body)
                .ok()
                .and_then(|t| t.task_uid),
            Err(_) => None,
        };

        match task_uid {
            Some(uid) => info!(
                task_uid = uid,
                "✅ uploaded {} documents (indexing continues asynchronously)",
                documents.len()
            ),
            None => info!("✅ uploaded {} documents", documents.len()),
        }

        Ok(UploadReceipt {
            documents: documents.len(),
            task_uid,
        })
    }

    /// Patch the searchable and displayed attribute lists.
    #[instrument(level = "info", skip(self), fields(index = INDEX_UID))]
    pub async fn update_settings(&self) -> Result<(), SyncError> {
        let resp = self
            .authorized(self.client.patch(self.settings_url.clone()))
            .json(&IndexSettings::default())
            .send()
            .await
            .map_err(|e| SyncError::settings(INDEX_UID, e.to_string()))?;

        if !resp.status().is_success() {
            let detail = rejected(resp).await;
            return Err(SyncError::settings(INDEX_UID, detail));
        }

        info!("⚙️ index settings updated");
        Ok(())
    }
}

async fn rejected(resp: Response) -> String {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    status_detail(status, &body)
}
