//! HTTP client for the remote blob store.

use super::{BoxFuture, RemoteStore, StorageError, StorageResult};
use crate::document::DrawingRecord;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SaveResponse {
    id: String,
}

/// Remote store over the blob-store wire contract:
/// `POST /save`, `GET /load/{id}`, `DELETE /delete/{id}`, `GET /health`.
///
/// Bodies are raw bytes of UTF-8 encoded JSON drawing records.
pub struct HttpRemoteStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRemoteStore {
    /// Create a client for the store at the given base URL
    /// (e.g. `http://localhost:10000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn status_error(status: reqwest::StatusCode, context: &str) -> StorageError {
        match status.as_u16() {
            400 | 413 => StorageError::Validation(format!("{context}: {status}")),
            404 => StorageError::NotFound(context.to_string()),
            _ => StorageError::Network(format!("{context}: server returned {status}")),
        }
    }
}

impl RemoteStore for HttpRemoteStore {
    fn save(&self, record: &DrawingRecord) -> BoxFuture<'_, StorageResult<String>> {
        let body = serde_json::to_vec(record);
        Box::pin(async move {
            let body = body.map_err(|e| StorageError::Serialization(e.to_string()))?;
            let response = self
                .client
                .post(format!("{}/save", self.base_url))
                .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
                .body(body)
                .send()
                .await
                .map_err(|e| StorageError::Network(e.to_string()))?;

            if !response.status().is_success() {
                return Err(Self::status_error(response.status(), "save"));
            }
            let parsed: SaveResponse = response
                .json()
                .await
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            Ok(parsed.id)
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<DrawingRecord>> {
        let id = id.to_string();
        Box::pin(async move {
            let response = self
                .client
                .get(format!("{}/load/{id}", self.base_url))
                .send()
                .await
                .map_err(|e| StorageError::Network(e.to_string()))?;

            if !response.status().is_success() {
                return Err(Self::status_error(response.status(), &id));
            }
            let bytes = response
                .bytes()
                .await
                .map_err(|e| StorageError::Network(e.to_string()))?;
            serde_json::from_slice(&bytes)
                .map_err(|e| StorageError::Serialization(e.to_string()))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let response = self
                .client
                .delete(format!("{}/delete/{id}", self.base_url))
                .send()
                .await
                .map_err(|e| StorageError::Network(e.to_string()))?;

            if !response.status().is_success() {
                return Err(Self::status_error(response.status(), &id));
            }
            Ok(())
        })
    }

    fn health(&self) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            let response = self
                .client
                .get(format!("{}/health", self.base_url))
                .send()
                .await
                .map_err(|e| StorageError::Network(e.to_string()))?;

            if !response.status().is_success() {
                return Err(Self::status_error(response.status(), "health"));
            }
            Ok(())
        })
    }
}
