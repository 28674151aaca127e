//! Scrawl blob-store server.
//!
//! Stores drawing documents as opaque bytes behind a small HTTP contract:
//!
//! - `POST /save` — raw bytes of a UTF-8 JSON drawing; responds `{"id"}`.
//! - `GET /load/{id}` — the stored bytes, or 404.
//! - `DELETE /delete/{id}` — `{"success":true}` whether or not the id existed.
//! - `GET /health` — liveness probe.

use axum::{
    Router,
    extract::{DefaultBodyLimit, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use bytes::Bytes;
use dashmap::DashMap;
use serde::Serialize;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use uuid::Uuid;

/// Maximum accepted payload size (50 MB).
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Error body matching the wire contract: `{error_class, error}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error_class: &'static str,
    error: String,
}

impl ErrorBody {
    fn invalid(error: impl Into<String>) -> Self {
        Self {
            error_class: "InvalidRequestError",
            error: error.into(),
        }
    }

    fn too_large() -> Self {
        Self {
            error_class: "RequestTooLargeError",
            error: "Request body too large".to_string(),
        }
    }

    fn not_found() -> Self {
        Self {
            error_class: "NotFoundError",
            error: "Drawing not found".to_string(),
        }
    }

    fn server(error: impl Into<String>) -> Self {
        Self {
            error_class: "ServerError",
            error: error.into(),
        }
    }
}

fn json_error(status: StatusCode, body: ErrorBody) -> Response {
    (status, axum::Json(body)).into_response()
}

/// Validate a save payload against the wire contract.
fn validate_payload(len: usize) -> Result<(), (StatusCode, ErrorBody)> {
    if len == 0 {
        return Err((StatusCode::BAD_REQUEST, ErrorBody::invalid("Empty request body")));
    }
    if len > MAX_BODY_BYTES {
        return Err((StatusCode::PAYLOAD_TOO_LARGE, ErrorBody::too_large()));
    }
    Ok(())
}

/// Pull the canonical id out of an uploaded record, if it carries one;
/// otherwise the server assigns a fresh uuid.
fn assigned_id(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("id").and_then(|id| id.as_str()).map(str::to_string))
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// In-memory cache with write-through persistence to the data directory.
struct BlobStore {
    drawings: DashMap<String, Bytes>,
    data_dir: PathBuf,
}

impl BlobStore {
    fn new(data_dir: PathBuf) -> Self {
        Self {
            drawings: DashMap::new(),
            data_dir,
        }
    }

    fn file_path(&self, id: &str) -> PathBuf {
        // Ids are uuids or timestamp strings; keep the path safe regardless.
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.data_dir.join(format!("{safe_id}.bin"))
    }

    async fn put(&self, id: &str, bytes: Bytes) -> std::io::Result<()> {
        self.drawings.insert(id.to_string(), bytes.clone());
        tokio::fs::create_dir_all(&self.data_dir).await?;
        tokio::fs::write(self.file_path(id), &bytes).await
    }

    /// Memory first, then the file fallback (warming the cache on a hit).
    async fn get(&self, id: &str) -> Option<Bytes> {
        if let Some(bytes) = self.drawings.get(id) {
            return Some(bytes.clone());
        }
        match tokio::fs::read(self.file_path(id)).await {
            Ok(data) => {
                let bytes = Bytes::from(data);
                self.drawings.insert(id.to_string(), bytes.clone());
                Some(bytes)
            }
            Err(_) => None,
        }
    }

    async fn remove(&self, id: &str) {
        self.drawings.remove(id);
        // A missing file still counts as a successful delete.
        let _ = tokio::fs::remove_file(self.file_path(id)).await;
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scrawl_server=info,tower_http=info".into()),
        )
        .init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(10000);
    let data_dir = std::env::var("SCRAWL_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./data"));

    let store = Arc::new(BlobStore::new(data_dir));

    let app = Router::new()
        .route("/save", post(save))
        .route("/load/{id}", get(load))
        .route("/delete/{id}", delete(remove))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES + 1024))
        .layer(CorsLayer::permissive())
        .with_state(store);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Scrawl blob store listening on {addr}");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("failed to bind {addr}: {err}");
            std::process::exit(1);
        }
    };
    if let Err(err) = axum::serve(listener, app).await {
        error!("server error: {err}");
        std::process::exit(1);
    }
}

async fn save(State(store): State<Arc<BlobStore>>, body: Bytes) -> Response {
    if let Err((status, error)) = validate_payload(body.len()) {
        return json_error(status, error);
    }

    let id = assigned_id(&body);
    match store.put(&id, body).await {
        Ok(()) => axum::Json(serde_json::json!({ "id": id })).into_response(),
        Err(err) => {
            error!("failed to persist drawing {id}: {err}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::server("Failed to save drawing"),
            )
        }
    }
}

async fn load(State(store): State<Arc<BlobStore>>, Path(id): Path<String>) -> Response {
    match store.get(&id).await {
        Some(bytes) => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            bytes,
        )
            .into_response(),
        None => json_error(StatusCode::NOT_FOUND, ErrorBody::not_found()),
    }
}

async fn remove(State(store): State<Arc<BlobStore>>, Path(id): Path<String>) -> Response {
    store.remove(&id).await;
    axum::Json(serde_json::json!({ "success": true })).into_response()
}

async fn health() -> Response {
    axum::Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
    .into_response()
}
