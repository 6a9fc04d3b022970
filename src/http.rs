//! HTTP server for stored blobs.
//!
//! Serves `GET /<name>` from the blob directory so the links handed to IRC
//! clients resolve. Runs on its own task next to the gateway.

use std::net::SocketAddr;
use std::path::Path as FsPath;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tracing::{error, info, warn};

use crate::blob::{BlobError, FsBlobStore};

pub fn router(store: Arc<FsBlobStore>) -> Router {
    Router::new()
        .route("/:name", get(get_blob))
        .with_state(store)
}

async fn get_blob(State(store): State<Arc<FsBlobStore>>, Path(name): Path<String>) -> Response {
    match store.get(&name).await {
        Ok(data) => ([(header::CONTENT_TYPE, content_type(&name))], data).into_response(),
        Err(BlobError::NotFound(_) | BlobError::InvalidName(_)) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            warn!(name = %name, error = %e, "Failed to read blob");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Content type guessed from the file extension.
fn content_type(name: &str) -> &'static str {
    let ext = FsPath::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("mp4") => "video/mp4",
        Some("ogg" | "opus") => "audio/ogg",
        Some("mp3") => "audio/mpeg",
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Serve the blob directory on `addr`.
///
/// Long-running; spawn it in the background.
pub async fn run_http_server(addr: SocketAddr, store: Arc<FsBlobStore>) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "Failed to bind blob HTTP server");
            return;
        }
    };
    info!(%addr, path = %store.base_path().display(), "Blob HTTP server listening");

    if let Err(e) = axum::serve(listener, router(store)).await {
        error!(error = %e, "Blob HTTP server error");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::BlobStore;
    use tempfile::TempDir;

    async fn store() -> (TempDir, Arc<FsBlobStore>) {
        let dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(dir.path().to_path_buf(), "http://localhost:3000", 1024)
            .await
            .unwrap();
        (dir, Arc::new(store))
    }

    #[tokio::test]
    async fn serves_stored_blob_with_type() {
        let (_dir, store) = store().await;
        store.store("qr-1.svg", b"<svg/>").await.unwrap();

        let response = get_blob(State(store), Path("qr-1.svg".to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/svg+xml"
        );
    }

    #[tokio::test]
    async fn missing_and_invalid_names_are_404() {
        let (_dir, store) = store().await;
        let missing = get_blob(State(store.clone()), Path("nope.png".to_string())).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let escape = get_blob(State(store), Path("../etc/passwd".to_string())).await;
        assert_eq!(escape.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unknown_extensions_are_binary() {
        assert_eq!(content_type("a.JPG"), "image/jpeg");
        assert_eq!(content_type("archive.tar.zst"), "application/octet-stream");
        assert_eq!(content_type("noext"), "application/octet-stream");
    }
}
