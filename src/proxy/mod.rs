//! Image cache proxy
//!
//! Serves card images from a local disk cache, proxy-downloading them from
//! the origin host on first request. A requested file is only downloaded if
//! its slug matches a stored card record; that gate keeps forged image paths
//! from turning the proxy into an open relay. Card art is immutable once
//! published, so served images carry 30-day cache headers. Any failure is a
//! plain-text 503 to the caller.

mod paths;

pub use paths::{cache_file_path, origin_url, slug_for_image, split_image_name};

use crate::config::Config;
use crate::crawler::build_http_client;
use crate::storage::{CardStore, SqliteCardStore, StoreError};
use crate::Result;
use axum::extract::{Path as UrlPath, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Browsers may cache served images for 30 days
const IMAGE_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 30;

/// Shared state for the proxy handlers
pub struct ProxyState {
    pub store: Mutex<SqliteCardStore>,
    pub client: reqwest::Client,
    pub image_cache_dir: PathBuf,
    pub image_origin: String,
}

/// Errors internal to the proxy; every one surfaces to the caller as a 503
#[derive(Debug, Error)]
enum ProxyError {
    #[error("Bad image file name: {0}")]
    BadImageName(String),

    #[error("No record for slug: {0}")]
    UnknownSlug(String),

    #[error("Image download failed for {url}: status {status}")]
    DownloadStatus { url: String, status: u16 },

    #[error("Image download failed for {url}: {source}")]
    Download { url: String, source: reqwest::Error },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Internal(String),
}

/// Builds the proxy router
pub fn router(state: Arc<ProxyState>) -> Router {
    Router::new()
        .route("/:product_dir/:image_file", get(serve_image))
        .with_state(state)
}

/// Runs the image proxy server until it is shut down
pub async fn serve(config: &Config, store: SqliteCardStore) -> Result<()> {
    let addr: SocketAddr = config.server.bind.parse().map_err(|e| {
        crate::ConfigError::Validation(format!("bind is not a valid socket address: {}", e))
    })?;

    let state = Arc::new(ProxyState {
        store: Mutex::new(store),
        client: build_http_client(&config.user_agent)?,
        image_cache_dir: PathBuf::from(&config.output.image_cache_dir),
        image_origin: config.source.image_origin.clone(),
    });

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "image proxy listening");

    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn serve_image(
    State(state): State<Arc<ProxyState>>,
    UrlPath((product_dir, image_file)): UrlPath<(String, String)>,
) -> Response {
    match handle_image(&state, &product_dir, &image_file).await {
        Ok(bytes) => image_response(bytes),
        Err(e) => {
            tracing::warn!(%product_dir, %image_file, error = %e, "image request failed");
            (StatusCode::SERVICE_UNAVAILABLE, "image not found").into_response()
        }
    }
}

async fn handle_image(
    state: &ProxyState,
    product_dir: &str,
    image_file: &str,
) -> std::result::Result<Vec<u8>, ProxyError> {
    // Path traversal guard; the router never passes '/' in a segment.
    if product_dir.contains("..") || image_file.contains("..") {
        return Err(ProxyError::BadImageName(image_file.to_string()));
    }

    let cache_path = cache_file_path(&state.image_cache_dir, product_dir, image_file)
        .ok_or_else(|| ProxyError::BadImageName(image_file.to_string()))?;

    match tokio::fs::read(&cache_path).await {
        Ok(bytes) => {
            tracing::debug!(path = %cache_path.display(), "image cache hit");
            return Ok(bytes);
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %cache_path.display(), "image cache miss");
        }
        Err(e) => return Err(e.into()),
    }

    // Refuse to proxy anything the crawler has not seen as a card.
    let slug = slug_for_image(image_file);
    let known = {
        let store = state
            .store
            .lock()
            .map_err(|_| ProxyError::Internal("store lock poisoned".to_string()))?;
        store.exists_by_slug(slug)?
    };
    if !known {
        return Err(ProxyError::UnknownSlug(slug.to_string()));
    }

    let url = origin_url(&state.image_origin, product_dir, image_file);
    let bytes = download(state, &url).await?;

    if let Some(parent) = cache_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    if let Err(e) = tokio::fs::write(&cache_path, &bytes).await {
        // Never leave a partial file behind to be served as a hit later.
        let _ = tokio::fs::remove_file(&cache_path).await;
        return Err(e.into());
    }

    tracing::info!(%url, path = %cache_path.display(), "image cached");
    Ok(bytes)
}

async fn download(state: &ProxyState, url: &str) -> std::result::Result<Vec<u8>, ProxyError> {
    let response = state
        .client
        .get(url)
        .send()
        .await
        .map_err(|source| ProxyError::Download {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(ProxyError::DownloadStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|source| ProxyError::Download {
            url: url.to_string(),
            source,
        })?;

    Ok(bytes.to_vec())
}

fn image_response(bytes: Vec<u8>) -> Response {
    let expires = (Utc::now() + chrono::Duration::seconds(IMAGE_MAX_AGE_SECS))
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string();

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/jpeg".to_string()),
            (
                header::CACHE_CONTROL,
                format!("public, max-age={}", IMAGE_MAX_AGE_SECS),
            ),
            (header::EXPIRES, expires),
        ],
        bytes,
    )
        .into_response()
}
