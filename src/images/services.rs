use anyhow::Context;
use axum::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, error, warn};

use crate::storage::StorageClient;

pub const IMAGE_URL_TTL_SECS: u64 = 30 * 60;

/// Source of remote image bytes.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Returns the body and its content type.
    async fn fetch(&self, url: &str) -> anyhow::Result<(Bytes, String)>;
}

#[derive(Clone, Default)]
pub struct HttpImageSource {
    http: Client,
}

impl HttpImageSource {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &str) -> anyhow::Result<(Bytes, String)> {
        let res = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {}", url))?
            .error_for_status()
            .with_context(|| format!("GET {}", url))?;
        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let body = res.bytes().await.context("read image body")?;
        Ok((body, content_type))
    }
}

/// Stores under `recipes/<external id>.<ext>`; any failure is logged and yields `None`.
pub async fn archive_recipe_image(
    storage: &dyn StorageClient,
    source: &dyn ImageSource,
    external_id: &str,
    image_url: Option<&str>,
) -> Option<String> {
    let Some(url) = image_url.filter(|u| !u.is_empty()) else {
        warn!(external_id, "recipe has no image url");
        return None;
    };

    let (body, content_type) = match source.fetch(url).await {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, external_id, url, "failed to download recipe image");
            return None;
        }
    };

    let content_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    let ext = ext_from_mime(&content_type).unwrap_or("bin");
    let key = format!("recipes/{}.{}", external_id, ext);

    match storage.put_object(&key, body, &content_type).await {
        Ok(()) => {
            debug!(external_id, key = %key, "recipe image archived");
            Some(key)
        }
        Err(e) => {
            error!(error = %e, external_id, url, "failed to upload recipe image");
            None
        }
    }
}

pub async fn presign_image(storage: &dyn StorageClient, key: &str) -> Option<String> {
    match storage.presign_get(key, IMAGE_URL_TTL_SECS).await {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(error = %e, key, "presign recipe image failed");
            None
        }
    }
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}
