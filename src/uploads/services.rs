use anyhow::Context;
use axum::http::HeaderMap;
use bytes::Bytes;
use uuid::Uuid;

use crate::state::AppState;

pub struct UploadItem<'a> {
    pub body: Bytes,
    pub content_type: &'a str,
    pub file_name: Option<&'a str>,
}

/// Stores one image and returns its object key.
pub async fn store_image(st: &AppState, img: UploadItem<'_>) -> anyhow::Result<String> {
    anyhow::ensure!(!img.body.is_empty(), "empty upload");
    let ext = img
        .file_name
        .and_then(ext_from_file_name)
        .or_else(|| ext_from_mime(img.content_type).map(String::from))
        .unwrap_or_else(|| "bin".into());
    let key = format!("image-{}.{}", Uuid::new_v4(), ext);
    st.storage
        .put_image(&key, img.body, img.content_type)
        .await
        .with_context(|| format!("store image {}", key))?;
    Ok(key)
}

pub async fn presign_upload(st: &AppState, key: &str) -> anyhow::Result<String> {
    st.storage
        .presigned_url(key, st.config.media.url_ttl())
        .await
        .with_context(|| format!("presign url for {}", key))
}

/// Public URL for a stored key: `PUBLIC_BASE_URL` if set, else the request's own origin.
pub fn public_url(public_base_url: Option<&str>, headers: &HeaderMap, key: &str) -> String {
    let base = match public_base_url {
        Some(base) => base.to_string(),
        None => {
            let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
            let scheme = header("x-forwarded-proto").unwrap_or("http");
            let host = header("host").unwrap_or("localhost");
            format!("{}://{}", scheme, host)
        }
    };
    format!("{}/uploads/{}", base, key)
}

/// Keys are flat `image-<uuid>.<ext>` names.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn ext_from_file_name(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    let ok = !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric());
    ok.then(|| ext.to_ascii_lowercase())
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}
