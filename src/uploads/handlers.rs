use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, Path, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{info, instrument};

use super::services::{is_valid_key, presign_upload, public_url, store_image, UploadItem};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Mounted under `/api`.
pub fn upload_routes(max_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_image))
        .layer(DefaultBodyLimit::max(max_bytes))
}

/// Mounted at the root, where upload URLs point.
pub fn media_routes() -> Router<AppState> {
    Router::new().route("/uploads/:key", get(get_upload))
}

/// POST /api/upload (multipart), field `image`
#[instrument(skip(state, headers, mp))]
pub async fn upload_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    mp: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    let mut mp = mp.map_err(|e| AppError::Invalid(e.body_text()))?;
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::Invalid(e.body_text()))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".into());
        let file_name = field.file_name().map(|s| s.to_string());
        let body = field
            .bytes()
            .await
            .map_err(|e| AppError::Invalid(e.body_text()))?;
        if body.is_empty() {
            return Err(AppError::Invalid("No file uploaded".into()));
        }

        let key = store_image(
            &state,
            UploadItem {
                body,
                content_type: &content_type,
                file_name: file_name.as_deref(),
            },
        )
        .await
        .map_err(|e| AppError::unavailable("store upload", e))?;

        info!(%key, "image uploaded");
        let url = public_url(state.config.media.public_base_url.as_deref(), &headers, &key);
        return Ok(Json(UploadResponse { url }));
    }
    Err(AppError::Invalid("No file uploaded".into()))
}

/// 307 to a presigned URL for the stored object.
#[instrument(skip(state))]
pub async fn get_upload(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<impl IntoResponse> {
    if !is_valid_key(&key) {
        return Err(AppError::NotFound("Upload not found".into()));
    }
    let url = presign_upload(&state, &key)
        .await
        .map_err(|e| AppError::unavailable("presign upload", e))?;
    Ok(Redirect::temporary(&url))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt as _;

    use crate::test_support::{send, TestApp};

    const BOUNDARY: &str = "XcampusXchefX";

    fn multipart_request(field: &str, body: &[u8]) -> Request<Body> {
        let mut payload = Vec::new();
        payload.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"curry.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        payload.extend_from_slice(body);
        payload.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(header::HOST, "localhost:4000")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(payload))
            .unwrap()
    }

    #[tokio::test]
    async fn upload_stores_object_and_returns_public_url() {
        let app = TestApp::new();
        let res = app
            .router
            .clone()
            .oneshot(multipart_request("image", b"\xff\xd8jpeg-bytes"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let url = json["url"].as_str().unwrap();
        assert!(url.starts_with("http://localhost:4000/uploads/image-"));
        assert!(url.ends_with(".jpg"));

        let stored = app.storage.keys();
        assert_eq!(stored.len(), 1);
        assert!(url.ends_with(&stored[0]));
    }

    #[tokio::test]
    async fn upload_without_image_field_is_bad_request() {
        let app = TestApp::new();
        let res = app
            .router
            .clone()
            .oneshot(multipart_request("file", b"bytes"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(app.storage.keys().is_empty());
    }

    #[tokio::test]
    async fn non_multipart_upload_returns_json_error() {
        let app = TestApp::new();
        let (status, body) = send(
            &app.router,
            "POST",
            "/api/upload",
            Some(serde_json::json!({ "image": "not-a-file" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body["error"].as_str().unwrap().is_empty());
        assert!(app.storage.keys().is_empty());
    }

    #[tokio::test]
    async fn uploads_redirect_to_presigned_url() {
        let app = TestApp::new();
        let res = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/uploads/image-abc.jpg")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            res.headers()[header::LOCATION],
            "https://fake.local/image-abc.jpg?ttl=600"
        );

        let (status, _) = send(&app.router, "GET", "/uploads/..hidden", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
