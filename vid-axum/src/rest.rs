use axum::{
    body::Body,
    extract::rejection::{JsonRejection, PathRejection},
    extract::{DefaultBodyLimit, Path, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use serde_json::json;
use vid_core::{VidError, VideoId, VideoRecord};

use crate::{upload, VidAxumError, VidAxumState};

fn map_json_rejection(rejection: JsonRejection) -> VidAxumError {
    VidError::bad_request("Failed to parse the request body as JSON")
        .with_errors(json!({"_schema": [rejection.body_text()]}))
        .into()
}

fn video_id(path: Result<Path<u64>, PathRejection>) -> Result<VideoId, VidAxumError> {
    let Path(id) = path.map_err(|rejection| {
        VidAxumError::from(
            VidError::bad_request("Video id must be a positive integer")
                .with_errors(json!({"id": [rejection.body_text()]})),
        )
    })?;
    Ok(VideoId(id))
}

/// Routes mounted under `/video`.
pub fn video_router(state: VidAxumState) -> Router<()> {
    Router::new()
        .route(
            "/",
            routing::get(|State(state): State<VidAxumState>| async move {
                Json(state.videos.list())
            })
            .post(
                |State(state): State<VidAxumState>,
                 data: Result<Json<VideoRecord>, JsonRejection>| async move {
                    let Json(record) = data.map_err(map_json_rejection)?;
                    let stored = state.videos.publish(record)?;
                    Ok::<_, VidAxumError>(Json(stored))
                },
            ),
        )
        .route(
            "/{id}",
            routing::get(
                |State(state): State<VidAxumState>,
                 path: Result<Path<u64>, PathRejection>| async move {
                    let id = video_id(path)?;
                    Ok::<_, VidAxumError>(Json(state.videos.get(id)?))
                },
            ),
        )
        .route(
            "/{id}/status",
            routing::get(
                |State(state): State<VidAxumState>,
                 path: Result<Path<u64>, PathRejection>| async move {
                    let id = video_id(path)?;
                    let status = state.videos.current_status(id).await?;
                    Ok::<_, VidAxumError>(Json(status))
                },
            ),
        )
        .route(
            "/{id}/data",
            routing::get(
                |State(state): State<VidAxumState>,
                 path: Result<Path<u64>, PathRejection>| async move {
                    let id = video_id(path)?;
                    download(state, id).await
                },
            )
            .post(
                |State(state): State<VidAxumState>,
                 path: Result<Path<u64>, PathRejection>,
                 headers: HeaderMap,
                 body: Body| async move {
                    let id = video_id(path)?;
                    // unknown ids are rejected before the body is read
                    state.videos.get(id)?;
                    let stream = upload::content_stream(&headers, body).await?;
                    let status = state.videos.attach_content(id, stream).await?;
                    Ok::<_, VidAxumError>(Json(status))
                },
            )
            .layer(DefaultBodyLimit::disable()),
        )
        .with_state(state)
}

async fn download(state: VidAxumState, id: VideoId) -> Result<Response, VidAxumError> {
    let content = state.videos.open_content(id).await?;

    let content_type = HeaderValue::from_str(&content.record.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_LENGTH, HeaderValue::from(content.size_bytes)),
        ],
        Body::from_stream(content.stream),
    )
        .into_response())
}

pub async fn health() -> &'static str {
    "ok"
}
