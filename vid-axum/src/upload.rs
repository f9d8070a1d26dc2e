//! Request bodies to content streams.
//!
//! Uploads arrive either as `multipart/form-data` with the payload in a part
//! named `data`, or as a raw body. Either way the bytes are handed to the
//! store as a stream; nothing here buffers the whole payload.

use axum::body::Body;
use axum::http::{header, HeaderMap};
use futures::TryStreamExt;
use vid_blob::ByteStream;
use vid_core::VidError;

use crate::VidAxumError;

/// Name of the multipart part that carries the video bytes.
pub const DATA_FIELD: &str = "data";

/// Turn an upload request body into a [`ByteStream`].
pub async fn content_stream(headers: &HeaderMap, body: Body) -> Result<ByteStream, VidAxumError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if !content_type.starts_with("multipart/form-data") {
        return Ok(raw_stream(body));
    }

    let boundary = multer::parse_boundary(content_type).map_err(|e| {
        VidError::bad_request("Missing boundary in multipart content-type")
            .with_source(e)
    })?;

    // multer reads straight from the connection
    let mut multipart = multer::Multipart::new(body.into_data_stream(), boundary);

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| VidError::bad_request(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() == Some(DATA_FIELD) {
            tracing::debug!(
                file_name = field.file_name().unwrap_or("-"),
                part_content_type = ?field.content_type(),
                "streaming multipart upload"
            );
            return Ok(vid_blob::boxed(field.map_err(std::io::Error::other)));
        }
    }

    Err(VidError::bad_request(format!("Multipart body has no `{}` part", DATA_FIELD))
        .with_errors(serde_json::json!({ "data": ["required"] }))
        .into())
}

fn raw_stream(body: Body) -> ByteStream {
    vid_blob::boxed(body.into_data_stream().map_err(std::io::Error::other))
}
