use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use vid_core::VidError;

#[derive(Debug)]
pub struct VidAxumError(pub anyhow::Error);

impl From<anyhow::Error> for VidAxumError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

impl From<VidError> for VidAxumError {
    fn from(e: VidError) -> Self {
        Self(e.into_anyhow())
    }
}

impl IntoResponse for VidAxumError {
    fn into_response(self) -> Response {
        // A VidError anywhere in the chain keeps its kind and field errors
        let fallback;
        let err = match VidError::from_anyhow(&self.0) {
            Some(err) => err,
            None => {
                fallback = VidError::general_error(self.0.to_string());
                &fallback
            }
        };

        if err.code() >= 500 {
            tracing::error!(error = ?self.0, "request failed");
        }

        let safe = err.sanitize_for_client();
        let status = StatusCode::from_u16(safe.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(safe.to_json())).into_response()
    }
}
