use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::{VidError, VidResult};
use crate::ids::VideoId;

/// Metadata of a video.
///
/// `id` and `data_url` are owned by the registry: an incoming record with
/// `id == 0` gets both assigned on publish, and a client supplied `data_url`
/// is always replaced by the derived one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    #[serde(default)]
    pub id: VideoId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub data_url: String,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub rating_count: u64,
}

impl VideoRecord {
    /// A record ready to publish: no id, no locator, no ratings.
    pub fn new(title: impl Into<String>, duration: u64, content_type: impl Into<String>) -> Self {
        Self {
            id: VideoId::UNASSIGNED,
            title: title.into(),
            duration,
            content_type: content_type.into(),
            data_url: String::new(),
            average_rating: 0.0,
            rating_count: 0,
        }
    }

    pub fn with_id(mut self, id: impl Into<VideoId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_rating(mut self, average_rating: f64, rating_count: u64) -> Self {
        self.average_rating = average_rating;
        self.rating_count = rating_count;
        self
    }

    /// Reject metadata that must never get an id.
    pub fn validate(&self) -> VidResult<()> {
        let mut errors = serde_json::Map::new();

        if self.title.trim().is_empty() {
            errors.insert("title".into(), json!(["required"]));
        }

        let content_type = self.content_type.trim();
        if content_type.is_empty() {
            errors.insert("contentType".into(), json!(["required"]));
        } else if !is_mime_like(content_type) {
            errors.insert("contentType".into(), json!(["must look like type/subtype"]));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(VidError::invalid_input("Invalid video metadata")
                .with_errors(serde_json::Value::Object(errors)))
        }
    }
}

fn is_mime_like(value: &str) -> bool {
    match value.split_once('/') {
        Some((kind, subtype)) => {
            !kind.is_empty()
                && !subtype.is_empty()
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Lifecycle state, derived from content store presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VideoState {
    NoContent,
    Ready,
}

impl VideoState {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoState::NoContent => "NO_CONTENT",
            VideoState::Ready => "READY",
        }
    }
}

impl std::fmt::Display for VideoState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport shape of the lifecycle state: `{"state": "READY"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoStatus {
    pub state: VideoState,
}

impl VideoStatus {
    pub fn new(state: VideoState) -> Self {
        Self { state }
    }

    pub fn ready() -> Self {
        Self::new(VideoState::Ready)
    }

    pub fn no_content() -> Self {
        Self::new(VideoState::NoContent)
    }
}
