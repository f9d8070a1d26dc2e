use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::BytesMut;
use futures_util::StreamExt;
use parking_lot::RwLock;

use crate::receipt::UploadMeter;
use crate::{BlobConfig, BlobError, BlobResult, ByteStream, ContentStore, GetResult, PutResult};

#[derive(Debug, Clone)]
struct StoredContent {
    data: bytes::Bytes,
    content_type: Option<String>,
}

/// In-memory content store for development and tests.
///
/// Payloads live entirely in memory once committed. Incoming bytes are
/// staged in a private buffer and swapped in only when the stream ends
/// cleanly, so a failed save never replaces existing content.
#[derive(Clone, Default)]
pub struct MemoryContentStore {
    blobs: Arc<RwLock<HashMap<String, StoredContent>>>,
    config: BlobConfig,
}

impl MemoryContentStore {
    pub fn new(config: BlobConfig) -> Self {
        Self {
            blobs: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Number of committed artifacts
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn has_content(&self, key: &str) -> BlobResult<bool> {
        Ok(self.blobs.read().contains_key(key))
    }

    async fn save(
        &self,
        key: &str,
        content_type: Option<&str>,
        mut stream: ByteStream,
    ) -> BlobResult<PutResult> {
        let mut staged = BytesMut::new();
        let mut meter = UploadMeter::new(&self.config);

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| meter.interrupted(e))?;
            meter.accept(&chunk)?;
            staged.extend_from_slice(&chunk);
        }

        let stored = StoredContent {
            data: staged.freeze(),
            content_type: content_type.map(str::to_string),
        };
        self.blobs.write().insert(key.to_string(), stored);

        Ok(meter.finish())
    }

    async fn open(&self, key: &str) -> BlobResult<GetResult> {
        let stored = self
            .blobs
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| BlobError::not_found(key))?;

        Ok(GetResult {
            size_bytes: stored.data.len() as u64,
            stream: crate::chunked(stored.data, self.config.chunk_size),
            content_type: stored.content_type,
        })
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
