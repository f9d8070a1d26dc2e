use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::{BlobResult, ByteStream, GetResult, PutResult};

/// Core content storage operations - must be implemented by all storage backends
///
/// Implementations must make `save` all-or-nothing: until the new bytes are
/// completely written, `has_content` and `open` keep reporting whatever was
/// committed before.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Whether fully committed content exists for `key`
    async fn has_content(&self, key: &str) -> BlobResult<bool>;

    /// Store content from a stream, replacing any previous content for `key`
    async fn save(
        &self,
        key: &str,
        content_type: Option<&str>,
        stream: ByteStream,
    ) -> BlobResult<PutResult>;

    /// Open committed content as a stream
    async fn open(&self, key: &str) -> BlobResult<GetResult>;

    /// Stream committed content into `sink`, returning the bytes written
    async fn load(
        &self,
        key: &str,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> BlobResult<u64> {
        let GetResult { mut stream, .. } = self.open(key).await?;
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            sink.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        sink.flush().await?;
        Ok(written)
    }

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}

/// Strategy for naming stored artifacts
pub trait ContentKeyStrategy: Send + Sync {
    /// Key of the committed artifact for a video id
    fn object_key(&self, video_id: u64) -> String;

    /// Key of an uncommitted upload, unique per upload attempt
    fn staging_key(&self, upload_token: &str) -> String;
}

/// Default key strategy: `videos/<id>.bin`, staging under `.staging/`
#[derive(Debug, Clone, Default)]
pub struct DefaultKeyStrategy;

pub(crate) const STAGING_DIR: &str = ".staging";

impl ContentKeyStrategy for DefaultKeyStrategy {
    fn object_key(&self, video_id: u64) -> String {
        format!("videos/{}.bin", video_id)
    }

    fn staging_key(&self, upload_token: &str) -> String {
        format!("{}/{}.part", STAGING_DIR, upload_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keys_are_named_by_id() {
        let keys = DefaultKeyStrategy;
        assert_eq!(keys.object_key(42), "videos/42.bin");
        assert_eq!(keys.staging_key("abc"), ".staging/abc.part");
    }
}
