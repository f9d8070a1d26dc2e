use std::sync::Arc;

use tokio::io::AsyncWrite;
use tracing::{info, instrument, warn};
use vid_blob::{BlobError, ByteStream, ContentKeyStrategy, ContentStore, DefaultKeyStrategy};

use crate::errors::{VidError, VidResult};
use crate::ids::VideoId;
use crate::locator::Locator;
use crate::record::{VideoRecord, VideoState, VideoStatus};
use crate::registry::VideoRegistry;

/// Committed content opened for download, together with its metadata.
pub struct VideoContent {
    pub record: VideoRecord,
    pub stream: ByteStream,
    pub size_bytes: u64,
}

impl std::fmt::Debug for VideoContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoContent")
            .field("record", &self.record)
            .field("size_bytes", &self.size_bytes)
            .finish_non_exhaustive()
    }
}

/// Ties the registry to a content store.
///
/// The registry answers "does this video exist", the store answers "are its
/// bytes committed". Nothing here holds a lock while bytes move.
#[derive(Clone)]
pub struct VideoService {
    registry: Arc<VideoRegistry>,
    store: Arc<dyn ContentStore>,
    keys: Arc<dyn ContentKeyStrategy>,
}

impl VideoService {
    pub fn new(locator: Locator, store: Arc<dyn ContentStore>) -> Self {
        Self::with_parts(Arc::new(VideoRegistry::new(locator)), store, Arc::new(DefaultKeyStrategy))
    }

    pub fn with_parts(
        registry: Arc<VideoRegistry>,
        store: Arc<dyn ContentStore>,
        keys: Arc<dyn ContentKeyStrategy>,
    ) -> Self {
        Self {
            registry,
            store,
            keys,
        }
    }

    pub fn registry(&self) -> &Arc<VideoRegistry> {
        &self.registry
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    fn key_for(&self, id: VideoId) -> String {
        self.keys.object_key(id.get())
    }

    pub fn publish(&self, record: VideoRecord) -> VidResult<VideoRecord> {
        self.registry.publish(record)
    }

    pub fn list(&self) -> Vec<VideoRecord> {
        self.registry.list()
    }

    pub fn get(&self, id: VideoId) -> VidResult<VideoRecord> {
        self.registry.get(id)
    }

    /// Store the payload for an existing video.
    ///
    /// On failure the previous content (if any) stays authoritative and the
    /// error is returned; the state never silently becomes `READY`.
    #[instrument(skip(self, stream), fields(video_id = %id, backend = self.store.backend_name()))]
    pub async fn attach_content(&self, id: VideoId, stream: ByteStream) -> VidResult<VideoStatus> {
        let record = self.registry.get(id)?;
        let key = self.key_for(id);

        match self
            .store
            .save(&key, Some(record.content_type.as_str()), stream)
            .await
        {
            Ok(put) => {
                info!(
                    key = %key,
                    size_bytes = put.size_bytes,
                    checksum = put.checksum.as_deref().unwrap_or("-"),
                    "video content stored"
                );
                Ok(VideoStatus::ready())
            }
            Err(err) => {
                warn!(key = %key, error = %err, retriable = err.is_retriable(), "video upload failed");
                Err(err.into())
            }
        }
    }

    /// Stream committed content into `sink`, returning the bytes written.
    #[instrument(skip(self, sink), fields(video_id = %id))]
    pub async fn fetch_content(
        &self,
        id: VideoId,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> VidResult<u64> {
        self.registry.get(id)?;
        let key = self.key_for(id);

        self.store
            .load(&key, sink)
            .await
            .map_err(|err| content_error(id, err))
    }

    /// Open committed content for streaming without a sink.
    #[instrument(skip(self), fields(video_id = %id))]
    pub async fn open_content(&self, id: VideoId) -> VidResult<VideoContent> {
        let record = self.registry.get(id)?;
        let key = self.key_for(id);

        let opened = self
            .store
            .open(&key)
            .await
            .map_err(|err| content_error(id, err))?;

        Ok(VideoContent {
            record,
            stream: opened.stream,
            size_bytes: opened.size_bytes,
        })
    }

    pub async fn current_status(&self, id: VideoId) -> VidResult<VideoStatus> {
        self.registry.get(id)?;
        let state = if self.store.has_content(&self.key_for(id)).await? {
            VideoState::Ready
        } else {
            VideoState::NoContent
        };
        Ok(VideoStatus::new(state))
    }
}

fn content_error(id: VideoId, err: BlobError) -> VidError {
    if err.is_not_found() {
        VidError::not_found(format!("Video {} has no content yet", id)).with_source(err)
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use vid_blob::{BlobConfig, MemoryContentStore};

    fn service() -> (VideoService, MemoryContentStore) {
        let store = MemoryContentStore::new(BlobConfig::default().with_max_blob_bytes(1024));
        let svc = VideoService::new(
            Locator::new("http://localhost:8080").unwrap(),
            Arc::new(store.clone()),
        );
        (svc, store)
    }

    fn failing(prefix: &'static [u8]) -> ByteStream {
        vid_blob::boxed(futures::stream::iter(vec![
            Ok(Bytes::from_static(prefix)),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "client went away")),
        ]))
    }

    #[tokio::test]
    async fn new_video_has_no_content() {
        let (svc, _) = service();
        let video = svc.publish(VideoRecord::new("demo", 1, "video/mp4")).unwrap();

        let status = svc.current_status(video.id).await.unwrap();
        assert_eq!(status.state, VideoState::NoContent);

        let err = svc.open_content(video.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn upload_then_download() {
        let (svc, _) = service();
        let video = svc.publish(VideoRecord::new("demo", 1, "video/mp4")).unwrap();

        let body = vid_blob::chunked(Bytes::from_static(b"frames"), 2);
        let status = svc.attach_content(video.id, body).await.unwrap();
        assert_eq!(status, VideoStatus::ready());
        assert_eq!(svc.current_status(video.id).await.unwrap(), VideoStatus::ready());

        let mut sink = Vec::new();
        let written = svc.fetch_content(video.id, &mut sink).await.unwrap();
        assert_eq!(written, 6);
        assert_eq!(sink, b"frames");
    }

    #[tokio::test]
    async fn unknown_id_never_reaches_store() {
        let (svc, store) = service();
        let body = vid_blob::chunked(Bytes::from_static(b"x"), 1);

        let err = svc.attach_content(VideoId(9), body).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn failed_upload_is_surfaced() {
        let (svc, _) = service();
        let video = svc.publish(VideoRecord::new("demo", 1, "video/mp4")).unwrap();

        let err = svc.attach_content(video.id, failing(b"part")).await.unwrap_err();
        assert_eq!(err.code(), 500);
        assert_eq!(
            svc.current_status(video.id).await.unwrap().state,
            VideoState::NoContent
        );
    }

    #[tokio::test]
    async fn oversized_upload_keeps_previous_content() {
        let (svc, _) = service();
        let video = svc.publish(VideoRecord::new("demo", 1, "video/mp4")).unwrap();
        svc.attach_content(video.id, vid_blob::chunked(Bytes::from_static(b"v1"), 2))
            .await
            .unwrap();

        let big = vid_blob::chunked(Bytes::from(vec![7u8; 4096]), 512);
        let err = svc.attach_content(video.id, big).await.unwrap_err();
        assert_eq!(err.code(), 413);

        let mut sink = Vec::new();
        svc.fetch_content(video.id, &mut sink).await.unwrap();
        assert_eq!(sink, b"v1");
    }

    #[tokio::test]
    async fn open_content_reports_size() {
        let (svc, _) = service();
        let video = svc.publish(VideoRecord::new("demo", 1, "video/webm")).unwrap();
        svc.attach_content(video.id, vid_blob::chunked(Bytes::from_static(b"abcdef"), 4))
            .await
            .unwrap();

        let content = svc.open_content(video.id).await.unwrap();
        assert_eq!(content.size_bytes, 6);
        assert_eq!(content.record.content_type, "video/webm");
    }
}
