mod app;

use std::sync::Arc;

use anyhow::Result;
use vid_axum::{axum, VidAxumApp};
use vid_blob::{ContentStore, FsContentStore, MemoryContentStore};
use vid_core::VideoService;

pub use app::{config_from_env, ServerSettings, StorageBackend};

pub async fn build(settings: &ServerSettings) -> Result<VidAxumApp> {
    let store: Arc<dyn ContentStore> = match &settings.storage {
        StorageBackend::Fs(root) => {
            Arc::new(FsContentStore::new(root.clone(), settings.blob.clone()).await?)
        }
        StorageBackend::Memory => Arc::new(MemoryContentStore::new(settings.blob.clone())),
    };

    tracing::info!(
        backend = store.backend_name(),
        public_url = settings.locator.base(),
        max_upload_bytes = settings.blob.max_blob_bytes,
        "content store ready"
    );

    let videos = VideoService::new(settings.locator.clone(), store);
    Ok(axum(videos))
}
