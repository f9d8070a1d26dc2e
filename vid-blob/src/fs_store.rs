use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use futures_util::StreamExt;
use tokio::fs;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::receipt::UploadMeter;
use crate::store::STAGING_DIR;
use crate::{
    BlobConfig, BlobError, BlobResult, ByteStream, ContentKeyStrategy, ContentStore,
    DefaultKeyStrategy, GetResult, PutResult,
};

/// Filesystem content store.
///
/// Uploads are streamed into a uniquely named staging file, flushed and
/// synced, then published with a rename over the final path. The rename is
/// the only step that runs under the per-key commit lock, so transfers for
/// the same or different keys never wait on each other's I/O.
///
/// Readers hold their own file handle: a reader that opened the old artifact
/// keeps reading it in full even if a newer upload is committed meanwhile
/// (POSIX rename semantics).
pub struct FsContentStore {
    root: PathBuf,
    keys: Arc<dyn ContentKeyStrategy>,
    config: BlobConfig,
    commit_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl FsContentStore {
    /// Create a store rooted at `root`, creating it if needed and purging
    /// staging files left over by a previous process.
    pub async fn new(root: impl Into<PathBuf>, config: BlobConfig) -> BlobResult<Self> {
        let root = root.into();
        fs::create_dir_all(root.join(STAGING_DIR)).await?;

        let store = Self {
            root,
            keys: Arc::new(DefaultKeyStrategy),
            config,
            commit_locks: DashMap::new(),
        };

        let purged = store.purge_staging().await?;
        if purged > 0 {
            info!(root = %store.root.display(), purged, "Removed stale staging files");
        }

        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &BlobConfig {
        &self.config
    }

    /// Resolve a storage key below the root, rejecting anything that could
    /// escape it.
    fn key_to_path(&self, key: &str) -> BlobResult<PathBuf> {
        let relative = Path::new(key);
        let well_formed = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        if !well_formed {
            return Err(BlobError::invalid(format!("Invalid storage key: {}", key)));
        }

        Ok(self.root.join(relative))
    }

    fn commit_lock(&self, key: &str) -> Arc<Mutex<()>> {
        self.commit_locks.entry(key.to_string()).or_default().clone()
    }

    async fn ensure_parent_dir(path: &Path) -> BlobResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn purge_staging(&self) -> BlobResult<usize> {
        let dir = self.root.join(STAGING_DIR);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                fs::remove_file(entry.path()).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn write_and_commit(&self, key: &str, mut stream: ByteStream) -> BlobResult<PutResult> {
        let final_path = self.key_to_path(key)?;
        let token = Uuid::new_v4().simple().to_string();
        let staging_path = self.key_to_path(&self.keys.staging_key(&token))?;

        Self::ensure_parent_dir(&final_path).await?;
        Self::ensure_parent_dir(&staging_path).await?;

        // Removes the staging file on every early return, including when the
        // caller drops this future mid-transfer.
        let mut staged = StagedFile::new(staging_path.clone());

        let file = fs::File::create(&staging_path).await?;
        let mut writer = BufWriter::with_capacity(self.config.chunk_size, file);
        let mut meter = UploadMeter::new(&self.config);

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| meter.interrupted(e))?;
            meter.accept(&chunk)?;
            writer.write_all(&chunk).await?;
        }

        writer.flush().await?;
        let file = writer.into_inner();
        file.sync_all().await?;
        drop(file);

        let lock = self.commit_lock(key);
        {
            let _commit = lock.lock().await;
            fs::rename(&staging_path, &final_path).await?;
            staged.disarm();
        }

        debug!(key = %key, staging = %token, "Committed staged upload");
        Ok(meter.finish())
    }
}

#[async_trait]
impl ContentStore for FsContentStore {
    async fn has_content(&self, key: &str) -> BlobResult<bool> {
        let path = self.key_to_path(key)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(
        &self,
        key: &str,
        _content_type: Option<&str>,
        stream: ByteStream,
    ) -> BlobResult<PutResult> {
        let start = std::time::Instant::now();

        match self.write_and_commit(key, stream).await {
            Ok(result) => {
                info!(
                    key = %key,
                    size_bytes = result.size_bytes,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Filesystem content save successful"
                );
                Ok(result)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Filesystem content save failed, previous content left in place");
                Err(e)
            }
        }
    }

    async fn open(&self, key: &str) -> BlobResult<GetResult> {
        let path = self.key_to_path(key)?;
        let file = fs::File::open(&path)
            .await
            .map_err(|e| BlobError::from_io_for_key(e, key))?;
        let size_bytes = file.metadata().await?.len();

        debug!(key = %key, size_bytes, "Opened filesystem content");

        Ok(GetResult {
            stream: Box::pin(ReaderStream::with_capacity(file, self.config.chunk_size)),
            size_bytes,
            content_type: None,
        })
    }

    fn backend_name(&self) -> &'static str {
        "fs"
    }
}

/// Staging file that deletes itself unless it was committed.
struct StagedFile {
    path: PathBuf,
    armed: bool,
}

impl StagedFile {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "Failed to remove staging file");
            }
        }
    }
}
