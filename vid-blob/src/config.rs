/// Configuration for content store operations
#[derive(Debug, Clone)]
pub struct BlobConfig {
    /// Absolute max size allowed for a single payload (safety guard)
    pub max_blob_bytes: u64,

    /// Read chunk and write buffer size. Bounds the memory a single
    /// transfer holds at any time.
    pub chunk_size: usize,

    /// Compute a SHA-256 checksum while streaming uploads
    pub checksum: bool,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            max_blob_bytes: 2 * 1024 * 1024 * 1024, // 2GB
            chunk_size: 64 * 1024,                  // 64KB
            checksum: true,
        }
    }
}

impl BlobConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max payload size
    pub fn with_max_blob_bytes(mut self, bytes: u64) -> Self {
        self.max_blob_bytes = bytes;
        self
    }

    /// Set the transfer chunk size (clamped to at least 1KB)
    pub fn with_chunk_size(mut self, bytes: usize) -> Self {
        self.chunk_size = bytes.max(1024);
        self
    }

    /// Enable or disable upload checksums
    pub fn with_checksum(mut self, enabled: bool) -> Self {
        self.checksum = enabled;
        self
    }
}
