use sha2::{Digest, Sha256};

use crate::{BlobConfig, BlobError, BlobResult, ByteStream};

/// Result of a successful save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutResult {
    pub size_bytes: u64,
    /// Hex encoded SHA-256 of the stored bytes, when checksums are enabled
    pub checksum: Option<String>,
}

/// Committed content opened for reading
pub struct GetResult {
    pub stream: ByteStream,
    pub size_bytes: u64,
    pub content_type: Option<String>,
}

impl std::fmt::Debug for GetResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GetResult")
            .field("size_bytes", &self.size_bytes)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Byte accounting for an in-flight upload: size ceiling plus optional digest.
pub(crate) struct UploadMeter {
    received: u64,
    limit: u64,
    hasher: Option<Sha256>,
}

impl UploadMeter {
    pub(crate) fn new(config: &BlobConfig) -> Self {
        Self {
            received: 0,
            limit: config.max_blob_bytes,
            hasher: config.checksum.then(Sha256::new),
        }
    }

    /// Account for the next chunk, rejecting it if the ceiling would be crossed.
    pub(crate) fn accept(&mut self, chunk: &[u8]) -> BlobResult<()> {
        let next = self.received + chunk.len() as u64;
        if next > self.limit {
            return Err(BlobError::TooLarge { limit: self.limit });
        }
        if let Some(hasher) = self.hasher.as_mut() {
            hasher.update(chunk);
        }
        self.received = next;
        Ok(())
    }

    /// Wrap an error produced by the input stream.
    pub(crate) fn interrupted(&self, source: std::io::Error) -> BlobError {
        BlobError::Interrupted {
            received: self.received,
            source,
        }
    }

    #[cfg(test)]
    pub(crate) fn received(&self) -> u64 {
        self.received
    }

    pub(crate) fn finish(self) -> PutResult {
        PutResult {
            size_bytes: self.received,
            checksum: self.hasher.map(|h| hex::encode(h.finalize())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meter_rejects_chunk_crossing_limit() {
        let config = BlobConfig::new().with_max_blob_bytes(10);
        let mut meter = UploadMeter::new(&config);

        meter.accept(b"0123456789").unwrap();
        let err = meter.accept(b"x").unwrap_err();

        assert!(matches!(err, BlobError::TooLarge { limit: 10 }));
        assert_eq!(meter.received(), 10);
    }

    #[test]
    fn meter_digest_matches_one_shot_hash() {
        let mut meter = UploadMeter::new(&BlobConfig::default());
        meter.accept(b"hello ").unwrap();
        meter.accept(b"world").unwrap();

        let result = meter.finish();
        assert_eq!(result.size_bytes, 11);
        assert_eq!(
            result.checksum.as_deref(),
            Some(hex::encode(Sha256::digest(b"hello world")).as_str())
        );
    }

    #[test]
    fn meter_without_checksum() {
        let config = BlobConfig::new().with_checksum(false);
        let mut meter = UploadMeter::new(&config);
        meter.accept(b"abc").unwrap();
        assert_eq!(meter.finish().checksum, None);
    }
}
