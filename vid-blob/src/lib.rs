//! # vid-blob: streaming content storage for video payloads
//!
//! `vid-blob` stores the binary side of a video: one artifact per storage
//! key, written from a stream of unknown length and read back as a stream.
//! It knows nothing about video metadata; callers map their ids to keys
//! through a [`ContentKeyStrategy`].
//!
//! ## Guarantees
//!
//! - **Streaming-first**: payloads move through buffers of
//!   [`BlobConfig::chunk_size`] bytes, never the whole file at once
//! - **All-or-nothing saves**: bytes land in a staging artifact and are
//!   published with an atomic rename; a failed, oversized or cancelled
//!   upload leaves the previously committed content in place
//! - **Independent keys**: only the final commit takes a per-key lock
//!
//! ## Quick Start
//!
//! ```rust
//! use vid_blob::prelude::*;
//! use bytes::Bytes;
//!
//! # #[tokio::main]
//! # async fn main() -> BlobResult<()> {
//! let store = MemoryContentStore::new(BlobConfig::default());
//! let keys = DefaultKeyStrategy;
//!
//! let key = keys.object_key(1);
//! let body = vid_blob::chunked(Bytes::from_static(b"Hello, world!"), 4);
//! let put = store.save(&key, Some("video/mp4"), body).await?;
//! assert_eq!(put.size_bytes, 13);
//!
//! let mut sink = Vec::new();
//! store.load(&key, &mut sink).await?;
//! assert_eq!(sink, b"Hello, world!");
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod fs_store;
mod memory_store;
mod receipt;
pub mod store;
mod types;

pub use config::BlobConfig;
pub use error::{BlobError, BlobResult};
pub use fs_store::FsContentStore;
pub use memory_store::MemoryContentStore;
pub use receipt::{GetResult, PutResult};
pub use store::{ContentKeyStrategy, ContentStore, DefaultKeyStrategy};
pub use types::{boxed, chunked, ByteStream};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BlobConfig, BlobError, BlobResult, ByteStream, ContentKeyStrategy, ContentStore,
        DefaultKeyStrategy, FsContentStore, MemoryContentStore,
    };
}
