//! vid-core: video registry, identity allocation and the upload/download
//! orchestrator that ties metadata to stored content.

pub mod config;
pub mod errors;
pub mod ids;
pub mod locator;
pub mod record;
pub mod registry;
pub mod service;

pub use config::{VidConfig, VidConfigSnapshot, ENV_PREFIX};
pub use errors::{ErrorKind, VidError, VidResult};
pub use ids::{IdAllocator, VideoId};
pub use locator::Locator;
pub use record::{VideoRecord, VideoState, VideoStatus};
pub use registry::VideoRegistry;
pub use service::{VideoContent, VideoService};
