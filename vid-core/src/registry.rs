use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde_json::json;
use tracing::{debug, info};

use crate::errors::{VidError, VidResult};
use crate::ids::{IdAllocator, VideoId};
use crate::locator::Locator;
use crate::record::VideoRecord;

/// In-memory registry of video metadata.
///
/// Id allocation, locator derivation and insertion happen under one write
/// lock, so readers never see an id without its record or a record without
/// its `data_url`.
pub struct VideoRegistry {
    records: RwLock<BTreeMap<VideoId, VideoRecord>>,
    ids: IdAllocator,
    locator: Locator,
}

impl VideoRegistry {
    /// Create an empty registry.
    pub fn new(locator: Locator) -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            ids: IdAllocator::new(),
            locator,
        }
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Register new metadata (`id == 0`) or replace existing metadata
    /// (`id != 0`, last writer wins). The stored copy is returned.
    pub fn publish(&self, mut record: VideoRecord) -> VidResult<VideoRecord> {
        record.validate()?;

        // u64::MAX is reserved so an upsert can never use up the allocator
        if record.id.get() == u64::MAX {
            return Err(VidError::invalid_input("Invalid video metadata")
                .with_errors(json!({"id": [format!("must be below {}", u64::MAX)]})));
        }

        let mut records = self.records.write();

        if record.id.is_assigned() {
            self.ids.observe(record.id);
            debug!(video_id = %record.id, "replacing video metadata");
        } else {
            record.id = self
                .ids
                .next_id()
                .ok_or_else(|| VidError::general_error("Video id space exhausted"))?;
        }
        record.data_url = self.locator.data_url(record.id);

        records.insert(record.id, record.clone());
        drop(records);

        info!(video_id = %record.id, title = %record.title, "video published");
        Ok(record)
    }

    /// Snapshot of every record in ascending id order.
    pub fn list(&self) -> Vec<VideoRecord> {
        self.records.read().values().cloned().collect()
    }

    pub fn get(&self, id: VideoId) -> VidResult<VideoRecord> {
        self.records
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| VidError::not_found(format!("No video with id {}", id)))
    }

    pub fn contains(&self, id: VideoId) -> bool {
        self.records.read().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}
