//! Video identity.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Identifier of a registered video. `0` means "not yet registered".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(pub u64);

impl VideoId {
    pub const UNASSIGNED: VideoId = VideoId(0);

    pub fn get(self) -> u64 {
        self.0
    }

    pub fn is_assigned(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for VideoId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Hands out strictly increasing ids starting at 1.
#[derive(Debug, Default)]
pub struct IdAllocator {
    last: AtomicU64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id, strictly greater than every id returned or observed so far.
    /// `None` once the `u64` space is used up; the counter never wraps.
    pub fn next_id(&self) -> Option<VideoId> {
        self.last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| last.checked_add(1))
            .ok()
            .map(|previous| VideoId(previous + 1))
    }

    /// Record an id that entered the registry from outside the allocator,
    /// so it is never handed out later.
    pub fn observe(&self, id: VideoId) {
        self.last.fetch_max(id.0, Ordering::SeqCst);
    }

    /// Highest id handed out or observed so far (0 when none).
    pub fn last(&self) -> u64 {
        self.last.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn starts_at_one_and_increases() {
        let ids = IdAllocator::new();
        assert_eq!(ids.next_id(), Some(VideoId(1)));
        assert_eq!(ids.next_id(), Some(VideoId(2)));
        assert_eq!(ids.last(), 2);
    }

    #[test]
    fn observed_ids_are_skipped() {
        let ids = IdAllocator::new();
        ids.observe(VideoId(40));
        assert_eq!(ids.next_id(), Some(VideoId(41)));

        ids.observe(VideoId(3));
        assert_eq!(ids.next_id(), Some(VideoId(42)));
    }

    #[test]
    fn exhausted_space_does_not_wrap() {
        let ids = IdAllocator::new();
        ids.observe(VideoId(u64::MAX - 1));
        assert_eq!(ids.next_id(), Some(VideoId(u64::MAX)));

        assert_eq!(ids.next_id(), None);
        assert_eq!(ids.next_id(), None);
        assert_eq!(ids.last(), u64::MAX);
    }

    #[test]
    fn concurrent_callers_get_distinct_ids() {
        let ids = Arc::new(IdAllocator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ids = Arc::clone(&ids);
                std::thread::spawn(move || (0..500).map(|_| ids.next_id().unwrap()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(id.is_assigned());
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 4_000);
    }
}
