//! Retention Buffer - Bounded newest-first alert store
//!
//! Keeps the most recent `capacity` alerts. Readers always get copies.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{FeedError, FeedResult};
use crate::logic::alert::AlertRecord;

/// Shared handle used by the generator (writer) and the query side (readers)
pub type SharedBuffer = Arc<RwLock<RetentionBuffer>>;

// ============================================================================
// BUFFER
// ============================================================================

#[derive(Debug, Clone)]
pub struct RetentionBuffer {
    /// Front is newest
    entries: VecDeque<AlertRecord>,
    capacity: usize,
}

impl RetentionBuffer {
    pub fn new(capacity: usize) -> FeedResult<Self> {
        if capacity == 0 {
            return Err(FeedError::config("buffer capacity must be at least 1"));
        }

        Ok(Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        })
    }

    /// Buffer pre-filled with `history` (given newest first)
    pub fn with_history(capacity: usize, history: Vec<AlertRecord>) -> FeedResult<Self> {
        let mut buffer = Self::new(capacity)?;
        for record in history.into_iter().rev() {
            buffer.insert(record);
        }
        Ok(buffer)
    }

    pub fn into_shared(self) -> SharedBuffer {
        Arc::new(RwLock::new(self))
    }

    /// Prepend `record`, evicting the oldest entry when over capacity.
    /// Returns the new snapshot.
    pub fn push(&mut self, record: AlertRecord) -> Vec<AlertRecord> {
        self.insert(record);
        self.snapshot()
    }

    /// Same as `push` without building a snapshot
    pub fn insert(&mut self, record: AlertRecord) {
        self.entries.push_front(record);
        while self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    /// Copy of the contents, newest first
    pub fn snapshot(&self) -> Vec<AlertRecord> {
        self.entries.iter().cloned().collect()
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn latest(&self) -> Option<&AlertRecord> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn status(&self) -> BufferStatus {
        BufferStatus {
            current_size: self.entries.len(),
            capacity: self.capacity,
            is_full: self.entries.len() >= self.capacity,
            fill_percent: (self.entries.len() as f32 / self.capacity as f32 * 100.0).min(100.0),
        }
    }
}

/// Buffer status information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BufferStatus {
    pub current_size: usize,
    pub capacity: usize,
    pub is_full: bool,
    pub fill_percent: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::alert::{Severity, ThreatCategory};
    use chrono::Utc;
    use std::net::Ipv4Addr;

    fn record(host: u8) -> AlertRecord {
        AlertRecord::historical(
            ThreatCategory::BruteForce,
            Severity::Medium,
            90.0,
            Ipv4Addr::new(192, 168, 1, host),
            Ipv4Addr::new(10, 0, 0, 1),
            Utc::now(),
        )
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(RetentionBuffer::new(0), Err(FeedError::InvalidConfig(_))));
    }

    #[test]
    fn test_push_order_newest_first() {
        let mut buffer = RetentionBuffer::new(5).unwrap();
        let (r1, r2, r3) = (record(1), record(2), record(3));

        buffer.push(r1.clone());
        buffer.push(r2.clone());
        let snapshot = buffer.push(r3.clone());

        assert_eq!(snapshot, vec![r3.clone(), r2, r1]);
        assert_eq!(buffer.latest(), Some(&r3));
    }

    #[test]
    fn test_length_bounded_by_capacity() {
        for capacity in [1usize, 3, 10] {
            for pushes in 0..25usize {
                let mut buffer = RetentionBuffer::new(capacity).unwrap();
                let mut last = None;
                for i in 0..pushes {
                    let r = record(i as u8);
                    buffer.push(r.clone());
                    last = Some(r);
                }

                let snapshot = buffer.snapshot();
                assert_eq!(snapshot.len(), pushes.min(capacity));
                assert_eq!(snapshot.first(), last.as_ref());
            }
        }
    }

    #[test]
    fn test_eviction_drops_oldest() {
        let mut buffer = RetentionBuffer::new(2).unwrap();
        let (r1, r2, r3) = (record(1), record(2), record(3));
        buffer.push(r1);
        buffer.push(r2.clone());
        buffer.push(r3.clone());

        assert_eq!(buffer.snapshot(), vec![r3, r2]);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut buffer = RetentionBuffer::new(3).unwrap();
        buffer.push(record(1));
        let before = buffer.snapshot();

        buffer.push(record(2));
        assert_eq!(before.len(), 1);
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_reset_clears() {
        let mut buffer = RetentionBuffer::new(3).unwrap();
        buffer.push(record(1));
        buffer.reset();

        assert!(buffer.is_empty());
        assert!(buffer.snapshot().is_empty());

        buffer.push(record(2));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_with_history_keeps_order_and_bound() {
        let (a, b, c) = (record(3), record(2), record(1));
        let buffer = RetentionBuffer::with_history(2, vec![a.clone(), b.clone(), c]).unwrap();
        assert_eq!(buffer.snapshot(), vec![a, b]);
    }

    #[test]
    fn test_status() {
        let mut buffer = RetentionBuffer::new(4).unwrap();
        buffer.push(record(1));
        let status = buffer.status();
        assert_eq!(status.current_size, 1);
        assert_eq!(status.capacity, 4);
        assert!(!status.is_full);
        assert_eq!(status.fill_percent, 25.0);
    }
}
