use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::record::EventLogRecord;

/// Where new records go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordOrder {
    /// Append at the tail; iteration is oldest first.
    #[default]
    Chronological,
    /// Insert at the head; iteration is newest first.
    MostRecentFirst,
}

/// In-memory log of rendered playback events.
///
/// All operations take a single lock, so readers always see whole records
/// and a snapshot never interleaves with a concurrent append or clear.
/// When a capacity is set, inserting into a full buffer evicts the oldest
/// record.
#[derive(Debug)]
pub struct LogBuffer {
    records: Mutex<VecDeque<EventLogRecord>>,
    ordering: RecordOrder,
    capacity: Option<usize>,
}

impl LogBuffer {
    pub fn new(ordering: RecordOrder, capacity: Option<usize>) -> Self {
        // A zero capacity would drop every record, treat it as one.
        let capacity = capacity.map(|c| c.max(1));
        Self {
            records: Mutex::new(VecDeque::new()),
            ordering,
            capacity,
        }
    }

    pub fn unbounded() -> Self {
        Self::new(RecordOrder::Chronological, None)
    }

    pub fn ordering(&self) -> RecordOrder {
        self.ordering
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Insert a record, returning how many old records were evicted.
    pub fn push(&self, record: EventLogRecord) -> usize {
        let mut records = self.records.lock();
        let evicted = self.make_room(&mut records);
        match self.ordering {
            RecordOrder::Chronological => records.push_back(record),
            RecordOrder::MostRecentFirst => records.push_front(record),
        }
        evicted
    }

    /// Atomically discard all history and keep only `record`.
    ///
    /// Returns the number of records discarded.
    pub fn reset_to(&self, record: EventLogRecord) -> usize {
        let mut records = self.records.lock();
        let discarded = records.len();
        records.clear();
        records.push_back(record);
        discarded
    }

    /// Remove every record, returning how many were removed.
    pub fn clear(&self) -> usize {
        let mut records = self.records.lock();
        let removed = records.len();
        records.clear();
        removed
    }

    /// Copy of the current contents in buffer order.
    pub fn snapshot(&self) -> Vec<EventLogRecord> {
        self.records.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    fn make_room(&self, records: &mut VecDeque<EventLogRecord>) -> usize {
        let Some(capacity) = self.capacity else {
            return 0;
        };
        let mut evicted = 0;
        while records.len() >= capacity {
            let oldest = match self.ordering {
                RecordOrder::Chronological => records.pop_front(),
                RecordOrder::MostRecentFirst => records.pop_back(),
            };
            if oldest.is_none() {
                break;
            }
            evicted += 1;
        }
        evicted
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::TimestampFormat;
    use std::sync::Arc;
    use std::thread;

    fn record(message: &str) -> EventLogRecord {
        EventLogRecord::new(message, "test", &TimestampFormat::default())
    }

    fn messages(buffer: &LogBuffer) -> Vec<String> {
        buffer
            .snapshot()
            .iter()
            .map(|r| r.message().to_string())
            .collect()
    }

    #[test]
    fn chronological_appends_to_tail() {
        let buffer = LogBuffer::unbounded();
        buffer.push(record("a"));
        buffer.push(record("b"));
        assert_eq!(messages(&buffer), ["a", "b"]);
    }

    #[test]
    fn most_recent_first_inserts_at_head() {
        let buffer = LogBuffer::new(RecordOrder::MostRecentFirst, None);
        buffer.push(record("a"));
        buffer.push(record("b"));
        assert_eq!(messages(&buffer), ["b", "a"]);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let buffer = LogBuffer::new(RecordOrder::Chronological, Some(2));
        assert_eq!(buffer.push(record("a")), 0);
        buffer.push(record("b"));
        assert_eq!(buffer.push(record("c")), 1);
        assert_eq!(messages(&buffer), ["b", "c"]);

        let newest_first = LogBuffer::new(RecordOrder::MostRecentFirst, Some(2));
        for m in ["a", "b", "c"] {
            newest_first.push(record(m));
        }
        assert_eq!(messages(&newest_first), ["c", "b"]);
    }

    #[test]
    fn zero_capacity_keeps_latest() {
        let buffer = LogBuffer::new(RecordOrder::Chronological, Some(0));
        buffer.push(record("a"));
        buffer.push(record("b"));
        assert_eq!(messages(&buffer), ["b"]);
    }

    #[test]
    fn reset_keeps_only_given_record() {
        let buffer = LogBuffer::unbounded();
        buffer.push(record("a"));
        buffer.push(record("b"));
        assert_eq!(buffer.reset_to(record("c")), 2);
        assert_eq!(messages(&buffer), ["c"]);
        assert_eq!(buffer.clear(), 1);
        assert!(buffer.is_empty());
    }

    #[test]
    fn concurrent_pushes_are_not_lost() {
        let buffer = Arc::new(LogBuffer::unbounded());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let buffer = Arc::clone(&buffer);
                thread::spawn(move || {
                    for i in 0..250 {
                        buffer.push(record(&format!("{t}-{i}")));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut all = messages(&buffer);
        assert_eq!(all.len(), 1000);
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 1000);
    }
}
