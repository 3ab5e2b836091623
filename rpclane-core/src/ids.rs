use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Correlation id carried in the `id` field of a call envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(u64);

impl CallId {
    pub fn new(value: u64) -> Self {
        CallId(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallId({})", self.0)
    }
}

impl From<u64> for CallId {
    fn from(value: u64) -> Self {
        CallId::new(value)
    }
}

/// Hands out monotonically increasing call ids starting from 1.
///
/// Ids wrap on `u64` overflow; nothing else resets the counter.
#[derive(Debug)]
pub struct CallIdAllocator {
    next: AtomicU64,
}

impl CallIdAllocator {
    pub const fn new() -> Self {
        CallIdAllocator {
            next: AtomicU64::new(1),
        }
    }

    pub fn allocate(&self) -> CallId {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        CallId::new(id)
    }

    pub fn peek_next(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for CallIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

static PROCESS_CALL_IDS: CallIdAllocator = CallIdAllocator::new();

/// Allocate the next id from the process-wide counter shared by every client.
pub fn next_call_id() -> CallId {
    PROCESS_CALL_IDS.allocate()
}
