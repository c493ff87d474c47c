//! Transaction ID allocation

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier tagging one mutating operation's WAL records
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TxId(pub u64);

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues strictly increasing transaction IDs
///
/// IDs are unique for the lifetime of the generator only; they are not
/// persisted, so a restarted process begins again at 1.
#[derive(Debug)]
pub struct TxIdGenerator {
    next: AtomicU64,
}

impl TxIdGenerator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Allocate the next ID
    pub fn next_id(&self) -> TxId {
        TxId(self.next.fetch_add(1, Ordering::SeqCst))
    }

    /// The ID the next call to `next_id` will return
    pub fn peek(&self) -> TxId {
        TxId(self.next.load(Ordering::SeqCst))
    }
}

impl Default for TxIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
