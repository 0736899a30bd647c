use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use crate::{LbError, pool::PoolSnapshot};

/// Position counter kept in `0..len`, advanced with one atomic
/// read-modify-write so no two callers observe the same slot.
#[derive(Debug, Default)]
pub(crate) struct Cursor {
    position: AtomicUsize,
}

impl Cursor {
    /// Returns the current slot and advances. `None` when `len` is zero.
    pub(crate) fn advance(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        self.position
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |pos| {
                Some((pos + 1) % len)
            })
            .ok()
            .map(|pos| pos % len)
    }

    pub(crate) fn position(&self) -> usize {
        self.position.load(Ordering::Acquire)
    }
}

pub struct RoundRobin {
    snapshot: Arc<PoolSnapshot>,
    cursor: Cursor,
}

impl RoundRobin {
    pub fn new(snapshot: Arc<PoolSnapshot>) -> Self {
        Self {
            snapshot,
            cursor: Cursor::default(),
        }
    }

    pub fn select(&self) -> Result<&str, LbError> {
        let idx = self
            .cursor
            .advance(self.snapshot.len())
            .ok_or(LbError::NoServersAvailable)?;
        self.snapshot.address(idx).ok_or(LbError::NoServersAvailable)
    }

    /// Index of the server the next call will return.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }
}
