//! Weighted round robin, in two flavours.
//!
//! [`WeightedRoundRobin`] repeats each server `weight` times and walks the
//! result in order. It is exactly proportional over one pass but emits a
//! heavy server in a burst.
//!
//! [`SmoothWeightedRoundRobin`] is the "current weight" scheme: every call
//! adds each server's weight to its running score, picks the highest score
//! (lowest index on ties) and charges the winner the total weight. Starting
//! from all-zero scores, the next `total_weight` calls contain each server
//! exactly `weight` times, interleaved rather than bunched, and leave the
//! scores at zero again.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{LbError, pool::PoolSnapshot, round_robin::Cursor};

/// Largest total weight the expansion strategies accept.
pub const MAX_EXPANDED_WEIGHT: u64 = 1 << 20;

/// Errors when expanding `snapshot` would exceed [`MAX_EXPANDED_WEIGHT`].
pub fn check_expansion(snapshot: &PoolSnapshot) -> Result<(), LbError> {
    let total = snapshot.total_weight();
    if total > MAX_EXPANDED_WEIGHT {
        return Err(LbError::WeightTooLarge {
            total,
            limit: MAX_EXPANDED_WEIGHT,
        });
    }
    Ok(())
}

/// Server indices with server `i` repeated `weight_i` times, in pool order.
pub(crate) fn expand(snapshot: &PoolSnapshot) -> Vec<usize> {
    snapshot
        .servers()
        .iter()
        .enumerate()
        .flat_map(|(idx, server)| std::iter::repeat_n(idx, server.weight() as usize))
        .collect()
}

pub struct WeightedRoundRobin {
    snapshot: Arc<PoolSnapshot>,
    sequence: Vec<usize>,
    cursor: Cursor,
}

impl WeightedRoundRobin {
    /// Callers bound the total weight first with [`check_expansion`].
    pub fn new(snapshot: Arc<PoolSnapshot>) -> Self {
        let sequence = expand(&snapshot);
        Self {
            snapshot,
            sequence,
            cursor: Cursor::default(),
        }
    }

    pub fn select(&self) -> Result<&str, LbError> {
        let slot = self
            .cursor
            .advance(self.sequence.len())
            .ok_or(LbError::NoServersAvailable)?;
        self.snapshot
            .address(self.sequence[slot])
            .ok_or(LbError::NoServersAvailable)
    }
}

pub struct SmoothWeightedRoundRobin {
    snapshot: Arc<PoolSnapshot>,
    weights: Vec<i64>,
    total_weight: i64,
    current: Mutex<Vec<i64>>,
}

impl SmoothWeightedRoundRobin {
    pub fn new(snapshot: Arc<PoolSnapshot>) -> Self {
        let weights: Vec<i64> = snapshot
            .servers()
            .iter()
            .map(|s| i64::from(s.weight()))
            .collect();
        let total_weight = i64::try_from(snapshot.total_weight()).unwrap_or(i64::MAX);
        let current = Mutex::new(vec![0; weights.len()]);
        Self {
            snapshot,
            weights,
            total_weight,
            current,
        }
    }

    pub fn select(&self) -> Result<&str, LbError> {
        if self.weights.is_empty() {
            return Err(LbError::NoServersAvailable);
        }

        let best = {
            let mut current = self.current.lock();
            let mut best = 0usize;
            for i in 0..self.weights.len() {
                current[i] += self.weights[i];
                if current[i] > current[best] {
                    best = i;
                }
            }
            current[best] -= self.total_weight;
            best
        };

        self.snapshot.address(best).ok_or(LbError::NoServersAvailable)
    }

    /// Copy of the running scores.
    pub fn current_weights(&self) -> Vec<i64> {
        self.current.lock().clone()
    }
}
