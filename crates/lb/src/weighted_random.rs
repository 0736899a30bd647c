use std::sync::Arc;

use crate::{LbError, pool::PoolSnapshot, rng::SharedRng, weighted::expand};

/// Uniform draw over the weight-expanded sequence.
///
/// Memory grows with the sum of weights; [`WeightedRandomPrefixSum`] is the
/// one to use for anything but small weights. This one stays as the
/// reference it is checked against.
pub struct WeightedRandom {
    snapshot: Arc<PoolSnapshot>,
    sequence: Vec<usize>,
    rng: SharedRng,
}

impl WeightedRandom {
    /// Callers bound the total weight first with
    /// [`check_expansion`](crate::weighted::check_expansion).
    pub fn new(snapshot: Arc<PoolSnapshot>, rng: SharedRng) -> Self {
        let sequence = expand(&snapshot);
        Self {
            snapshot,
            sequence,
            rng,
        }
    }

    pub fn select(&self) -> Result<&str, LbError> {
        if self.sequence.is_empty() {
            return Err(LbError::NoServersAvailable);
        }
        let slot = self.rng.index(self.sequence.len());
        self.snapshot
            .address(self.sequence[slot])
            .ok_or(LbError::NoServersAvailable)
    }
}

/// Weighted draw by binary search over cumulative weights.
pub struct WeightedRandomPrefixSum {
    snapshot: Arc<PoolSnapshot>,
    // prefix[0] = 0, prefix[i] = sum of the first i weights
    prefix: Vec<u64>,
    total_weight: u64,
    rng: SharedRng,
}

impl WeightedRandomPrefixSum {
    pub fn new(snapshot: Arc<PoolSnapshot>, rng: SharedRng) -> Self {
        let mut prefix = Vec::with_capacity(snapshot.len() + 1);
        prefix.push(0);
        let mut running = 0u64;
        for server in snapshot.servers() {
            running += u64::from(server.weight());
            prefix.push(running);
        }
        let total_weight = snapshot.total_weight();
        Self {
            snapshot,
            prefix,
            total_weight,
            rng,
        }
    }

    pub fn select(&self) -> Result<&str, LbError> {
        let total = self.total_weight;
        if total == 0 {
            return Err(LbError::NoServersAvailable);
        }
        let draw = self.rng.in_range(1..=total);
        let idx = locate(&self.prefix, draw).ok_or(LbError::NoServersAvailable)?;
        self.snapshot.address(idx).ok_or(LbError::NoServersAvailable)
    }
}

/// Server index owning `draw` in `1..=total`: the smallest `i` with
/// `prefix[i] >= draw`, minus one.
fn locate(prefix: &[u64], draw: u64) -> Option<usize> {
    prefix.partition_point(|&p| p < draw).checked_sub(1)
}
