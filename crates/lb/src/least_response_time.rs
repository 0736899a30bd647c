use std::{sync::Arc, time::Duration};

use crate::{LbError, pool::PoolSnapshot, stats::StatsTracker};

pub struct LeastResponseTime {
    snapshot: Arc<PoolSnapshot>,
    stats: Arc<StatsTracker>,
}

impl LeastResponseTime {
    pub fn new(snapshot: Arc<PoolSnapshot>, stats: Arc<StatsTracker>) -> Self {
        Self { snapshot, stats }
    }

    pub fn select(&self) -> Result<&str, LbError> {
        if self.snapshot.is_empty() {
            return Err(LbError::NoServersAvailable);
        }
        let averages = self.stats.averages(self.snapshot.servers());
        let idx = fastest(&averages);
        self.snapshot.address(idx).ok_or(LbError::NoServersAvailable)
    }
}

/// Index of the lowest average. Unsampled servers rank after every sampled
/// one; ties and the all-unsampled case resolve to the lowest index.
fn fastest(averages: &[Option<Duration>]) -> usize {
    let mut best = 0usize;
    for (idx, average) in averages.iter().enumerate().skip(1) {
        let better = match (average, averages[best]) {
            (Some(candidate), Some(current)) => *candidate < current,
            (Some(_), None) => true,
            (None, _) => false,
        };
        if better {
            best = idx;
        }
    }
    best
}
