// Uniform random selection
use std::sync::Arc;

use crate::{LbError, pool::PoolSnapshot, rng::SharedRng};

pub struct Random {
    snapshot: Arc<PoolSnapshot>,
    rng: SharedRng,
}

impl Random {
    pub fn new(snapshot: Arc<PoolSnapshot>, rng: SharedRng) -> Self {
        Self { snapshot, rng }
    }

    pub fn select(&self) -> Result<&str, LbError> {
        if self.snapshot.is_empty() {
            return Err(LbError::NoServersAvailable);
        }
        let idx = self.rng.index(self.snapshot.len());
        self.snapshot.address(idx).ok_or(LbError::NoServersAvailable)
    }
}
