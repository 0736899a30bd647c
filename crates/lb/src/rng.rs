use std::{ops::RangeInclusive, sync::Arc};

use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Lock-guarded generator handed to the random strategies.
///
/// Seeded once when created and never reseeded; clones share the same
/// stream.
#[derive(Clone, Debug)]
pub struct SharedRng {
    inner: Arc<Mutex<StdRng>>,
}

impl SharedRng {
    pub fn from_entropy() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            inner: Arc::new(Mutex::new(rng)),
        }
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub(crate) fn index(&self, len: usize) -> usize {
        self.inner.lock().gen_range(0..len)
    }

    pub(crate) fn in_range(&self, range: RangeInclusive<u64>) -> u64 {
        self.inner.lock().gen_range(range)
    }
}

impl Default for SharedRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
