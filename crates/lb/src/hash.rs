use std::sync::Arc;

use crate::{LbError, pool::PoolSnapshot};

/// Key affinity by `fnv1a32(key) % n`.
///
/// Servers are ranked by address before reducing, so the same membership
/// maps a key to the same server whatever order the pool lists them in.
/// Adding or removing a server remaps most keys; this is plain modulo
/// hashing, not a ring.
pub struct HashBased {
    snapshot: Arc<PoolSnapshot>,
    ranked: Vec<usize>,
}

impl HashBased {
    pub fn new(snapshot: Arc<PoolSnapshot>) -> Self {
        let mut ranked: Vec<usize> = (0..snapshot.len()).collect();
        let servers = snapshot.servers();
        ranked.sort_by(|&a, &b| servers[a].address().cmp(servers[b].address()));
        Self { snapshot, ranked }
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    pub fn select_for(&self, key: &str) -> Result<&str, LbError> {
        if self.ranked.is_empty() {
            return Err(LbError::NoServersAvailable);
        }
        let slot = hash32(key.as_bytes()) as usize % self.ranked.len();
        self.snapshot
            .address(self.ranked[slot])
            .ok_or(LbError::NoServersAvailable)
    }
}

pub fn hash32(data: &[u8]) -> u32 {
    const FNV_OFFSET: u32 = 0x811c9dc5;
    const FNV_PRIME: u32 = 0x01000193;
    let mut hash = FNV_OFFSET;
    for byte in data {
        hash ^= *byte as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
