use std::{fmt, str::FromStr, sync::Arc};

use log::{debug, trace, warn};

use crate::{
    LbError,
    hash::HashBased,
    least_response_time::LeastResponseTime,
    pool::{PoolSnapshot, ServerPool},
    random::Random,
    rng::SharedRng,
    round_robin::RoundRobin,
    stats::StatsTracker,
    weighted::{SmoothWeightedRoundRobin, WeightedRoundRobin, check_expansion},
    weighted_random::{WeightedRandom, WeightedRandomPrefixSum},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    RoundRobin,
    Random,
    WeightedRoundRobin,
    SmoothWeightedRoundRobin,
    WeightedRandom,
    WeightedRandomPrefixSum,
    Hash,
    LeastResponseTime,
}

impl Strategy {
    pub const ALL: [Strategy; 8] = [
        Strategy::RoundRobin,
        Strategy::Random,
        Strategy::WeightedRoundRobin,
        Strategy::SmoothWeightedRoundRobin,
        Strategy::WeightedRandom,
        Strategy::WeightedRandomPrefixSum,
        Strategy::Hash,
        Strategy::LeastResponseTime,
    ];

    pub fn from_config(value: &str) -> Result<Self, LbError> {
        let mode = value.trim().to_lowercase().replace('_', "-");
        match mode.as_str() {
            "round-robin" | "rr" => Ok(Self::RoundRobin),
            "random" => Ok(Self::Random),
            "weighted-round-robin" | "wrr" => Ok(Self::WeightedRoundRobin),
            "smooth-weighted-round-robin" | "swrr" => Ok(Self::SmoothWeightedRoundRobin),
            "weighted-random" | "wrandom" => Ok(Self::WeightedRandom),
            "weighted-random-prefix-sum" | "wrandom-prefix" => Ok(Self::WeightedRandomPrefixSum),
            "hash" => Ok(Self::Hash),
            "least-response-time" | "lrt" => Ok(Self::LeastResponseTime),
            _ => Err(LbError::UnknownStrategy(value.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::RoundRobin => "round-robin",
            Strategy::Random => "random",
            Strategy::WeightedRoundRobin => "weighted-round-robin",
            Strategy::SmoothWeightedRoundRobin => "smooth-weighted-round-robin",
            Strategy::WeightedRandom => "weighted-random",
            Strategy::WeightedRandomPrefixSum => "weighted-random-prefix-sum",
            Strategy::Hash => "hash",
            Strategy::LeastResponseTime => "least-response-time",
        }
    }

    /// Whether selections are routed by a caller-supplied key.
    pub fn is_keyed(&self) -> bool {
        matches!(self, Strategy::Hash)
    }
}

impl FromStr for Strategy {
    type Err = LbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_config(s)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub enum LoadBalancing {
    RoundRobin(RoundRobin),
    Random(Random),
    WeightedRoundRobin(WeightedRoundRobin),
    SmoothWeightedRoundRobin(SmoothWeightedRoundRobin),
    WeightedRandom(WeightedRandom),
    WeightedRandomPrefixSum(WeightedRandomPrefixSum),
    Hash(HashBased),
    LeastResponseTime(LeastResponseTime),
}

impl LoadBalancing {
    fn build(
        strategy: Strategy,
        snapshot: Arc<PoolSnapshot>,
        rng: &SharedRng,
        stats: Option<&Arc<StatsTracker>>,
    ) -> Result<Self, LbError> {
        let balancing = match strategy {
            Strategy::RoundRobin => Self::RoundRobin(RoundRobin::new(snapshot)),
            Strategy::Random => Self::Random(Random::new(snapshot, rng.clone())),
            Strategy::WeightedRoundRobin => {
                check_expansion(&snapshot)?;
                Self::WeightedRoundRobin(WeightedRoundRobin::new(snapshot))
            }
            Strategy::SmoothWeightedRoundRobin => {
                Self::SmoothWeightedRoundRobin(SmoothWeightedRoundRobin::new(snapshot))
            }
            Strategy::WeightedRandom => {
                check_expansion(&snapshot)?;
                Self::WeightedRandom(WeightedRandom::new(snapshot, rng.clone()))
            }
            Strategy::WeightedRandomPrefixSum => {
                Self::WeightedRandomPrefixSum(WeightedRandomPrefixSum::new(snapshot, rng.clone()))
            }
            Strategy::Hash => Self::Hash(HashBased::new(snapshot)),
            Strategy::LeastResponseTime => {
                let stats = stats.ok_or(LbError::MissingStats)?;
                Self::LeastResponseTime(LeastResponseTime::new(snapshot, stats.clone()))
            }
        };
        Ok(balancing)
    }

    pub fn select(&self) -> Result<&str, LbError> {
        match self {
            LoadBalancing::RoundRobin(rr) => rr.select(),
            LoadBalancing::Random(random) => random.select(),
            LoadBalancing::WeightedRoundRobin(wrr) => wrr.select(),
            LoadBalancing::SmoothWeightedRoundRobin(swrr) => swrr.select(),
            LoadBalancing::WeightedRandom(wr) => wr.select(),
            LoadBalancing::WeightedRandomPrefixSum(wr) => wr.select(),
            LoadBalancing::Hash(hash) if hash.is_empty() => Err(LbError::NoServersAvailable),
            LoadBalancing::Hash(_) => Err(LbError::KeyRequired),
            LoadBalancing::LeastResponseTime(lrt) => lrt.select(),
        }
    }

    pub fn select_for(&self, key: &str) -> Result<&str, LbError> {
        match self {
            LoadBalancing::Hash(hash) => hash.select_for(key),
            _ => self.select(),
        }
    }
}

/// A strategy bound to one pool snapshot.
///
/// Strategy state lives as long as the snapshot does; [`Selector::rebuild`]
/// moves to the pool's current snapshot and starts that state over.
pub struct Selector {
    strategy: Strategy,
    snapshot: Arc<PoolSnapshot>,
    rng: SharedRng,
    stats: Option<Arc<StatsTracker>>,
    balancing: LoadBalancing,
}

impl Selector {
    /// Builds a selector with its own freshly seeded generator.
    ///
    /// Random strategies built this way do not share a stream with anything
    /// else. Build through one [`SelectorFactory`] to have every selector
    /// draw from a single generator seeded once.
    pub fn new(
        pool: &ServerPool,
        strategy: Strategy,
        stats: Option<Arc<StatsTracker>>,
    ) -> Result<Self, LbError> {
        let mut factory = SelectorFactory::new(SharedRng::from_entropy());
        if let Some(stats) = stats {
            factory = factory.with_stats(stats);
        }
        factory.build(pool, strategy)
    }

    pub fn select(&self) -> Result<&str, LbError> {
        let picked = self.balancing.select();
        self.observe(&picked);
        picked
    }

    /// Keyed selection. Only the hash strategy looks at `key`.
    pub fn select_for(&self, key: &str) -> Result<&str, LbError> {
        let picked = self.balancing.select_for(key);
        self.observe(&picked);
        picked
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn snapshot(&self) -> &Arc<PoolSnapshot> {
        &self.snapshot
    }

    pub fn balancing(&self) -> &LoadBalancing {
        &self.balancing
    }

    /// True once `pool` has published a snapshot this selector hasn't seen.
    pub fn is_stale(&self, pool: &ServerPool) -> bool {
        !Arc::ptr_eq(&self.snapshot, &pool.snapshot())
    }

    /// Rebinds to the pool's current snapshot with fresh strategy state.
    ///
    /// An empty pool is accepted here; selections then fail with
    /// [`LbError::NoServersAvailable`] until the next rebuild.
    pub fn rebuild(&mut self, pool: &ServerPool) -> Result<(), LbError> {
        let snapshot = pool.snapshot();
        self.balancing =
            LoadBalancing::build(self.strategy, snapshot.clone(), &self.rng, self.stats.as_ref())?;
        debug!(
            "rebuilt {} selector from pool version {} to {} ({} servers)",
            self.strategy,
            self.snapshot.version(),
            snapshot.version(),
            snapshot.len()
        );
        self.snapshot = snapshot;
        Ok(())
    }

    /// Rebuilds only when the pool has moved on. Returns whether it did.
    pub fn refresh(&mut self, pool: &ServerPool) -> Result<bool, LbError> {
        if !self.is_stale(pool) {
            return Ok(false);
        }
        self.rebuild(pool)?;
        Ok(true)
    }

    fn observe(&self, picked: &Result<&str, LbError>) {
        match picked {
            Ok(address) => trace!("{} selected {address}", self.strategy),
            Err(LbError::NoServersAvailable) => warn!(
                "{} selector has no servers (pool version {})",
                self.strategy,
                self.snapshot.version()
            ),
            Err(_) => {}
        }
    }
}

/// Builds selectors around a shared random source and optional stats.
#[derive(Clone, Default)]
pub struct SelectorFactory {
    rng: SharedRng,
    stats: Option<Arc<StatsTracker>>,
}

impl SelectorFactory {
    pub fn new(rng: SharedRng) -> Self {
        Self { rng, stats: None }
    }

    pub fn with_stats(mut self, stats: Arc<StatsTracker>) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn build(&self, pool: &ServerPool, strategy: Strategy) -> Result<Selector, LbError> {
        let snapshot = pool.snapshot();
        if snapshot.is_empty() {
            return Err(LbError::EmptyPool);
        }
        let balancing =
            LoadBalancing::build(strategy, snapshot.clone(), &self.rng, self.stats.as_ref())?;
        debug!(
            "built {strategy} selector over pool version {} ({} servers)",
            snapshot.version(),
            snapshot.len()
        );
        Ok(Selector {
            strategy,
            snapshot,
            rng: self.rng.clone(),
            stats: self.stats.clone(),
            balancing,
        })
    }
}
