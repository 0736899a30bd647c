//! Server selection for the banshee load balancer.
//!
//! A [`ServerPool`] holds the candidate servers, a [`Selector`] built over
//! one of its snapshots picks the next server, and a [`StatsTracker`] feeds
//! latency-aware strategies.

pub mod error;
pub mod harness;
pub mod hash;
pub mod least_response_time;
pub mod pool;
pub mod random;
pub mod rng;
pub mod round_robin;
pub mod selector;
pub mod stats;
pub mod weighted;
pub mod weighted_random;

pub use error::LbError;
pub use pool::{PoolSnapshot, Server, ServerPool};
pub use rng::SharedRng;
pub use selector::{LoadBalancing, Selector, SelectorFactory, Strategy};
pub use stats::{ResponseStat, StatsTracker};
