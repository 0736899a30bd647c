use std::{collections::HashMap, time::Duration};

use parking_lot::Mutex;

use crate::pool::Server;

/// Accumulated response times for one server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseStat {
    pub count: u64,
    pub total: Duration,
}

impl ResponseStat {
    pub fn new(count: u64, total: Duration) -> Self {
        Self { count, total }
    }

    /// Mean latency, or `None` for a server that has never been sampled.
    pub fn average(&self) -> Option<Duration> {
        if self.count == 0 {
            return None;
        }
        let nanos = self.total.as_nanos() / u128::from(self.count);
        Some(Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX)))
    }

    fn record(&mut self, latency: Duration) {
        self.count = self.count.saturating_add(1);
        self.total = self.total.saturating_add(latency);
    }
}

/// Per-server latency accumulator shared between the proxy (writer) and
/// latency-aware selectors (reader).
///
/// One lock guards the whole map, so a reader never sees a count that does
/// not belong to the total next to it.
#[derive(Debug, Default)]
pub struct StatsTracker {
    stats: Mutex<HashMap<String, ResponseStat>>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_sample(&self, address: &str, latency: Duration) {
        let mut stats = self.stats.lock();
        match stats.get_mut(address) {
            Some(stat) => stat.record(latency),
            None => {
                let mut stat = ResponseStat::default();
                stat.record(latency);
                stats.insert(address.to_string(), stat);
            }
        }
    }

    /// Overwrites the accumulated stat for `address`.
    pub fn seed(&self, address: &str, stat: ResponseStat) {
        self.stats.lock().insert(address.to_string(), stat);
    }

    pub fn stat(&self, address: &str) -> Option<ResponseStat> {
        self.stats.lock().get(address).copied()
    }

    pub fn snapshot(&self) -> HashMap<String, ResponseStat> {
        self.stats.lock().clone()
    }

    pub fn forget(&self, address: &str) -> Option<ResponseStat> {
        self.stats.lock().remove(address)
    }

    pub fn clear(&self) {
        self.stats.lock().clear();
    }

    /// Averages for `servers` in order, read under a single lock.
    pub(crate) fn averages(&self, servers: &[Server]) -> Vec<Option<Duration>> {
        let stats = self.stats.lock();
        servers
            .iter()
            .map(|s| stats.get(s.address()).and_then(ResponseStat::average))
            .collect()
    }
}
