//! Sampling helpers for checking how a selector spreads load.

use std::collections::BTreeMap;

use crate::{LbError, selector::Selector};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Distribution {
    counts: BTreeMap<String, usize>,
    draws: usize,
}

impl Distribution {
    fn record(&mut self, address: &str) {
        *self.counts.entry(address.to_string()).or_insert(0) += 1;
        self.draws += 1;
    }

    pub fn draws(&self) -> usize {
        self.draws
    }

    pub fn count(&self, address: &str) -> usize {
        self.counts.get(address).copied().unwrap_or(0)
    }

    /// Fraction of draws that went to `address`, in `0.0..=1.0`.
    pub fn share(&self, address: &str) -> f64 {
        if self.draws == 0 {
            return 0.0;
        }
        self.count(address) as f64 / self.draws as f64
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(address, count)| (address.as_str(), *count))
    }
}

/// Calls `select()` `draws` times.
pub fn sample(selector: &Selector, draws: usize) -> Result<Distribution, LbError> {
    let mut distribution = Distribution::default();
    for _ in 0..draws {
        distribution.record(selector.select()?);
    }
    Ok(distribution)
}

/// Calls `select_for` once per key.
pub fn sample_keys<'k, I>(selector: &Selector, keys: I) -> Result<Distribution, LbError>
where
    I: IntoIterator<Item = &'k str>,
{
    let mut distribution = Distribution::default();
    for key in keys {
        distribution.record(selector.select_for(key)?);
    }
    Ok(distribution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        pool::{Server, ServerPool},
        selector::Strategy,
    };

    #[test]
    fn counts_round_robin_draws() {
        let pool = ServerPool::new(vec![Server::unweighted("a"), Server::unweighted("b")]).unwrap();
        let selector = Selector::new(&pool, Strategy::RoundRobin, None).unwrap();

        let distribution = sample(&selector, 9).unwrap();
        assert_eq!(distribution.draws(), 9);
        assert_eq!(distribution.count("a"), 5);
        assert_eq!(distribution.count("b"), 4);
        assert_eq!(distribution.count("c"), 0);
        assert!((distribution.share("b") - 4.0 / 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn keyed_sampling_routes_every_key() {
        let pool = ServerPool::new(vec![Server::unweighted("a"), Server::unweighted("b")]).unwrap();
        let selector = Selector::new(&pool, Strategy::Hash, None).unwrap();

        let distribution = sample_keys(&selector, ["k1", "k2", "k1"]).unwrap();
        assert_eq!(distribution.draws(), 3);
        assert_eq!(distribution.iter().map(|(_, c)| c).sum::<usize>(), 3);
    }

    #[test]
    fn errors_propagate() {
        let pool = ServerPool::new(vec![Server::unweighted("a")]).unwrap();
        let selector = Selector::new(&pool, Strategy::Hash, None).unwrap();
        assert_eq!(sample(&selector, 1), Err(LbError::KeyRequired));
    }

    #[test]
    fn empty_distribution_has_zero_share() {
        assert_eq!(Distribution::default().share("a"), 0.0);
    }
}
