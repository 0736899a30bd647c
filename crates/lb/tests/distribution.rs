use std::{sync::Arc, time::Duration};

use banshee_lb::{
    LbError, ResponseStat, Selector, SelectorFactory, Server, ServerPool, SharedRng,
    StatsTracker, Strategy, harness,
};

const DRAWS: usize = 100_000;
const TOLERANCE: f64 = 0.02;

fn weighted_pool(servers: &[(&str, u32)]) -> ServerPool {
    ServerPool::new(servers.iter().map(|(a, w)| Server::new(*a, *w)).collect()).unwrap()
}

fn assert_share(distribution: &harness::Distribution, address: &str, expected: f64) {
    let share = distribution.share(address);
    assert!(
        (share - expected).abs() <= TOLERANCE,
        "{address}: share {share:.4}, expected {expected:.4}"
    );
}

#[test]
fn weighted_random_variants_follow_weights() {
    let pool = weighted_pool(&[("192.168.0.1", 3), ("192.168.0.2", 2)]);
    let factory = SelectorFactory::new(SharedRng::seeded(20240501));

    for strategy in [Strategy::WeightedRandom, Strategy::WeightedRandomPrefixSum] {
        let selector = factory.build(&pool, strategy).unwrap();
        let distribution = harness::sample(&selector, DRAWS).unwrap();
        assert_eq!(distribution.draws(), DRAWS);
        assert_share(&distribution, "192.168.0.1", 0.6);
        assert_share(&distribution, "192.168.0.2", 0.4);
    }
}

#[test]
fn prefix_sum_agrees_with_expansion() {
    let pool = weighted_pool(&[("a", 1), ("b", 4), ("c", 2), ("d", 3)]);
    let factory = SelectorFactory::new(SharedRng::seeded(99));

    let expanded = harness::sample(&factory.build(&pool, Strategy::WeightedRandom).unwrap(), DRAWS)
        .unwrap();
    let prefix = harness::sample(
        &factory.build(&pool, Strategy::WeightedRandomPrefixSum).unwrap(),
        DRAWS,
    )
    .unwrap();

    for address in ["a", "b", "c", "d"] {
        assert!((expanded.share(address) - prefix.share(address)).abs() <= TOLERANCE);
    }
}

#[test]
fn uniform_random_spreads_evenly() {
    let pool = weighted_pool(&[("a", 5), ("b", 1), ("c", 1), ("d", 1)]);
    let selector = SelectorFactory::new(SharedRng::seeded(7))
        .build(&pool, Strategy::Random)
        .unwrap();

    let distribution = harness::sample(&selector, DRAWS).unwrap();
    for address in ["a", "b", "c", "d"] {
        assert_share(&distribution, address, 0.25);
    }
}

#[test]
fn round_robin_windows_visit_each_server_once() {
    let pool = weighted_pool(&[("a", 1), ("b", 1), ("c", 1), ("d", 1)]);
    let selector = Selector::new(&pool, Strategy::RoundRobin, None).unwrap();

    for _ in 0..25 {
        let window: Vec<String> = (0..4)
            .map(|_| selector.select().unwrap().to_string())
            .collect();
        assert_eq!(window, vec!["a", "b", "c", "d"]);
    }
}

#[test]
fn smooth_weighted_windows_are_exact() {
    let pool = weighted_pool(&[("A", 3), ("B", 1)]);
    let selector = Selector::new(&pool, Strategy::SmoothWeightedRoundRobin, None).unwrap();

    let mut previous_first: Option<String> = None;
    let mut repeated_first = 0;
    for _ in 0..1000 {
        let window: Vec<String> = (0..4)
            .map(|_| selector.select().unwrap().to_string())
            .collect();
        assert_eq!(window.iter().filter(|a| *a == "A").count(), 3);
        assert_eq!(window.iter().filter(|a| *a == "B").count(), 1);
        // no AAA run within a window
        assert_ne!(&window[..3], ["A", "A", "A"]);
        if previous_first.as_deref() == Some(window[0].as_str()) {
            repeated_first += 1;
        }
        previous_first = Some(window[0].clone());
    }
    // with 3:1 every window opens on A; the ratio forces it
    assert_eq!(repeated_first, 999);
}

#[test]
fn weighted_round_robin_is_exact_per_pass() {
    let pool = weighted_pool(&[("a", 2), ("b", 5), ("c", 3)]);
    let selector = Selector::new(&pool, Strategy::WeightedRoundRobin, None).unwrap();

    let distribution = harness::sample(&selector, 10 * 100).unwrap();
    assert_eq!(distribution.count("a"), 200);
    assert_eq!(distribution.count("b"), 500);
    assert_eq!(distribution.count("c"), 300);
}

#[test]
fn hash_affinity_survives_reordering() {
    let forward = weighted_pool(&[("10.0.0.1:80", 1), ("10.0.0.2:80", 1), ("10.0.0.3:80", 1)]);
    let shuffled = weighted_pool(&[("10.0.0.2:80", 1), ("10.0.0.3:80", 1), ("10.0.0.1:80", 1)]);
    let left = Selector::new(&forward, Strategy::Hash, None).unwrap();
    let right = Selector::new(&shuffled, Strategy::Hash, None).unwrap();

    let first = left.select_for("abc").unwrap().to_string();
    for _ in 0..10 {
        assert_eq!(left.select_for("abc").unwrap(), first);
        assert_eq!(right.select_for("abc").unwrap(), first);
    }

    let keys: Vec<String> = (0..3000).map(|i| format!("client-{i}")).collect();
    let distribution = harness::sample_keys(&left, keys.iter().map(String::as_str)).unwrap();
    for address in ["10.0.0.1:80", "10.0.0.2:80", "10.0.0.3:80"] {
        assert!(distribution.share(address) > 0.25);
    }
}

#[test]
fn least_response_time_prefers_faster_server() {
    let pool = weighted_pool(&[("192.168.0.1", 1), ("192.168.0.2", 1)]);
    let stats = Arc::new(StatsTracker::new());
    stats.seed("192.168.0.1", ResponseStat::new(10, Duration::from_nanos(1000)));
    stats.seed("192.168.0.2", ResponseStat::new(10, Duration::from_nanos(2000)));

    let selector = Selector::new(&pool, Strategy::LeastResponseTime, Some(stats)).unwrap();
    assert_eq!(selector.select(), Ok("192.168.0.1"));
}

#[test]
fn least_response_time_without_samples_uses_first() {
    let pool = weighted_pool(&[("192.168.0.1", 1), ("192.168.0.2", 1)]);
    let stats = Arc::new(StatsTracker::new());
    let selector = Selector::new(&pool, Strategy::LeastResponseTime, Some(stats)).unwrap();
    assert_eq!(selector.select(), Ok("192.168.0.1"));
}

#[test]
fn emptied_pool_never_panics() {
    let pool = weighted_pool(&[("a", 1)]);
    let factory = SelectorFactory::new(SharedRng::seeded(5)).with_stats(Arc::new(StatsTracker::new()));

    for strategy in Strategy::ALL {
        let mut selector = factory.build(&pool, strategy).unwrap();
        pool.replace(Vec::new()).unwrap();
        selector.rebuild(&pool).unwrap();

        assert_eq!(selector.select_for("abc"), Err(LbError::NoServersAvailable));
        assert_eq!(selector.select(), Err(LbError::NoServersAvailable));
        pool.replace(vec![Server::unweighted("a")]).unwrap();
    }
}
