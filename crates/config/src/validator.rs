use std::collections::HashSet;

use crate::config::Config;
use log::{error, info};

pub const VALID_LOG_LEVELS: &[&str] = &[
    "whisper", "haunt", "spooky", "scream", "poltergeist", "silence",
    "trace", "debug", "info", "warn", "error", "off",
];

// compared after lowercasing and mapping '_' to '-'
pub const VALID_LB_TYPES: &[&str] = &[
    "round-robin",
    "rr",
    "random",
    "weighted-round-robin",
    "wrr",
    "smooth-weighted-round-robin",
    "swrr",
    "weighted-random",
    "wrandom",
    "weighted-random-prefix-sum",
    "wrandom-prefix",
    "hash",
    "least-response-time",
    "lrt",
];

pub const KEYED_LB_TYPES: &[&str] = &["hash"];

fn normalize(value: &str) -> String {
    value.trim().to_lowercase().replace('_', "-")
}

pub fn validate(config: &Config) -> bool {
    info!("Starting configuration validation...");

    // --- Validate log level ---
    if !VALID_LOG_LEVELS.iter().any(|lvl| lvl.eq_ignore_ascii_case(&config.log.level)) {
        error!("Invalid log level: {}", config.log.level);
        return false;
    }

    // --- Validate strategy ---
    let strategy = normalize(&config.selector.strategy);
    if !VALID_LB_TYPES.contains(&strategy.as_str()) {
        error!("Invalid load balancing type: {}", config.selector.strategy);
        return false;
    }

    // --- Validate servers ---
    if config.servers.is_empty() {
        error!("No servers configured");
        return false;
    }

    let mut seen = HashSet::new();
    for server in &config.servers {
        if server.address().is_empty() {
            error!("Server address is missing");
            return false;
        }

        if server.weight() == 0 {
            error!("Server weight is invalid (0) for server '{}'", server.address());
            return false;
        }

        if !seen.insert(server.address()) {
            error!("Server '{}' is listed more than once", server.address());
            return false;
        }
    }

    // --- Validate simulation ---
    if config.simulation.draws == 0 {
        error!("Simulation draws must be at least 1");
        return false;
    }

    if KEYED_LB_TYPES.contains(&strategy.as_str()) && config.simulation.keys.is_empty() {
        error!(
            "Strategy '{}' routes by key but no simulation keys are configured",
            config.selector.strategy
        );
        return false;
    }

    for sample in &config.simulation.samples {
        if !seen.contains(sample.address.as_str()) {
            error!(
                "Latency sample references unknown server '{}'",
                sample.address
            );
            return false;
        }
    }

    info!("Configuration validation passed successfully");

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{LatencySample, Server},
        default::{get_default_log, get_default_selector, get_default_simulation},
    };

    fn config(servers: Vec<Server>) -> Config {
        Config {
            version: 1,
            log: get_default_log(),
            selector: get_default_selector(),
            servers,
            simulation: get_default_simulation(),
        }
    }

    fn simple(address: &str) -> Server {
        Server::Simple(address.to_string())
    }

    #[test]
    fn accepts_minimal_config() {
        assert!(validate(&config(vec![simple("10.0.0.1:80")])));
    }

    #[test]
    fn accepts_ghost_log_levels_and_aliases() {
        let mut cfg = config(vec![simple("10.0.0.1:80")]);
        cfg.log.level = "Poltergeist".to_string();
        cfg.selector.strategy = "Weighted_Random_Prefix_Sum".to_string();
        assert!(validate(&cfg));
    }

    #[test]
    fn rejects_unknown_strategy() {
        let mut cfg = config(vec![simple("10.0.0.1:80")]);
        cfg.selector.strategy = "fastest".to_string();
        assert!(!validate(&cfg));
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut cfg = config(vec![simple("10.0.0.1:80")]);
        cfg.log.level = "loud".to_string();
        assert!(!validate(&cfg));
    }

    #[test]
    fn rejects_bad_servers() {
        assert!(!validate(&config(Vec::new())));
        assert!(!validate(&config(vec![simple("")])));
        assert!(!validate(&config(vec![simple("a"), simple("a")])));
        assert!(!validate(&config(vec![Server::Full {
            address: "a".to_string(),
            weight: 0,
        }])));
    }

    #[test]
    fn hash_needs_keys() {
        let mut cfg = config(vec![simple("a")]);
        cfg.selector.strategy = "hash".to_string();
        assert!(!validate(&cfg));
        cfg.simulation.keys.push("user:1".to_string());
        assert!(validate(&cfg));
    }

    #[test]
    fn samples_must_reference_servers() {
        let mut cfg = config(vec![simple("a")]);
        cfg.simulation.samples.push(LatencySample {
            address: "b".to_string(),
            latency_ms: 5,
        });
        assert!(!validate(&cfg));
    }

    #[test]
    fn rejects_zero_draws() {
        let mut cfg = config(vec![simple("a")]);
        cfg.simulation.draws = 0;
        assert!(!validate(&cfg));
    }
}
