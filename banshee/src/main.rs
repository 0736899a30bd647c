//! Banshee - server selection simulator
//!
//! Loads a pool and strategy from YAML, replays latency samples into the
//! stats tracker, and prints how the selector spreads a batch of picks.

use std::{process, sync::Arc, time::Duration};

use clap::Parser;
use log::{error, info};

use banshee_config::{config::Config, validator::validate as validate_config};
use banshee_lb::{
    LbError, Selector, SelectorFactory, Server, ServerPool, SharedRng, StatsTracker, Strategy,
    harness::{self, Distribution},
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    // Sets a custom config file
    #[arg(short, long)]
    config: Option<String>,

    // Overrides simulation.draws
    #[arg(short, long)]
    draws: Option<usize>,

    // Overrides selector.strategy
    #[arg(short, long)]
    strategy: Option<String>,
}

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(|| "./config/config.yaml".to_string());

    // Read configuration file
    let mut config = match banshee_config::loader::read_config(&config_path) {
        Ok(cfg) => cfg,
        Err(err_msg) => {
            eprintln!("Error loading config: {}", err_msg);
            process::exit(1);
        }
    };

    if let Some(draws) = cli.draws {
        config.simulation.draws = draws;
    }
    if let Some(strategy) = cli.strategy {
        config.selector.strategy = strategy;
    }

    // Initialize the Logger
    if let Err(err) =
        banshee_utils::logger::init_logger(&config.log.level, config.log.file.as_deref())
    {
        eprintln!("Error initialising logger: {}", err);
        process::exit(1);
    }

    // Validate Configurations
    if !validate_config(&config) {
        error!("Configuration validation failed. Exiting...");
        process::exit(1);
    }

    info!("Banshee is starting");
    match run(&config) {
        Ok((selector, distribution)) => report(&selector, &distribution),
        Err(err) => {
            error!("Simulation failed: {}", err);
            process::exit(1);
        }
    }
}

fn run(config: &Config) -> Result<(Selector, Distribution), LbError> {
    let strategy = Strategy::from_config(&config.selector.strategy)?;
    let pool = build_pool(config)?;
    let stats = Arc::new(StatsTracker::new());
    for sample in &config.simulation.samples {
        stats.record_sample(&sample.address, Duration::from_millis(sample.latency_ms));
    }

    let rng = match config.selector.seed {
        Some(seed) => SharedRng::seeded(seed),
        None => SharedRng::from_entropy(),
    };
    let selector = SelectorFactory::new(rng)
        .with_stats(stats)
        .build(&pool, strategy)?;

    info!(
        "Running {} over {} servers",
        strategy,
        selector.snapshot().len()
    );
    let distribution = if strategy.is_keyed() {
        harness::sample_keys(&selector, config.simulation.keys.iter().map(String::as_str))?
    } else {
        harness::sample(&selector, config.simulation.draws)?
    };
    Ok((selector, distribution))
}

fn build_pool(config: &Config) -> Result<ServerPool, LbError> {
    let servers = config
        .servers
        .iter()
        .map(|s| Server::new(s.address(), s.weight()))
        .collect();
    ServerPool::new(servers)
}

fn report(selector: &Selector, distribution: &Distribution) {
    println!("strategy: {}", selector.strategy());
    println!("draws: {}", distribution.draws());
    for server in selector.snapshot().servers() {
        println!(
            "{:<24} weight={:<4} count={:<8} share={:.2}%",
            server.address(),
            server.weight(),
            distribution.count(server.address()),
            distribution.share(server.address()) * 100.0
        );
    }
}
