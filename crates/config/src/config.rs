use serde::{Deserialize, Serialize};

use crate::default::{
    get_default_draws, get_default_log, get_default_log_level, get_default_selector,
    get_default_simulation, get_default_strategy, get_default_weight,
};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    pub version: u32,

    #[serde(default = "get_default_log")]
    pub log: Log,

    #[serde(default = "get_default_selector")]
    pub selector: Selection,

    pub servers: Vec<Server>,

    #[serde(default = "get_default_simulation")]
    pub simulation: Simulation,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Server {
    Simple(String),
    Full {
        address: String,

        #[serde(default = "get_default_weight")]
        weight: u32,
    },
}

impl Server {
    pub fn address(&self) -> &str {
        match self {
            Server::Simple(address) => address,
            Server::Full { address, .. } => address,
        }
    }

    pub fn weight(&self) -> u32 {
        match self {
            Server::Simple(_) => get_default_weight(),
            Server::Full { weight, .. } => *weight,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Selection {
    #[serde(default = "get_default_strategy")]
    pub strategy: String, // round-robin | smooth-weighted-round-robin | hash | ...

    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Simulation {
    #[serde(default = "get_default_draws")]
    pub draws: usize,

    // routed one by one when the strategy is keyed
    #[serde(default)]
    pub keys: Vec<String>,

    #[serde(default)]
    pub samples: Vec<LatencySample>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LatencySample {
    pub address: String,
    pub latency_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Log {
    // whisper -> trace
    // haunt -> debug
    // spooky -> info
    // scream -> warn
    // poltergeist -> error
    // silence -> off
    #[serde(default = "get_default_log_level")]
    pub level: String,

    #[serde(default)]
    pub file: Option<String>,
}
