use crate::config::{Log, Selection, Simulation};

// default values
pub fn get_default_weight() -> u32 {
    1
}

pub fn get_default_strategy() -> String {
    String::from("round-robin")
}

pub fn get_default_draws() -> usize {
    10_000
}

pub fn get_default_log_level() -> String {
    String::from("info")
}

pub fn get_default_log() -> Log {
    Log {
        level: get_default_log_level(),
        file: None,
    }
}

pub fn get_default_selector() -> Selection {
    Selection {
        strategy: get_default_strategy(),
        seed: None,
    }
}

pub fn get_default_simulation() -> Simulation {
    Simulation {
        draws: get_default_draws(),
        keys: Vec::new(),
        samples: Vec::new(),
    }
}
