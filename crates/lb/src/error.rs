#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LbError {
    /// A selector was requested over a pool with no servers.
    EmptyPool,
    /// A selector had nothing to pick from at call time.
    NoServersAvailable,
    InvalidWeight { address: String, weight: u32 },
    DuplicateServer(String),
    EmptyAddress,
    /// The least-response-time strategy was requested without a stats tracker.
    MissingStats,
    /// `select()` was called on a strategy that routes by key.
    KeyRequired,
    UnknownStrategy(String),
    /// An expansion strategy would need more slots than it is allowed.
    WeightTooLarge { total: u64, limit: u64 },
}

impl std::fmt::Display for LbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LbError::EmptyPool => write!(f, "server pool is empty"),
            LbError::NoServersAvailable => write!(f, "no servers available"),
            LbError::InvalidWeight { address, weight } => {
                write!(f, "invalid weight {weight} for server {address} (must be >= 1)")
            }
            LbError::DuplicateServer(address) => write!(f, "duplicate server: {address}"),
            LbError::EmptyAddress => write!(f, "server address is empty"),
            LbError::MissingStats => {
                write!(f, "least-response-time selection needs a stats tracker")
            }
            LbError::KeyRequired => write!(f, "hash selection needs a key"),
            LbError::UnknownStrategy(name) => {
                write!(f, "unsupported load balancing type: {name}")
            }
            LbError::WeightTooLarge { total, limit } => write!(
                f,
                "total weight {total} exceeds {limit}, the expansion limit; use a non-expanding strategy"
            ),
        }
    }
}

impl std::error::Error for LbError {}
