use std::{collections::HashSet, sync::Arc};

use log::debug;
use parking_lot::RwLock;

use crate::LbError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Server {
    address: String,
    weight: u32,
}

impl Server {
    pub fn new(address: impl Into<String>, weight: u32) -> Self {
        Self {
            address: address.into(),
            weight,
        }
    }

    pub fn unweighted(address: impl Into<String>) -> Self {
        Self::new(address, 1)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }
}

/// Immutable view of the pool at one version.
///
/// Selectors hold an `Arc` to a snapshot for as long as they live, so a
/// pool mutation never changes the servers an in-flight selection sees.
#[derive(Debug)]
pub struct PoolSnapshot {
    servers: Vec<Server>,
    version: u64,
}

impl PoolSnapshot {
    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn address(&self, index: usize) -> Option<&str> {
        self.servers.get(index).map(Server::address)
    }

    pub fn total_weight(&self) -> u64 {
        self.servers.iter().map(|s| u64::from(s.weight)).sum()
    }
}

/// Copy-on-write set of candidate servers.
///
/// Owned by whoever tracks backend health; every mutation publishes a new
/// snapshot with a bumped version instead of editing the current one.
pub struct ServerPool {
    current: RwLock<Arc<PoolSnapshot>>,
}

impl ServerPool {
    pub fn new(servers: Vec<Server>) -> Result<Self, LbError> {
        validate(&servers)?;
        Ok(Self {
            current: RwLock::new(Arc::new(PoolSnapshot {
                servers,
                version: 0,
            })),
        })
    }

    pub fn snapshot(&self) -> Arc<PoolSnapshot> {
        self.current.read().clone()
    }

    pub fn version(&self) -> u64 {
        self.current.read().version
    }

    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }

    /// Appends a server, returning the new version.
    pub fn add(&self, server: Server) -> Result<u64, LbError> {
        let mut current = self.current.write();
        let mut servers = current.servers.clone();
        servers.push(server);
        validate(&servers)?;
        Ok(publish(&mut current, servers))
    }

    /// Removes the server with `address`. Returns `None` when it was not in
    /// the pool, in which case no new version is published.
    pub fn remove(&self, address: &str) -> Option<u64> {
        let mut current = self.current.write();
        let position = current.servers.iter().position(|s| s.address == address)?;
        let mut servers = current.servers.clone();
        servers.remove(position);
        Some(publish(&mut current, servers))
    }

    /// Swaps the whole membership at once.
    pub fn replace(&self, servers: Vec<Server>) -> Result<u64, LbError> {
        validate(&servers)?;
        let mut current = self.current.write();
        Ok(publish(&mut current, servers))
    }
}

fn publish(current: &mut Arc<PoolSnapshot>, servers: Vec<Server>) -> u64 {
    let version = current.version + 1;
    debug!("publishing pool version {version} with {} servers", servers.len());
    *current = Arc::new(PoolSnapshot { servers, version });
    version
}

fn validate(servers: &[Server]) -> Result<(), LbError> {
    let mut seen = HashSet::with_capacity(servers.len());
    for server in servers {
        if server.address.is_empty() {
            return Err(LbError::EmptyAddress);
        }
        if server.weight < 1 {
            return Err(LbError::InvalidWeight {
                address: server.address.clone(),
                weight: server.weight,
            });
        }
        if !seen.insert(server.address.as_str()) {
            return Err(LbError::DuplicateServer(server.address.clone()));
        }
    }
    Ok(())
}
