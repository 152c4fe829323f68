//! Registry of known chains
//!
//! Registration takes `&mut self` and happens during initialisation. Once
//! built, the registry is only read, so it can be shared across threads
//! behind an `Arc` without locking.

use std::collections::HashMap;
use std::sync::Arc;

use crate::record::{ChainParams, Magic};
use crate::{Error, Result};

/// Set of chains indexed by name, symbol and magic
#[derive(Debug, Default)]
pub struct ChainRegistry {
    chains: Vec<Arc<ChainParams>>,
    by_name: HashMap<String, usize>,
    by_symbol: HashMap<String, usize>,
    by_magic: HashMap<Magic, usize>,
}

impl ChainRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chain
    ///
    /// Fails with [`Error::DuplicateChain`] if the name or symbol is taken;
    /// the registry is left untouched in that case. When two chains share a
    /// magic, magic lookups keep resolving to the first one registered.
    pub fn register(&mut self, params: ChainParams) -> Result<Arc<ChainParams>> {
        if self.by_name.contains_key(params.name()) {
            return Err(Error::DuplicateChain {
                field: "name",
                value: params.name().to_string(),
            });
        }
        if self.by_symbol.contains_key(params.symbol()) {
            return Err(Error::DuplicateChain {
                field: "symbol",
                value: params.symbol().to_string(),
            });
        }

        let index = self.chains.len();
        let params = Arc::new(params);

        self.by_name.insert(params.name().to_string(), index);
        self.by_symbol.insert(params.symbol().to_string(), index);
        if let Some(&existing) = self.by_magic.get(&params.magic()) {
            tracing::warn!(
                "Magic {} of {} already belongs to {}; magic lookups keep the earlier chain",
                params.magic(),
                params.name(),
                self.chains[existing].name()
            );
        } else {
            self.by_magic.insert(params.magic(), index);
        }
        self.chains.push(params.clone());

        tracing::debug!(
            "Registered chain {} ({}) magic={} hash={}",
            params.name(),
            params.symbol(),
            params.magic(),
            params.hash_strategy().name()
        );

        Ok(params)
    }

    /// Look up a chain by exact name
    pub fn lookup_by_name(&self, name: &str) -> Result<&Arc<ChainParams>> {
        self.by_name
            .get(name)
            .map(|&i| &self.chains[i])
            .ok_or_else(|| Error::UnknownChain(format!("name {name}")))
    }

    /// Look up a chain by exact ticker symbol
    pub fn lookup_by_symbol(&self, symbol: &str) -> Result<&Arc<ChainParams>> {
        self.by_symbol
            .get(symbol)
            .map(|&i| &self.chains[i])
            .ok_or_else(|| Error::UnknownChain(format!("symbol {symbol}")))
    }

    /// Look up a chain by its full 4-byte magic
    pub fn lookup_by_magic(&self, magic: impl Into<Magic>) -> Result<&Arc<ChainParams>> {
        let magic = magic.into();
        self.by_magic
            .get(&magic)
            .map(|&i| &self.chains[i])
            .ok_or_else(|| Error::UnknownChain(format!("magic {magic}")))
    }

    /// Registered chains in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ChainParams>> {
        self.chains.iter()
    }

    /// Registered chain names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.chains.iter().map(|c| c.name()).collect()
    }

    /// Number of registered chains
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}
