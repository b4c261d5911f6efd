//! File-backed lookup tables for broker instrument identifiers.
//!
//! The broker refers to instruments by opaque identifiers. These caches map
//! them to option contracts and stock tickers so that a replay never needs
//! the network.

use anyhow::{Context, Result};
use lotledger_core::OptionContract;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::normalize::InstrumentResolver;

/// Read a JSON document, falling back to the default when the file is
/// missing or unreadable.
fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no cache file, starting empty");
            return T::default();
        }
    };

    serde_json::from_str(&content).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "ignoring corrupt cache file");
        T::default()
    })
}

/// Option contracts keyed by instrument identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstrumentCache {
    contracts: BTreeMap<String, OptionContract>,
    dirty: bool,
}

impl InstrumentCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a cache file.
    ///
    /// A missing or corrupt file yields an empty cache.
    pub fn load(path: &Path) -> Self {
        let contracts: BTreeMap<String, OptionContract> = load_or_default(path);
        debug!(path = %path.display(), count = contracts.len(), "loaded instrument cache");
        Self {
            contracts,
            dirty: false,
        }
    }

    /// Write the cache as pretty-printed JSON.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.contracts)
            .context("Failed to serialize instrument cache")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write cache: {}", path.display()))?;
        self.dirty = false;
        Ok(())
    }

    /// Add or replace a contract. Returns `true` if the entry changed.
    pub fn insert(&mut self, id: impl Into<String>, contract: OptionContract) -> bool {
        let id = id.into();
        if self.contracts.get(&id) == Some(&contract) {
            return false;
        }
        self.contracts.insert(id, contract);
        self.dirty = true;
        true
    }

    /// The contract for `id`, if cached.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&OptionContract> {
        self.contracts.get(id)
    }

    /// Number of cached contracts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Whether entries were added since the last load or save.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl InstrumentResolver for InstrumentCache {
    fn resolve(&self, id: &str) -> Option<OptionContract> {
        self.get(id).cloned()
    }
}

/// Stock tickers keyed by instrument identifier.
///
/// Several identifiers may map to one ticker, e.g. after a company rename.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickerCache {
    tickers: BTreeMap<String, String>,
}

impl TickerCache {
    /// Load a cache file; missing or corrupt files yield an empty cache.
    pub fn load(path: &Path) -> Self {
        Self {
            tickers: load_or_default(path),
        }
    }

    /// Add or replace a ticker.
    pub fn insert(&mut self, id: impl Into<String>, ticker: impl Into<String>) {
        self.tickers.insert(id.into(), ticker.into());
    }

    /// The ticker for `id`, if cached.
    #[must_use]
    pub fn ticker(&self, id: &str) -> Option<&str> {
        self.tickers.get(id).map(String::as_str)
    }

    /// Number of cached tickers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}
