//! In-memory `ContractRegistry`.
//!
//! Thread-safe via `Arc<RwLock<Inner>>`: lookups from the decode path
//! proceed concurrently, registrations take the write lock only for the
//! duration of the map mutation.

use crate::abi_json;
use indexmap::IndexMap;
use logcast_core::contract::{normalize_address, ContractLookup, ContractMeta};
use logcast_core::RegistryError;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::info;

struct Inner {
    /// normalized address → entry, insertion-ordered for stable snapshots
    by_address: IndexMap<String, ContractMeta>,
    /// alias → normalized address
    aliases: HashMap<String, String>,
}

impl Inner {
    fn new() -> Self {
        Self {
            by_address: IndexMap::new(),
            aliases: HashMap::new(),
        }
    }
}

/// Append-only directory of deployed-contract metadata, keyed by address.
#[derive(Clone)]
pub struct ContractRegistry {
    inner: Arc<RwLock<Inner>>,
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::new())),
        }
    }

    /// Register a contract. The entry's raw ABI text is parsed and
    /// validated first; on any failure nothing is stored.
    ///
    /// Fails with `DuplicateAddress`/`DuplicateAlias` if either key is
    /// already taken.
    pub fn add(&self, meta: ContractMeta) -> Result<(), RegistryError> {
        self.insert(meta, false)
    }

    /// Register a contract, replacing any existing entry at the same
    /// address. The alias must still be free or owned by the replaced entry.
    pub fn add_overwrite(&self, meta: ContractMeta) -> Result<(), RegistryError> {
        self.insert(meta, true)
    }

    fn insert(&self, mut meta: ContractMeta, overwrite: bool) -> Result<(), RegistryError> {
        if meta.alias.is_empty() {
            return Err(RegistryError::MissingField {
                field: "alias".into(),
            });
        }
        if meta.address.is_empty() {
            return Err(RegistryError::MissingField {
                field: "address".into(),
            });
        }

        // Parse before taking the lock; a bad ABI never touches the map.
        meta.abi = abi_json::parse_abi(&meta.abi_json)?;
        if meta.timestamp == 0 {
            meta.timestamp = chrono::Utc::now().timestamp();
        }

        let key = normalize_address(&meta.address);
        let mut inner = self.inner.write().unwrap();

        if !overwrite && inner.by_address.contains_key(&key) {
            return Err(RegistryError::DuplicateAddress {
                address: meta.address.clone(),
            });
        }
        if let Some(owner) = inner.aliases.get(&meta.alias) {
            if *owner != key {
                return Err(RegistryError::DuplicateAlias {
                    alias: meta.alias.clone(),
                });
            }
        }

        let replaced_alias = inner.by_address.get(&key).map(|p| p.alias.clone());
        if let Some(old_alias) = replaced_alias {
            inner.aliases.remove(&old_alias);
        }
        info!(alias = %meta.alias, address = %meta.address, "registering contract");
        inner.aliases.insert(meta.alias.clone(), key.clone());
        inner.by_address.insert(key, meta);
        Ok(())
    }

    /// Entry for an address, if registered. Case-insensitive.
    pub fn get(&self, address: &str) -> Option<ContractMeta> {
        self.inner
            .read()
            .unwrap()
            .by_address
            .get(&normalize_address(address))
            .cloned()
    }

    /// Snapshot copy of every entry, in registration order. Later mutation
    /// of the registry does not affect a returned snapshot.
    pub fn all(&self) -> Vec<ContractMeta> {
        self.inner
            .read()
            .unwrap()
            .by_address
            .values()
            .cloned()
            .collect()
    }

    /// `all()` with the heavy ABI/bytecode payloads stripped, for list views.
    pub fn summaries(&self) -> Vec<ContractMeta> {
        self.inner
            .read()
            .unwrap()
            .by_address
            .values()
            .map(ContractMeta::stripped)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().by_address.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ContractRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractLookup for ContractRegistry {
    fn lookup(&self, address: &str) -> Option<ContractMeta> {
        self.get(address)
    }
}
