//! Pool directory: cross-cutting access to ready pool assets.
//!
//! Systems that want to recycle an instance rarely hold a reference to the
//! asset that spawned it. The directory is an explicit service object passed
//! to whoever needs that access: assets register themselves when they become
//! ready and deregister on release, and `recycle` routes an instance to the
//! asset that owns its template.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::warn;

use crate::prefab::Instance;

use super::{PoolAsset, PoolError};

/// Name-keyed collection of ready pool assets.
///
/// Cloning the directory shares the same entries, so one directory handle can
/// be handed to every system that needs spawn or recycle access.
#[derive(Clone, Default)]
pub struct PoolDirectory {
    inner: Arc<Mutex<HashMap<String, Arc<dyn PoolAsset>>>>,
}

impl PoolDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Arc<dyn PoolAsset>>>, PoolError> {
        self.inner.lock().map_err(|_| PoolError::LockPoisoned)
    }

    /// Register a ready asset under its display name.
    ///
    /// Two live assets with the same name is an authoring mistake, surfaced
    /// as a hard error; deregister the old one first to replace it.
    pub fn register(&self, name: &str, asset: Arc<dyn PoolAsset>) -> Result<(), PoolError> {
        let mut entries = self.lock()?;
        if entries.contains_key(name) {
            return Err(PoolError::AlreadyRegistered {
                name: name.to_string(),
            });
        }
        entries.insert(name.to_string(), asset);
        Ok(())
    }

    /// Remove an asset's entry. Returns whether an entry existed.
    pub fn deregister(&self, name: &str) -> bool {
        self.lock()
            .map(|mut entries| entries.remove(name).is_some())
            .unwrap_or(false)
    }

    /// Shared handle to a registered asset.
    pub fn get(&self, name: &str) -> Option<Arc<dyn PoolAsset>> {
        self.lock().ok()?.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock()
            .map(|entries| entries.contains_key(name))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Spawn from a registered asset by asset name and prefab name.
    ///
    /// Misses log a warning and return `None`.
    pub fn spawn(&self, asset_name: &str, prefab_name: &str) -> Option<Instance> {
        match self.get(asset_name) {
            Some(asset) => asset.spawn(prefab_name),
            None => {
                warn!(asset = asset_name, prefab = prefab_name, "spawn failed, no such pool asset");
                None
            }
        }
    }

    /// Route an instance back to whichever registered asset owns its
    /// template. An instance no asset owns is destroyed (dropped) with a
    /// warning rather than leaked.
    pub fn recycle(&self, instance: Instance) {
        let owner = match self.lock() {
            Ok(entries) => entries
                .values()
                .find(|asset| asset.owns(instance.template_id()))
                .cloned(),
            Err(_) => {
                warn!(name = instance.name(), "recycle failed, directory lock poisoned");
                return;
            }
        };
        match owner {
            Some(asset) => asset.recycle(instance),
            None => {
                warn!(
                    name = instance.name(),
                    template = %instance.template_id(),
                    "recycle failed, no registered asset owns template, destroying instance"
                );
                drop(instance);
            }
        }
    }
}
