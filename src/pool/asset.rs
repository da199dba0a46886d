//! Direct-reference pool asset.
//!
//! The direct variant has every prefab available synchronously, so `init`
//! materializes all pools in one pass, flips the ready flag, and registers
//! the asset in the directory before returning.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::config::{PrefabPoolAssetConfig, PrefabPoolConfig};
use crate::prefab::{Instance, Instantiator, Prefab, TemplateId};
use crate::scene::ParentContext;

use super::directory::PoolDirectory;
use super::prefab_pool::PrefabPool;
use super::{PoolAsset, PoolError};

struct AssetInner {
    name: String,
    configs: Vec<PrefabPoolConfig>,
    pools: HashMap<TemplateId, PrefabPool>,
    name_index: HashMap<String, TemplateId>,
    parent: Option<ParentContext>,
    is_ready: bool,
    instantiator: Arc<dyn Instantiator>,
}

/// Thread-safe handle to a direct-reference pool asset.
///
/// Cloning the handle shares the same underlying pools, so a clone can be
/// registered in a [`PoolDirectory`] while the owner keeps driving the
/// lifecycle.
#[derive(Clone)]
pub struct PrefabPoolAsset {
    inner: Arc<Mutex<AssetInner>>,
}

impl PrefabPoolAsset {
    /// Build an asset from authored configuration. Pools are not materialized
    /// until [`init`](Self::init).
    pub fn from_config(
        config: PrefabPoolAssetConfig,
        instantiator: Arc<dyn Instantiator>,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(AssetInner {
                name: config.name,
                configs: config.pools,
                pools: HashMap::new(),
                name_index: HashMap::new(),
                parent: None,
                is_ready: false,
                instantiator,
            })),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, AssetInner>, PoolError> {
        self.inner.lock().map_err(|_| PoolError::LockPoisoned)
    }

    /// Materialize every configured pool, preload instances into `parent`,
    /// and register the asset in the directory under its display name.
    ///
    /// Fails on a blank prefab name or a duplicate resolved name; both are
    /// authoring mistakes. On failure the asset may hold partially built
    /// pools; [`release`](Self::release) cleans those up.
    pub fn init(
        &self,
        parent: Option<ParentContext>,
        directory: &PoolDirectory,
    ) -> Result<(), PoolError> {
        let name = {
            let mut inner = self.lock()?;
            inner.is_ready = false;
            inner.parent = parent;

            let configs = inner.configs.clone();
            for config in configs {
                if config.prefab_name.trim().is_empty() {
                    return Err(PoolError::MissingPrefab {
                        asset: inner.name.clone(),
                    });
                }
                if inner.name_index.contains_key(&config.prefab_name) {
                    return Err(PoolError::DuplicateName {
                        asset: inner.name.clone(),
                        name: config.prefab_name,
                    });
                }

                let prefab = Arc::new(Prefab::new(config.prefab_name.as_str()));
                let mut pool = PrefabPool::new(
                    prefab.clone(),
                    config.preload_count,
                    inner.instantiator.clone(),
                );
                let parent = inner.parent.clone();
                pool.preload(parent.as_ref());

                inner.name_index.insert(config.prefab_name, prefab.id());
                inner.pools.insert(prefab.id(), pool);
            }

            inner.is_ready = true;
            debug!(asset = %inner.name, pools = inner.pools.len(), "pool asset ready");
            inner.name.clone()
        };

        directory.register(&name, Arc::new(self.clone()))
    }

    /// Destroy every pool, clear all indexes, and deregister from the
    /// directory. Safe to call on a partially-initialized asset.
    pub fn release(&self, directory: &PoolDirectory) -> Result<(), PoolError> {
        let name = {
            let mut inner = self.lock()?;
            for pool in inner.pools.values_mut() {
                pool.destroy_pool();
            }
            inner.pools.clear();
            inner.name_index.clear();
            inner.parent = None;
            inner.is_ready = false;
            inner.name.clone()
        };

        directory.deregister(&name);
        Ok(())
    }

    /// Spawn an instance by prefab display name.
    ///
    /// Misses (unknown name, or the asset is not initialized) log a warning
    /// and return `None`; they are never hard errors.
    pub fn spawn(&self, prefab_name: &str) -> Option<Instance> {
        let mut inner = match self.lock() {
            Ok(inner) => inner,
            Err(_) => {
                warn!(prefab = prefab_name, "spawn failed, pool asset lock poisoned");
                return None;
            }
        };
        match inner.name_index.get(prefab_name).copied() {
            Some(template) => inner.pools.get_mut(&template).map(PrefabPool::spawn),
            None => {
                warn!(
                    asset = %inner.name,
                    prefab = prefab_name,
                    ready = inner.is_ready,
                    "spawn failed, no pool for prefab name"
                );
                None
            }
        }
    }

    /// Spawn an instance by template id.
    pub fn spawn_by_id(&self, template: TemplateId) -> Option<Instance> {
        let mut inner = self.lock().ok()?;
        match inner.pools.get_mut(&template) {
            Some(pool) => Some(pool.spawn()),
            None => {
                warn!(asset = %inner.name, template = %template, "spawn failed, no pool for template");
                None
            }
        }
    }

    /// Return an instance to its owning pool.
    ///
    /// If no pool here owns the instance's template it is destroyed with a
    /// warning rather than leaked.
    pub fn recycle(&self, instance: Instance) {
        let mut inner = match self.lock() {
            Ok(inner) => inner,
            Err(_) => {
                warn!(name = instance.name(), "recycle failed, pool asset lock poisoned");
                return;
            }
        };
        let parent = inner.parent.clone();
        match inner.pools.get_mut(&instance.template_id()) {
            Some(pool) => pool.recycle(instance, parent.as_ref()),
            None => {
                warn!(
                    asset = %inner.name,
                    name = instance.name(),
                    template = %instance.template_id(),
                    "recycle failed, no pool for template, destroying instance"
                );
                let instantiator = inner.instantiator.clone();
                instantiator.destroy(instance);
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.lock().map(|inner| inner.is_ready).unwrap_or(false)
    }

    pub fn asset_name(&self) -> String {
        self.lock()
            .map(|inner| inner.name.clone())
            .unwrap_or_default()
    }

    /// Template id resolved for a prefab name, once the asset is ready.
    pub fn template_id(&self, prefab_name: &str) -> Option<TemplateId> {
        self.lock()
            .ok()?
            .name_index
            .get(prefab_name)
            .copied()
    }

    /// `(available, issued)` counts for a prefab's pool, for diagnostics.
    pub fn pool_counts(&self, prefab_name: &str) -> Option<(usize, usize)> {
        let inner = self.lock().ok()?;
        let template = inner.name_index.get(prefab_name)?;
        inner
            .pools
            .get(template)
            .map(|pool| (pool.available_count(), pool.issued_count()))
    }
}

impl PoolAsset for PrefabPoolAsset {
    fn asset_name(&self) -> String {
        PrefabPoolAsset::asset_name(self)
    }

    fn is_ready(&self) -> bool {
        PrefabPoolAsset::is_ready(self)
    }

    fn spawn(&self, prefab_name: &str) -> Option<Instance> {
        PrefabPoolAsset::spawn(self, prefab_name)
    }

    fn spawn_by_id(&self, template: TemplateId) -> Option<Instance> {
        PrefabPoolAsset::spawn_by_id(self, template)
    }

    fn owns(&self, template: TemplateId) -> bool {
        self.lock()
            .map(|inner| inner.pools.contains_key(&template))
            .unwrap_or(false)
    }

    fn recycle(&self, instance: Instance) {
        PrefabPoolAsset::recycle(self, instance)
    }

    fn release_into(&self, directory: &PoolDirectory) -> Result<(), PoolError> {
        PrefabPoolAsset::release(self, directory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefab::MockInstantiator;

    fn asset_config() -> PrefabPoolAssetConfig {
        PrefabPoolAssetConfig {
            name: "combat".to_string(),
            pools: vec![
                PrefabPoolConfig {
                    prefab_name: "fireball".to_string(),
                    preload_count: 2,
                },
                PrefabPoolConfig {
                    prefab_name: "smoke".to_string(),
                    preload_count: 0,
                },
            ],
        }
    }

    #[test]
    fn test_init_preloads_and_registers() {
        let directory = PoolDirectory::new();
        let instantiator = Arc::new(MockInstantiator::new());
        let asset = PrefabPoolAsset::from_config(asset_config(), instantiator.clone());

        asset.init(None, &directory).unwrap();
        assert!(asset.is_ready());
        assert_eq!(asset.pool_counts("fireball"), Some((2, 0)));
        assert_eq!(asset.pool_counts("smoke"), Some((0, 0)));
        assert_eq!(instantiator.created_count(), 2);
        assert!(directory.contains("combat"));
    }

    #[test]
    fn test_duplicate_prefab_name_is_fatal() {
        let directory = PoolDirectory::new();
        let config = PrefabPoolAssetConfig {
            name: "broken".to_string(),
            pools: vec![
                PrefabPoolConfig {
                    prefab_name: "fireball".to_string(),
                    preload_count: 1,
                },
                PrefabPoolConfig {
                    prefab_name: "fireball".to_string(),
                    preload_count: 1,
                },
            ],
        };
        let asset = PrefabPoolAsset::from_config(config, Arc::new(MockInstantiator::new()));

        let result = asset.init(None, &directory);
        assert!(matches!(result, Err(PoolError::DuplicateName { .. })));
        assert!(!asset.is_ready());
        assert!(!directory.contains("broken"));

        // Release must clean up the partially built state without panicking.
        asset.release(&directory).unwrap();
    }

    #[test]
    fn test_blank_prefab_name_is_fatal() {
        let directory = PoolDirectory::new();
        let config = PrefabPoolAssetConfig {
            name: "broken".to_string(),
            pools: vec![PrefabPoolConfig {
                prefab_name: "   ".to_string(),
                preload_count: 1,
            }],
        };
        let asset = PrefabPoolAsset::from_config(config, Arc::new(MockInstantiator::new()));
        assert!(matches!(
            asset.init(None, &directory),
            Err(PoolError::MissingPrefab { .. })
        ));
    }

    #[test]
    fn test_spawn_unknown_name_returns_none() {
        let directory = PoolDirectory::new();
        let asset =
            PrefabPoolAsset::from_config(asset_config(), Arc::new(MockInstantiator::new()));
        asset.init(None, &directory).unwrap();

        assert!(asset.spawn("meteor").is_none());
        // Spawning before init follows the same miss path.
        let uninitialized = PrefabPoolAsset::from_config(
            asset_config(),
            Arc::new(MockInstantiator::new()),
        );
        assert!(uninitialized.spawn("fireball").is_none());
    }

    #[test]
    fn test_recycle_routes_by_template_identity() {
        let directory = PoolDirectory::new();
        let instantiator = Arc::new(MockInstantiator::new());
        let asset = PrefabPoolAsset::from_config(asset_config(), instantiator.clone());
        asset.init(None, &directory).unwrap();

        let instance = asset.spawn("fireball").unwrap();
        assert_eq!(asset.pool_counts("fireball"), Some((1, 1)));

        asset.recycle(instance);
        assert_eq!(asset.pool_counts("fireball"), Some((2, 0)));
        assert_eq!(instantiator.destroyed_count(), 0);
    }

    #[test]
    fn test_recycle_foreign_instance_destroys_it() {
        let directory = PoolDirectory::new();
        let instantiator = Arc::new(MockInstantiator::new());
        let asset = PrefabPoolAsset::from_config(asset_config(), instantiator.clone());
        asset.init(None, &directory).unwrap();

        let foreign_prefab = Prefab::new("fireball");
        let foreign = Instance::new(&foreign_prefab);
        asset.recycle(foreign);

        // Same display name, different template id: never pooled.
        assert_eq!(asset.pool_counts("fireball"), Some((2, 0)));
        assert_eq!(instantiator.destroyed_count(), 1);
    }

    #[test]
    fn test_release_clears_state_and_directory_entry() {
        let directory = PoolDirectory::new();
        let instantiator = Arc::new(MockInstantiator::new());
        let asset = PrefabPoolAsset::from_config(asset_config(), instantiator.clone());
        asset.init(None, &directory).unwrap();

        let held = asset.spawn("fireball").unwrap();
        asset.release(&directory).unwrap();

        assert!(!asset.is_ready());
        assert!(!directory.contains("combat"));
        assert_eq!(instantiator.destroyed_count(), 1); // the pooled one

        // Post-release calls degrade gracefully.
        assert!(asset.spawn("fireball").is_none());
        asset.recycle(held);
        assert_eq!(instantiator.destroyed_count(), 2);
        assert!(!directory.contains("combat"));
    }

    #[test]
    fn test_reinit_after_release() {
        let directory = PoolDirectory::new();
        let asset =
            PrefabPoolAsset::from_config(asset_config(), Arc::new(MockInstantiator::new()));

        asset.init(None, &directory).unwrap();
        asset.release(&directory).unwrap();
        asset.init(None, &directory).unwrap();

        assert!(asset.is_ready());
        assert_eq!(asset.pool_counts("fireball"), Some((2, 0)));
    }
}
