//! Addressable pool asset.
//!
//! The addressable variant resolves its prefabs through the content
//! subsystem. `init` validates every key and fires one load task per pool;
//! each task reports back over a completion channel. The owner drains that
//! channel from its update turn with `process_completions`, which preloads
//! each completed pool and flips the ready flag exactly once when the last
//! completion arrives, in whatever order the loads finish.
//!
//! Releasing the asset drops the channel's receive side, so a load that
//! completes afterwards sends into a closed channel and becomes a no-op.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::{AddressablePoolAssetConfig, AddressablePoolConfig};
use crate::content::{ContentError, ContentProvider};
use crate::prefab::{AssetKey, Instance, Instantiator, Prefab, TemplateId};
use crate::scene::ParentContext;

use super::directory::PoolDirectory;
use super::prefab_pool::PrefabPool;
use super::{PoolAsset, PoolError};

/// Outcome of one prefab load, delivered over the completion channel.
struct Completion {
    index: usize,
    key: AssetKey,
    result: Result<Arc<Prefab>, ContentError>,
}

struct AddressableInner {
    name: String,
    configs: Vec<AddressablePoolConfig>,
    pools: HashMap<TemplateId, PrefabPool>,
    name_index: HashMap<String, TemplateId>,
    key_index: HashMap<AssetKey, TemplateId>,
    parent: Option<ParentContext>,
    is_ready: bool,
    completed: usize,
    completions: Option<async_channel::Receiver<Completion>>,
    provider: Arc<dyn ContentProvider>,
    instantiator: Arc<dyn Instantiator>,
}

/// Thread-safe handle to an addressable pool asset.
///
/// Cloning the handle shares the same underlying pools, so a clone can be
/// registered in a [`PoolDirectory`] while the owner keeps driving the
/// lifecycle.
#[derive(Clone)]
pub struct AddressablePoolAsset {
    inner: Arc<Mutex<AddressableInner>>,
}

impl AddressablePoolAsset {
    /// Build an asset from authored configuration. Loads are not issued
    /// until [`init`](Self::init).
    pub fn from_config(
        config: AddressablePoolAssetConfig,
        provider: Arc<dyn ContentProvider>,
        instantiator: Arc<dyn Instantiator>,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(AddressableInner {
                name: config.name,
                configs: config.pools,
                pools: HashMap::new(),
                name_index: HashMap::new(),
                key_index: HashMap::new(),
                parent: None,
                is_ready: false,
                completed: 0,
                completions: None,
                provider,
                instantiator,
            })),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, AddressableInner>, PoolError> {
        self.inner.lock().map_err(|_| PoolError::LockPoisoned)
    }

    /// Validate every configured key and issue one load task per pool.
    ///
    /// Returns immediately; readiness arrives later through
    /// [`process_completions`](Self::process_completions). A malformed key is
    /// an authoring mistake and fails before any load is issued.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn init(&self, parent: Option<ParentContext>) -> Result<(), PoolError> {
        let mut inner = self.lock()?;
        inner.is_ready = false;
        inner.parent = parent;
        inner.completed = 0;

        for config in &inner.configs {
            if !config.key.is_valid() {
                return Err(PoolError::InvalidKey {
                    asset: inner.name.clone(),
                    key: config.key.as_str().to_string(),
                });
            }
        }

        // Fresh channel per init generation: completions from a previous
        // generation hold a sender into a channel whose receiver is gone.
        let (sender, receiver) = async_channel::unbounded();
        inner.completions = Some(receiver);

        for (index, config) in inner.configs.iter().enumerate() {
            let provider = inner.provider.clone();
            let key = config.key.clone();
            let sender = sender.clone();
            tokio::spawn(async move {
                let result = provider.load_prefab(&key).await;
                // The asset may have been released while the load was in
                // flight; a closed channel makes this completion a no-op.
                let _ = sender.send(Completion { index, key, result }).await;
            });
        }

        debug!(asset = %inner.name, pools = inner.configs.len(), "issued prefab loads");
        Ok(())
    }

    /// Drain completed loads, preloading each finished pool.
    ///
    /// Call once per update turn. When the last configured pool completes
    /// (completions may arrive in any order) the asset flips to ready exactly
    /// once and registers itself in the directory. Returns the readiness flag.
    ///
    /// An absent prefab or a duplicate resolved display name is surfaced as a
    /// hard error, matching the direct variant's init-time failures.
    pub fn process_completions(&self, directory: &PoolDirectory) -> Result<bool, PoolError> {
        let mut ready_name = None;
        {
            let mut inner = self.lock()?;
            let receiver = match &inner.completions {
                Some(receiver) => receiver.clone(),
                None => return Ok(inner.is_ready),
            };

            while let Ok(completion) = receiver.try_recv() {
                let prefab = match completion.result {
                    Ok(prefab) => prefab,
                    Err(source) => {
                        return Err(PoolError::LoadFailed {
                            key: completion.key.as_str().to_string(),
                            source,
                        })
                    }
                };

                if inner.name_index.contains_key(prefab.name()) {
                    return Err(PoolError::DuplicateName {
                        asset: inner.name.clone(),
                        name: prefab.name().to_string(),
                    });
                }

                let preload_count = inner.configs[completion.index].preload_count;
                let mut pool = PrefabPool::new(
                    prefab.clone(),
                    preload_count,
                    inner.instantiator.clone(),
                );
                let parent = inner.parent.clone();
                pool.preload(parent.as_ref());

                inner
                    .name_index
                    .insert(prefab.name().to_string(), prefab.id());
                inner.key_index.insert(completion.key, prefab.id());
                inner.pools.insert(prefab.id(), pool);
                inner.completed += 1;

                if inner.completed == inner.configs.len() && !inner.is_ready {
                    inner.is_ready = true;
                    ready_name = Some(inner.name.clone());
                    debug!(asset = %inner.name, pools = inner.pools.len(), "pool asset ready");
                }
            }
        }

        if let Some(name) = ready_name {
            directory.register(&name, Arc::new(self.clone()))?;
        }
        Ok(self.is_ready())
    }

    /// Poll [`process_completions`](Self::process_completions) until the
    /// asset is ready or `timeout` elapses. Convenience for startup code and
    /// tests; per-frame callers drive `process_completions` themselves.
    pub async fn wait_ready(
        &self,
        directory: &PoolDirectory,
        timeout: Duration,
    ) -> Result<(), PoolError> {
        let started = Instant::now();
        loop {
            if self.process_completions(directory)? {
                return Ok(());
            }
            if started.elapsed() >= timeout {
                return Err(PoolError::ReadyTimeout {
                    asset: self.asset_name(),
                    waited: timeout,
                });
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    /// Destroy every pool, release every loaded content handle, clear all
    /// indexes, and deregister from the directory.
    ///
    /// Safe to call before the asset ever became ready: loads still in
    /// flight complete against a closed channel and are ignored.
    pub fn release(&self, directory: &PoolDirectory) -> Result<(), PoolError> {
        let name = {
            let mut inner = self.lock()?;
            for pool in inner.pools.values_mut() {
                pool.destroy_pool();
            }
            let provider = inner.provider.clone();
            for key in inner.key_index.keys() {
                provider.release(key);
            }
            inner.pools.clear();
            inner.name_index.clear();
            inner.key_index.clear();
            inner.parent = None;
            inner.is_ready = false;
            inner.completed = 0;
            inner.completions = None;
            inner.name.clone()
        };

        directory.deregister(&name);
        Ok(())
    }

    /// Spawn an instance by prefab display name.
    ///
    /// Misses (unknown name, or the pool's load has not completed yet) log a
    /// warning and return `None`; they are never hard errors.
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

    /// Spawn an instance by the asset key its pool was configured with.
    pub fn spawn_by_key(&self, key: &AssetKey) -> Option<Instance> {
        let mut inner = self.lock().ok()?;
        match inner.key_index.get(key).copied() {
            Some(template) => inner.pools.get_mut(&template).map(PrefabPool::spawn),
            None => {
                warn!(
                    asset = %inner.name,
                    key = %key,
                    ready = inner.is_ready,
                    "spawn failed, no pool for asset key"
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

    /// Template id resolved for a prefab name, once its pool has completed.
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

impl PoolAsset for AddressablePoolAsset {
    fn asset_name(&self) -> String {
        AddressablePoolAsset::asset_name(self)
    }

    fn is_ready(&self) -> bool {
        AddressablePoolAsset::is_ready(self)
    }

    fn spawn(&self, prefab_name: &str) -> Option<Instance> {
        AddressablePoolAsset::spawn(self, prefab_name)
    }

    fn spawn_by_id(&self, template: TemplateId) -> Option<Instance> {
        AddressablePoolAsset::spawn_by_id(self, template)
    }

    fn owns(&self, template: TemplateId) -> bool {
        self.lock()
            .map(|inner| inner.pools.contains_key(&template))
            .unwrap_or(false)
    }

    fn recycle(&self, instance: Instance) {
        AddressablePoolAsset::recycle(self, instance)
    }

    fn release_into(&self, directory: &PoolDirectory) -> Result<(), PoolError> {
        AddressablePoolAsset::release(self, directory)
    }
}
