//! Single-template instance pool.
//!
//! A `PrefabPool` owns one prefab and two collections: a free stack of idle
//! instances (most-recently-recycled reused first) and the set of instance ids
//! currently issued to callers. A live instance is always in exactly one of
//! the two; destroying the pool empties both.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::prefab::{Instance, InstanceId, Instantiator, Prefab, TemplateId};
use crate::scene::ParentContext;

use super::stats::PoolStats;

/// Fixed-template pool of reusable instances.
pub struct PrefabPool {
    prefab: Arc<Prefab>,
    preload_count: usize,
    available: Vec<Instance>,
    issued: HashSet<InstanceId>,
    instantiator: Arc<dyn Instantiator>,
    stats: PoolStats,
}

impl PrefabPool {
    /// Create an empty pool for the prefab. Call [`preload`](Self::preload)
    /// to materialize the configured number of instances.
    pub fn new(
        prefab: Arc<Prefab>,
        preload_count: usize,
        instantiator: Arc<dyn Instantiator>,
    ) -> Self {
        Self {
            prefab,
            preload_count,
            available: Vec::with_capacity(preload_count),
            issued: HashSet::new(),
            instantiator,
            stats: PoolStats::new(),
        }
    }

    /// Eagerly materialize the configured preload count.
    ///
    /// Each instance is parented to `parent` (if any), reset to the neutral
    /// pose, deactivated, and pushed onto the free stack.
    pub fn preload(&mut self, parent: Option<&ParentContext>) {
        for _ in 0..self.preload_count {
            let instance = self.materialize(parent);
            self.available.push(instance);
        }
        self.stats.record_preload(self.preload_count);
        debug!(
            template = %self.prefab.id(),
            name = self.prefab.name(),
            count = self.preload_count,
            "preloaded pool"
        );
    }

    /// Hand out an instance, reusing the most recently recycled one when the
    /// free stack is non-empty and instantiating on demand otherwise.
    ///
    /// Never blocks and never fails; the returned instance is active and
    /// tracked as issued until it comes back through [`recycle`](Self::recycle).
    pub fn spawn(&mut self) -> Instance {
        let (mut instance, reused) = match self.available.pop() {
            Some(instance) => (instance, true),
            None => (self.materialize(None), false),
        };

        instance.set_active(true);
        self.issued.insert(instance.id());
        self.stats.record_spawn(reused, self.issued.len());
        trace!(
            template = %self.prefab.id(),
            id = instance.id().raw(),
            reused,
            "spawned instance"
        );
        instance
    }

    /// Take an instance back.
    ///
    /// If the instance is tracked as issued it is deactivated, reparented,
    /// reset to the neutral pose, and pushed onto the free stack. Anything
    /// else (an instance from a different pool, or one issued before the pool
    /// was destroyed) is destroyed outright, so a stray instance is never
    /// double-pooled and never leaks.
    pub fn recycle(&mut self, mut instance: Instance, parent: Option<&ParentContext>) {
        if self.issued.remove(&instance.id()) {
            instance.set_active(false);
            if let Some(parent) = parent {
                instance.attach(parent);
            }
            instance.transform.reset_local();
            self.available.push(instance);
            self.stats.record_recycle(true);
        } else {
            debug!(
                template = %self.prefab.id(),
                id = instance.id().raw(),
                "recycled instance was not issued by this pool, destroying"
            );
            self.instantiator.destroy(instance);
            self.stats.record_recycle(false);
        }
    }

    /// Destroy every pooled instance and forget every issued one.
    ///
    /// Issued instances are owned by their callers and cannot be reached from
    /// here; dropping their ids means any later recycle lands on the destroy
    /// path. Safe to call on an already-empty pool.
    pub fn destroy_pool(&mut self) {
        let pooled = self.available.len();
        for instance in self.available.drain(..) {
            self.instantiator.destroy(instance);
        }
        let orphaned = self.issued.len();
        self.issued.clear();
        debug!(
            template = %self.prefab.id(),
            name = self.prefab.name(),
            pooled,
            orphaned,
            "destroyed pool"
        );
    }

    pub fn prefab(&self) -> &Arc<Prefab> {
        &self.prefab
    }

    pub fn template_id(&self) -> TemplateId {
        self.prefab.id()
    }

    pub fn prefab_name(&self) -> &str {
        self.prefab.name()
    }

    pub fn preload_count(&self) -> usize {
        self.preload_count
    }

    /// Number of idle instances on the free stack.
    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    /// Number of instances currently issued to callers.
    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }

    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    fn materialize(&self, parent: Option<&ParentContext>) -> Instance {
        let mut instance = self.instantiator.instantiate(&self.prefab);
        instance.set_active(false);
        if let Some(parent) = parent {
            instance.attach(parent);
        }
        instance.transform.reset_local();
        instance
    }
}
