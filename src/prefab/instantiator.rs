//! Instantiation service seam between pools and the host engine.
//!
//! Pools never create or destroy instances themselves; they go through an
//! `Instantiator` so the host engine can hook its own object lifecycle
//! (GPU uploads, scene-graph insertion, ...) into pooling.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tracing::trace;

use super::{Instance, Prefab};

/// Creates and destroys instances on behalf of a pool.
///
/// Implementations must tolerate `destroy` being handed any instance,
/// including ones they did not create.
pub trait Instantiator: Send + Sync {
    /// Produce a new independent instance cloned from the prefab.
    fn instantiate(&self, prefab: &Prefab) -> Instance;

    /// Destroy an instance for good. The instance is consumed, so a destroyed
    /// instance can never be recycled afterwards.
    fn destroy(&self, instance: Instance);
}

/// Default instantiator: clones plain instance values and drops them on
/// destroy. Suitable when the host engine tracks its own resources elsewhere.
#[derive(Debug, Default)]
pub struct PrefabInstantiator;

impl Instantiator for PrefabInstantiator {
    fn instantiate(&self, prefab: &Prefab) -> Instance {
        let instance = Instance::new(prefab);
        trace!(template = %prefab.id(), name = prefab.name(), "instantiated prefab clone");
        instance
    }

    fn destroy(&self, instance: Instance) {
        trace!(id = instance.id().raw(), name = instance.name(), "destroyed instance");
        drop(instance);
    }
}

/// Counting instantiator for tests and diagnostics.
///
/// Records how many instances were created and destroyed, and the names of
/// destroyed instances in destruction order.
#[derive(Debug, Default)]
pub struct MockInstantiator {
    created: AtomicU64,
    destroyed: AtomicU64,
    destroyed_names: Mutex<Vec<String>>,
}

impl MockInstantiator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created_count(&self) -> u64 {
        self.created.load(Ordering::Relaxed)
    }

    pub fn destroyed_count(&self) -> u64 {
        self.destroyed.load(Ordering::Relaxed)
    }

    /// Names of destroyed instances, oldest first.
    pub fn destroyed_names(&self) -> Vec<String> {
        self.destroyed_names
            .lock()
            .map(|names| names.clone())
            .unwrap_or_default()
    }

    /// Number of instances currently alive (created minus destroyed).
    pub fn live_count(&self) -> u64 {
        self.created_count().saturating_sub(self.destroyed_count())
    }
}

impl Instantiator for MockInstantiator {
    fn instantiate(&self, prefab: &Prefab) -> Instance {
        self.created.fetch_add(1, Ordering::Relaxed);
        Instance::new(prefab)
    }

    fn destroy(&self, instance: Instance) {
        self.destroyed.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut names) = self.destroyed_names.lock() {
            names.push(instance.name().to_string());
        }
        drop(instance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_instantiator_counts_lifecycle() {
        let instantiator = MockInstantiator::new();
        let prefab = Prefab::new("crate");

        let a = instantiator.instantiate(&prefab);
        let b = instantiator.instantiate(&prefab);
        assert_eq!(instantiator.created_count(), 2);
        assert_eq!(instantiator.live_count(), 2);

        instantiator.destroy(a);
        instantiator.destroy(b);
        assert_eq!(instantiator.destroyed_count(), 2);
        assert_eq!(instantiator.live_count(), 0);
        assert_eq!(instantiator.destroyed_names(), vec!["crate", "crate"]);
    }

    #[test]
    fn test_default_instantiator_clones_from_prefab() {
        let instantiator = PrefabInstantiator;
        let prefab = Prefab::new("barrel");
        let instance = instantiator.instantiate(&prefab);
        assert_eq!(instance.template_id(), prefab.id());
        instantiator.destroy(instance);
    }
}
