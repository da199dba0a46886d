//! hatchery::content - asynchronous content loading for addressable pools
//!
//! Addressable pool assets do not hold their prefabs directly; they hold
//! `AssetKey`s that a `ContentProvider` resolves asynchronously. A provider
//! answers every load request exactly once and hands back a shared `Prefab`,
//! or reports that the key cannot be resolved. There is no retry and no
//! cancellation: a released pool simply ignores whatever the in-flight load
//! eventually produces.

pub mod bundle;

pub use bundle::{BundleContentProvider, BundleEntry, BundleManifest};

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::prefab::{AssetKey, Prefab};

/// Errors surfaced by content providers.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("no prefab registered for key '{key}'")]
    NotFound { key: String },

    #[error("failed to read bundle: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode bundle manifest: {0}")]
    Decode(String),
}

/// Asynchronous prefab resolution service.
///
/// `load_prefab` acquires a handle on the key's underlying resource;
/// `release` gives it back. Providers keep the prefab (and therefore its
/// `TemplateId`) stable across repeated loads of the same key.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Resolve a key to its prefab, acquiring one resource handle.
    async fn load_prefab(&self, key: &AssetKey) -> Result<Arc<Prefab>, ContentError>;

    /// Release one resource handle previously acquired for the key.
    fn release(&self, key: &AssetKey);
}

/// In-memory content provider backed by a key -> prefab map.
///
/// Primarily used in tests and demos. Optional per-key resolve delays make it
/// possible to exercise out-of-order load completion deterministically.
#[derive(Default)]
pub struct StaticContentProvider {
    prefabs: Mutex<HashMap<AssetKey, Arc<Prefab>>>,
    delays: Mutex<HashMap<AssetKey, Duration>>,
    handles: Mutex<HashMap<AssetKey, usize>>,
}

impl StaticContentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a prefab under a key and return the shared definition.
    pub fn insert(&self, key: impl Into<AssetKey>, prefab_name: impl Into<String>) -> Arc<Prefab> {
        let prefab = Arc::new(Prefab::new(prefab_name));
        if let Ok(mut prefabs) = self.prefabs.lock() {
            prefabs.insert(key.into(), prefab.clone());
        }
        prefab
    }

    /// Register a prefab whose resolution waits for `delay` before completing.
    pub fn insert_with_delay(
        &self,
        key: impl Into<AssetKey>,
        prefab_name: impl Into<String>,
        delay: Duration,
    ) -> Arc<Prefab> {
        let key = key.into();
        if let Ok(mut delays) = self.delays.lock() {
            delays.insert(key.clone(), delay);
        }
        self.insert(key, prefab_name)
    }

    /// Number of outstanding handles for a key.
    pub fn handle_count(&self, key: &AssetKey) -> usize {
        self.handles
            .lock()
            .map(|handles| handles.get(key).copied().unwrap_or(0))
            .unwrap_or(0)
    }
}

#[async_trait]
impl ContentProvider for StaticContentProvider {
    async fn load_prefab(&self, key: &AssetKey) -> Result<Arc<Prefab>, ContentError> {
        let delay = self
            .delays
            .lock()
            .ok()
            .and_then(|delays| delays.get(key).copied());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let prefab = self
            .prefabs
            .lock()
            .ok()
            .and_then(|prefabs| prefabs.get(key).cloned());
        match prefab {
            Some(prefab) => {
                if let Ok(mut handles) = self.handles.lock() {
                    *handles.entry(key.clone()).or_insert(0) += 1;
                }
                Ok(prefab)
            }
            None => Err(ContentError::NotFound {
                key: key.as_str().to_string(),
            }),
        }
    }

    fn release(&self, key: &AssetKey) {
        if let Ok(mut handles) = self.handles.lock() {
            match handles.get_mut(key) {
                Some(count) if *count > 0 => {
                    *count -= 1;
                    debug!(key = %key, remaining = *count, "released content handle");
                }
                _ => debug!(key = %key, "release for key with no outstanding handle"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_acquires_handle_and_release_returns_it() {
        let provider = StaticContentProvider::new();
        let key = AssetKey::new("prefabs/rocket");
        provider.insert(key.clone(), "rocket");

        let prefab = provider.load_prefab(&key).await.unwrap();
        assert_eq!(prefab.name(), "rocket");
        assert_eq!(provider.handle_count(&key), 1);

        provider.release(&key);
        assert_eq!(provider.handle_count(&key), 0);
    }

    #[tokio::test]
    async fn test_repeated_loads_keep_template_identity_stable() {
        let provider = StaticContentProvider::new();
        let key = AssetKey::new("prefabs/drone");
        provider.insert(key.clone(), "drone");

        let first = provider.load_prefab(&key).await.unwrap();
        let second = provider.load_prefab(&key).await.unwrap();
        assert_eq!(first.id(), second.id());
        assert_eq!(provider.handle_count(&key), 2);
    }

    #[tokio::test]
    async fn test_unknown_key_reports_not_found() {
        let provider = StaticContentProvider::new();
        let result = provider.load_prefab(&AssetKey::new("prefabs/ghost")).await;
        assert!(matches!(result, Err(ContentError::NotFound { .. })));
    }

    #[test]
    fn test_release_without_load_is_harmless() {
        let provider = StaticContentProvider::new();
        let key = AssetKey::new("prefabs/rocket");
        provider.release(&key);
        assert_eq!(provider.handle_count(&key), 0);
    }
}
