//! Bundle-backed content provider.
//!
//! A bundle is the serialized form of an addressable content set: a manifest
//! mapping asset keys to prefab names, written with bincode. The provider
//! reads the manifest once and materializes prefabs lazily on first load so a
//! key resolves to the same `TemplateId` for the life of the provider.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::prefab::{AssetKey, Prefab};

use super::{ContentError, ContentProvider};

/// One addressable entry in a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleEntry {
    pub key: AssetKey,
    pub prefab_name: String,
}

/// Serialized manifest of a content bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleManifest {
    pub entries: Vec<BundleEntry>,
}

impl BundleManifest {
    /// Serialize the manifest to a bundle file.
    pub async fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ContentError> {
        let bytes =
            bincode::serialize(self).map_err(|error| ContentError::Decode(error.to_string()))?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }
}

/// Content provider that resolves keys against a bundle manifest.
pub struct BundleContentProvider {
    entries: HashMap<AssetKey, String>,
    loaded: Mutex<HashMap<AssetKey, Arc<Prefab>>>,
    handles: Mutex<HashMap<AssetKey, usize>>,
}

impl BundleContentProvider {
    /// Read and decode a bundle file from disk.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let bytes = tokio::fs::read(path).await?;
        let manifest: BundleManifest =
            bincode::deserialize(&bytes).map_err(|error| ContentError::Decode(error.to_string()))?;
        Ok(Self::from_manifest(manifest))
    }

    /// Build a provider from an already-decoded manifest.
    pub fn from_manifest(manifest: BundleManifest) -> Self {
        let entries = manifest
            .entries
            .into_iter()
            .map(|entry| (entry.key, entry.prefab_name))
            .collect();
        Self {
            entries,
            loaded: Mutex::new(HashMap::new()),
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Number of addressable entries in the bundle.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
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
impl ContentProvider for BundleContentProvider {
    async fn load_prefab(&self, key: &AssetKey) -> Result<Arc<Prefab>, ContentError> {
        let prefab_name = match self.entries.get(key) {
            Some(name) => name.clone(),
            None => {
                return Err(ContentError::NotFound {
                    key: key.as_str().to_string(),
                })
            }
        };

        let prefab = {
            let mut loaded = self
                .loaded
                .lock()
                .map_err(|_| ContentError::Decode("bundle cache lock poisoned".to_string()))?;
            loaded
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Prefab::new(prefab_name)))
                .clone()
        };

        if let Ok(mut handles) = self.handles.lock() {
            *handles.entry(key.clone()).or_insert(0) += 1;
        }
        Ok(prefab)
    }

    fn release(&self, key: &AssetKey) {
        if let Ok(mut handles) = self.handles.lock() {
            match handles.get_mut(key) {
                Some(count) if *count > 0 => {
                    *count -= 1;
                    debug!(key = %key, remaining = *count, "released bundle handle");
                }
                _ => debug!(key = %key, "release for key with no outstanding handle"),
            }
        }
    }
}
