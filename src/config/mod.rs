//! hatchery::config - authoring-side pool configuration
//!
//! Pool assets are authored as plain data: an ordered list of pool entries
//! (template plus preload count) under a display name. The direct variant
//! names its prefabs outright; the addressable variant refers to them through
//! asset keys resolved by the content subsystem.
//!
//! Validation (blank names, malformed keys, duplicates) happens when an asset
//! is initialized, not at deserialization time, so configs round-trip exactly
//! as authored.

use serde::{Deserialize, Serialize};

use crate::prefab::AssetKey;

/// One directly-referenced pool: a prefab name and how many instances to
/// materialize eagerly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefabPoolConfig {
    pub prefab_name: String,
    pub preload_count: usize,
}

/// Authored configuration of a direct-reference pool asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefabPoolAssetConfig {
    /// Display name, also the asset's key in the pool directory.
    pub name: String,
    /// Ordered pool entries, fixed at authoring time.
    pub pools: Vec<PrefabPoolConfig>,
}

/// One addressable pool: an async-resolvable key and a preload count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressablePoolConfig {
    pub key: AssetKey,
    pub preload_count: usize,
}

/// Authored configuration of an addressable pool asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressablePoolAssetConfig {
    /// Display name, also the asset's key in the pool directory.
    pub name: String,
    /// Ordered pool entries, fixed at authoring time.
    pub pools: Vec<AddressablePoolConfig>,
}
