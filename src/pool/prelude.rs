//! Prelude for hatchery::pool
//!
//! Re-exports the pool assets, directory, collaborator traits, and the types
//! they hand back, for convenient use.

pub use super::{
    AddressablePoolAsset, PoolAsset, PoolDirectory, PoolError, PoolStats, PrefabPool,
    PrefabPoolAsset,
};

pub use crate::config::{
    AddressablePoolAssetConfig, AddressablePoolConfig, PrefabPoolAssetConfig, PrefabPoolConfig,
};
pub use crate::content::{ContentError, ContentProvider, StaticContentProvider};
pub use crate::prefab::{
    AssetKey, Instance, InstanceId, Instantiator, MockInstantiator, Prefab, PrefabInstantiator,
    TemplateId,
};
pub use crate::scene::{ParentContext, Transform};
